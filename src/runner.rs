// Registration target for discovered migrations.
//
// Execution stays with the external engine: it drains or iterates the list,
// calls prepare/revert in registration order, and tracks applied state in its
// own ledger. This module only defines the narrow surface the loader writes
// through.
use crate::migration::AutoMigration;

/// Where the loader deposits instantiated migrations.
///
/// `contains` exists because the external ledger keys applied state on
/// migration names; the loader refuses to plant a second instance under a name
/// the registrar already holds.
pub trait MigrationRegistrar {
    fn add(&mut self, migration: Box<dyn AutoMigration>);
    fn contains(&self, name: &str) -> bool;
}

/// Insertion-ordered migration list, the default registration target.
///
/// The host hands this (or its own `MigrationRegistrar`) to the loader at
/// startup, then feeds the collected instances to its migration engine.
#[derive(Default)]
pub struct Migrations {
    entries: Vec<Box<dyn AutoMigration>>,
}

impl Migrations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn AutoMigration> {
        self.entries.iter().map(|m| m.as_ref())
    }

    /// Migration names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|m| m.name()).collect()
    }

    /// Hand the collected migrations over to the execution engine.
    pub fn into_inner(self) -> Vec<Box<dyn AutoMigration>> {
        self.entries
    }
}

impl MigrationRegistrar for Migrations {
    fn add(&mut self, migration: Box<dyn AutoMigration>) {
        self.entries.push(migration);
    }

    fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|m| m.name() == name)
    }
}
