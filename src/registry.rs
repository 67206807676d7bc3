// Process-global table mapping qualified type names to migration factories.
//
// This is the compile-time stand-in for reflective class lookup: migration
// types cannot be conjured from strings at runtime, so hosts register a factory
// under each qualified key during bootstrap (normally via the
// `register_migrations!` macro) and the loader resolves file-derived keys
// against this table.
use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use tracing::warn;

use crate::migration::MigrationFactory;

static REGISTRY: Lazy<RwLock<HashMap<String, MigrationFactory>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Register a migration factory under a qualified key.
///
/// Re-registering an existing key replaces the previous factory and warns; a
/// colliding key is a bootstrap defect worth surfacing, but not worth poisoning
/// startup over.
pub fn register(key: impl Into<String>, factory: MigrationFactory) {
    let key = key.into();
    let mut table = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    if table.insert(key.clone(), factory).is_some() {
        warn!(key = %key, "Replacing previously registered migration factory");
    }
}

/// Look up the factory registered under `key`, if any.
pub fn resolve(key: &str) -> Option<MigrationFactory> {
    let table = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
    table.get(key).copied()
}

/// Whether any factory is registered under `key`.
pub fn is_registered(key: &str) -> bool {
    resolve(key).is_some()
}

/// Register a list of migration types under a shared namespace.
///
/// Each key is the namespace concatenated with the type's own name. Rust
/// identifiers cannot start with a digit, so a timestamp-named migration
/// already carries its prefix in the type name (`M20230101_CreateUsers`), and
/// the derived key lines up with what the loader builds from the file name
/// `20230101_CreateUsers.sql` with prefix `"M"`.
///
/// ```
/// use auto_migrator::{register_migrations, AutoMigration};
/// use sqlx::PgPool;
///
/// #[derive(Default)]
/// #[allow(non_camel_case_types)]
/// struct M20230101_CreateUsers;
///
/// #[async_trait::async_trait]
/// impl AutoMigration for M20230101_CreateUsers {
///     fn name(&self) -> &str { "M20230101_CreateUsers" }
///     fn default_name(&self) -> &str { "M20230101_CreateUsers" }
///     async fn prepare(&self, _db: &PgPool) -> anyhow::Result<()> { Ok(()) }
///     async fn revert(&self, _db: &PgPool) -> anyhow::Result<()> { Ok(()) }
/// }
///
/// register_migrations! {
///     namespace = "DocApp";
///     M20230101_CreateUsers,
/// }
/// assert!(auto_migrator::registry::is_registered("DocAppM20230101_CreateUsers"));
/// ```
#[macro_export]
macro_rules! register_migrations {
    (namespace = $ns:expr; $($ty:ident),+ $(,)?) => {
        $(
            $crate::registry::register(
                format!("{}{}", $ns, stringify!($ty)),
                || ::std::boxed::Box::new(<$ty as ::std::default::Default>::default())
                    as ::std::boxed::Box<dyn $crate::AutoMigration>,
            );
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::testing::NoopMigration;
    use crate::migration::AutoMigration;

    fn noop_factory() -> Box<dyn AutoMigration> {
        Box::new(NoopMigration::named("noop"))
    }

    fn other_factory() -> Box<dyn AutoMigration> {
        Box::new(NoopMigration::named("other"))
    }

    #[test]
    fn resolve_returns_registered_factory() {
        register("RegTestAM1_First", noop_factory);
        let factory = resolve("RegTestAM1_First").expect("factory registered");
        assert_eq!(factory().name(), "noop");
    }

    #[test]
    fn resolve_misses_unknown_key() {
        assert!(resolve("RegTestNeverRegistered").is_none());
        assert!(!is_registered("RegTestNeverRegistered"));
    }

    #[test]
    fn reregistration_replaces_factory() {
        register("RegTestBM1_Replaced", noop_factory);
        register("RegTestBM1_Replaced", other_factory);
        let factory = resolve("RegTestBM1_Replaced").expect("factory registered");
        assert_eq!(factory().name(), "other");
    }

    #[test]
    fn macro_derives_namespace_plus_type_name_keys() {
        #[derive(Default)]
        #[allow(non_camel_case_types)]
        struct M20230101_CreateUsers;

        #[async_trait::async_trait]
        impl AutoMigration for M20230101_CreateUsers {
            fn name(&self) -> &str {
                "M20230101_CreateUsers"
            }

            fn default_name(&self) -> &str {
                "M20230101_CreateUsers"
            }

            async fn prepare(&self, _db: &sqlx::PgPool) -> anyhow::Result<()> {
                Ok(())
            }

            async fn revert(&self, _db: &sqlx::PgPool) -> anyhow::Result<()> {
                Ok(())
            }
        }

        register_migrations! {
            namespace = "RegTestC";
            M20230101_CreateUsers,
        }

        let factory = resolve("RegTestCM20230101_CreateUsers").expect("macro registered key");
        assert_eq!(factory().name(), "M20230101_CreateUsers");
    }
}
