// Base contract for auto-discoverable migrations
use sqlx::PgPool;

/// The contract every auto-discoverable migration implements.
///
/// The loader only ever handles migrations as `Box<dyn AutoMigration>`, so this
/// trait is the whole polymorphic surface: two identity accessors the runner
/// persists in its applied-state ledger, and the two lifecycle operations it
/// drives later. No method has a default body; an incomplete migration fails
/// to compile.
///
/// `name()` must be unique across every migration registered into the same
/// runner, or the runner's ledger will misidentify duplicates. Timestamp-based
/// type names (`M20230101_CreateUsers`) keep names unique and keep file-name
/// ordering meaningful at the same time.
#[async_trait::async_trait]
pub trait AutoMigration: Send + Sync {
    /// Unique stable identifier the runner tracks applied state under.
    fn name(&self) -> &str;

    /// Fallback identifier reported when the primary name is unavailable.
    fn default_name(&self) -> &str;

    /// Apply the forward schema/data change.
    async fn prepare(&self, db: &PgPool) -> anyhow::Result<()>;

    /// Undo what `prepare` did.
    async fn revert(&self, db: &PgPool) -> anyhow::Result<()>;
}

/// Zero-argument constructor for a registered migration type.
///
/// The loader instantiates migrations purely from a discovered file name, so no
/// constructor arguments exist; `register_migrations!` satisfies this with
/// `Default::default`.
pub type MigrationFactory = fn() -> Box<dyn AutoMigration>;

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Minimal contract-satisfying migration for loader and registry tests.
    #[derive(Default)]
    pub struct NoopMigration {
        pub label: &'static str,
    }

    impl NoopMigration {
        pub fn named(label: &'static str) -> Self {
            Self { label }
        }
    }

    #[async_trait::async_trait]
    impl AutoMigration for NoopMigration {
        fn name(&self) -> &str {
            self.label
        }

        fn default_name(&self) -> &str {
            self.label
        }

        async fn prepare(&self, _db: &PgPool) -> anyhow::Result<()> {
            Ok(())
        }

        async fn revert(&self, _db: &PgPool) -> anyhow::Result<()> {
            Ok(())
        }
    }
}
