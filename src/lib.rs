//! Convention-based discovery and registration of database migrations.
//!
//! At startup the loader scans a migrations directory, derives a qualified
//! type name from each file name, resolves it against a process-global
//! registry of migration factories, and registers one instance per entry into
//! a [`MigrationRegistrar`], typically [`Migrations`], which the host then
//! hands to its migration engine. The engine drives `prepare`/`revert` in
//! registration order and tracks applied state itself; none of that happens
//! here.
//!
//! The naming convention does the ordering work: name files with a timestamp
//! (`20230101_CreateUsers.sql`) and types with a prefix in front of it
//! (`M20230101_CreateUsers`, identifiers cannot start with a digit). Entry
//! names are sorted before processing, so migrations register in creation
//! order.
//!
//! ```no_run
//! use auto_migrator::{
//!     load_auto_migrations, register_migrations, AutoMigration, LoaderConfig, Migrations,
//! };
//! use sqlx::PgPool;
//!
//! #[derive(Default)]
//! #[allow(non_camel_case_types)]
//! struct M20230101_CreateUsers;
//!
//! #[async_trait::async_trait]
//! impl AutoMigration for M20230101_CreateUsers {
//!     fn name(&self) -> &str {
//!         "M20230101_CreateUsers"
//!     }
//!
//!     fn default_name(&self) -> &str {
//!         "M20230101_CreateUsers"
//!     }
//!
//!     async fn prepare(&self, db: &PgPool) -> anyhow::Result<()> {
//!         sqlx::query("CREATE TABLE users (id BIGSERIAL PRIMARY KEY)")
//!             .execute(db)
//!             .await?;
//!         Ok(())
//!     }
//!
//!     async fn revert(&self, db: &PgPool) -> anyhow::Result<()> {
//!         sqlx::query("DROP TABLE users").execute(db).await?;
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), auto_migrator::LoaderError> {
//!     register_migrations! {
//!         namespace = "App";
//!         M20230101_CreateUsers,
//!     }
//!
//!     let mut migrations = Migrations::new();
//!     let report = load_auto_migrations(&LoaderConfig::default(), &mut migrations)?;
//!     tracing::info!(registered = report.registered.len(), "Migrations loaded");
//!     // hand `migrations` to the execution engine
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod loader;
pub mod migration;
pub mod registry;
pub mod runner;

pub use error::LoaderError;
pub use loader::{load_auto_migrations, LoadReport, LoaderConfig, SkippedEntry};
pub use migration::{AutoMigration, MigrationFactory};
pub use runner::{MigrationRegistrar, Migrations};
