//! # fix-db-utf8
//!
//! Converts a MySQL/MariaDB database, its tables and all textual columns to
//! UTF-8, optionally reinterpreting the stored bytes as a legacy source
//! encoding (e.g. `latin1`) along the way.
//!
//! Two broken setups can be repaired:
//!
//! 1. The stored data uses a legacy encoding (supply the source encoding):
//!    each text column is routed through the `binary` pseudo-charset, relabeled
//!    as the source encoding, and then transcoded to UTF-8 in a single pass.
//! 2. The stored data is already UTF-8 but the schema declares something else
//!    (no source encoding): columns are relabeled via `binary` straight to
//!    UTF-8 without touching a single byte.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fix_db_utf8::{ConnectionParams, EncodingMigrator, MySqlSession};
//!
//! #[tokio::main]
//! async fn main() -> fix_db_utf8::Result<()> {
//!     let params = ConnectionParams {
//!         host: "localhost".into(),
//!         port: 3306,
//!         username: "typo3".into(),
//!         password: "secret".into(),
//!         database: "typo3_db".into(),
//!     };
//!     let mut session = MySqlSession::connect(&params).await?;
//!     let migrator = EncodingMigrator::new("typo3_db", Some("latin1".into()));
//!     let report = migrator.migrate(&mut session).await;
//!     println!("Converted {} columns", report.columns_converted);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod migrate;
pub mod schema;
pub mod session;

// Re-exports for convenient access
pub use catalog::{Encoding, ENCODINGS};
pub use error::{FixError, Result};
pub use migrate::{EncodingMigrator, MigrationReport, StatementError, TableReport};
pub use schema::{ColumnDescriptor, TableDescriptor};
pub use session::{ConnectionParams, MySqlSession, QueryError, SchemaSession};
