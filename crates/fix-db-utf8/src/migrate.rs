//! Encoding migrator - walks every table and text column and converges each
//! to UTF-8.
//!
//! The interesting part is the per-column three-step re-encode. A direct
//! relabel from a wrong charset straight to UTF-8 would let the engine
//! transcode from the *declared* (possibly wrong) charset and corrupt the
//! data. Routing through the `binary` pseudo-charset first detaches the bytes
//! from any interpretation, so exactly one transcoding pass runs, and only
//! once the byte labeling is known-correct:
//!
//! 1. `CHARACTER SET binary` - bytes become opaque, nothing is transcoded.
//! 2. `CHARACTER SET <source>` (only when a source encoding was supplied) -
//!    relabels the bytes as the encoding they really are; still no
//!    transcoding because the column is currently binary.
//! 3. `CHARACTER SET utf8 COLLATE utf8_unicode_ci` - the single real
//!    transcoding pass (or a pure relabel when step 2 was skipped and the
//!    bytes were already UTF-8).
//!
//! Every statement failure is recoverable: it is recorded in the report and
//! the run moves on to the next step, column or table. DDL in MySQL is
//! non-transactional, so there is no rollback of already-applied changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::schema::quote_ident;
use crate::session::SchemaSession;

/// Canonical target character set.
pub const UTF8_CHARSET: &str = "utf8";
/// Canonical target collation.
pub const UTF8_COLLATION: &str = "utf8_unicode_ci";
/// Transit pseudo-charset that blocks transcoding.
pub const BINARY_CHARSET: &str = "binary";

/// One failed statement, captured at the statement boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementError {
    /// The statement that failed.
    pub statement: String,
    /// MySQL error number, 0 for client-side failures.
    pub code: u32,
    /// Engine error text.
    pub message: String,
}

/// Per-table outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    /// Table name.
    pub name: String,
    /// Names of columns that were run through the re-encode sequence.
    pub columns_converted: Vec<String>,
}

/// Aggregate result of a migration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Database that was migrated.
    pub database: String,

    /// Source encoding supplied for the run, if any.
    pub source_encoding: Option<String>,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Tables found in the database.
    pub tables_processed: usize,

    /// Tables whose default charset was successfully set to UTF-8.
    pub tables_altered: usize,

    /// Columns run through the re-encode sequence.
    pub columns_converted: usize,

    /// Per-table outcomes, in engine order.
    pub tables: Vec<TableReport>,

    /// Every statement failure encountered. Empty means a clean run.
    pub errors: Vec<StatementError>,
}

impl MigrationReport {
    fn new(database: &str, source_encoding: Option<&str>) -> Self {
        Self {
            database: database.to_string(),
            source_encoding: source_encoding.map(|s| s.to_string()),
            started_at: Utc::now(),
            duration_seconds: 0.0,
            tables_processed: 0,
            tables_altered: 0,
            columns_converted: 0,
            tables: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// True when no statement failed.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Converges a database, its tables and all textual columns to UTF-8.
pub struct EncodingMigrator {
    database: String,
    source_encoding: Option<String>,
}

impl EncodingMigrator {
    /// Create a migrator for `database`. When `source_encoding` is given,
    /// stored bytes are reinterpreted as that encoding during conversion;
    /// otherwise they are assumed to already be UTF-8, just mislabeled.
    pub fn new(database: impl Into<String>, source_encoding: Option<String>) -> Self {
        Self {
            database: database.into(),
            source_encoding,
        }
    }

    /// Run the migration over `session`.
    ///
    /// Infallible by construction: fatal conditions (connect, database
    /// select) happen before a session exists, and everything after that is
    /// a per-statement error collected into the report.
    pub async fn migrate<S: SchemaSession>(&self, session: &mut S) -> MigrationReport {
        let started = std::time::Instant::now();
        let mut report = MigrationReport::new(&self.database, self.source_encoding.as_deref());

        info!("Fixing encoding of database '{}'", self.database);

        // Database default first; a failure here does not stop the
        // table/column work below.
        self.run_statement(
            session,
            format!(
                "ALTER DATABASE {} DEFAULT CHARACTER SET {} COLLATE {}",
                quote_ident(&self.database),
                UTF8_CHARSET,
                UTF8_COLLATION
            ),
            &mut report,
        )
        .await;

        let tables = match session.list_tables(&self.database).await {
            Ok(tables) => tables,
            Err(e) => {
                warn!("Could not list tables: {}", e);
                report.errors.push(StatementError {
                    statement: format!("list tables of {}", self.database),
                    code: e.code,
                    message: e.message,
                });
                Default::default()
            }
        };

        for name in tables.keys() {
            report.tables_processed += 1;

            let altered = self
                .run_statement(
                    session,
                    format!(
                        "ALTER TABLE {} DEFAULT CHARACTER SET {} COLLATE {}",
                        quote_ident(name),
                        UTF8_CHARSET,
                        UTF8_COLLATION
                    ),
                    &mut report,
                )
                .await;
            if altered {
                report.tables_altered += 1;
            }
            info!("Table '{}' is set up to use {}", name, UTF8_CHARSET);

            let columns = match session.list_columns(name).await {
                Ok(columns) => columns,
                Err(e) => {
                    warn!("Could not list columns of '{}': {}", name, e);
                    report.errors.push(StatementError {
                        statement: format!("list columns of {}", name),
                        code: e.code,
                        message: e.message,
                    });
                    continue;
                }
            };

            let mut converted = Vec::new();
            for (col_name, column) in &columns {
                if !column.needs_conversion() {
                    continue;
                }
                self.convert_column(session, name, col_name, &column.column_type, &mut report)
                    .await;
                converted.push(col_name.clone());
            }

            if !converted.is_empty() {
                match &self.source_encoding {
                    Some(encoding) => info!(
                        "Data in columns of table '{}' converted from '{}' to {}",
                        name, encoding, UTF8_CHARSET
                    ),
                    None => info!(
                        "Columns of table '{}' are set up to use {}",
                        name, UTF8_CHARSET
                    ),
                }
            }

            report.columns_converted += converted.len();
            report.tables.push(TableReport {
                name: name.clone(),
                columns_converted: converted,
            });
        }

        info!(
            "Database '{}' is set up to use {} now ({} columns converted, {} errors)",
            self.database,
            UTF8_CHARSET,
            report.columns_converted,
            report.errors.len()
        );

        report.duration_seconds = started.elapsed().as_secs_f64();
        report
    }

    /// The three-step re-encode for a single qualifying column. Each step is
    /// attempted even if a previous one failed.
    async fn convert_column<S: SchemaSession>(
        &self,
        session: &mut S,
        table: &str,
        column: &str,
        column_type: &str,
        report: &mut MigrationReport,
    ) {
        // Step 1: detach from the current (possibly wrong) charset without
        // transcoding any bytes.
        self.run_statement(
            session,
            self.change_column(table, column, column_type, BINARY_CHARSET, None),
            report,
        )
        .await;

        // Step 2: relabel the opaque bytes as their true encoding. Still no
        // transcoding because the column is binary.
        if let Some(encoding) = &self.source_encoding {
            self.run_statement(
                session,
                self.change_column(table, column, column_type, encoding, None),
                report,
            )
            .await;
        }

        // Step 3: the one transcoding pass (a pure relabel when the bytes
        // were already UTF-8 and step 2 was skipped).
        self.run_statement(
            session,
            self.change_column(table, column, column_type, UTF8_CHARSET, Some(UTF8_COLLATION)),
            report,
        )
        .await;
    }

    /// Build a full `ALTER TABLE ... CHANGE` preserving the declared type.
    fn change_column(
        &self,
        table: &str,
        column: &str,
        column_type: &str,
        charset: &str,
        collation: Option<&str>,
    ) -> String {
        let column = quote_ident(column);
        let mut sql = format!(
            "ALTER TABLE {} CHANGE {} {} {} CHARACTER SET {}",
            quote_ident(table),
            column,
            column,
            column_type,
            charset
        );
        if let Some(collation) = collation {
            sql.push_str(&format!(" COLLATE {}", collation));
        }
        sql
    }

    /// Execute one statement, recording a failure in the report. Returns
    /// whether the statement succeeded.
    async fn run_statement<S: SchemaSession>(
        &self,
        session: &mut S,
        sql: String,
        report: &mut MigrationReport,
    ) -> bool {
        match session.execute(&sql).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Statement failed: {} -- {}", sql, e);
                report.errors.push(StatementError {
                    statement: sql,
                    code: e.code,
                    message: e.message,
                });
                false
            }
        }
    }
}
