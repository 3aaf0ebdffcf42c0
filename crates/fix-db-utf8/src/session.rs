//! MySQL session: connection bootstrap, raw statement execution and schema
//! inspection.
//!
//! A run owns exactly one [`MySqlSession`] and issues every statement through
//! it in order. There is no pooling and no reconnection; a dead session kills
//! the run. The [`SchemaSession`] trait is the seam the migrator is written
//! against, so the migration algorithm can be exercised without a live server.

use async_trait::async_trait;
use indexmap::IndexMap;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlDatabaseError, MySqlRow};
use sqlx::{Connection, Executor, Row};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::{FixError, Result};
use crate::schema::{quote_ident, ColumnDescriptor, TableDescriptor};

/// Validated connection credentials. Consumed once to establish a session.
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    /// Server host.
    pub host: String,
    /// Server port (default: 3306).
    pub port: u16,
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
    /// Database to fix.
    pub database: String,
}

/// A single failed statement, with the engine errno and error text.
///
/// Structured replacement for stringly last-error reporting: the migrator
/// collects these into the aggregate report and the CLI decides how to
/// render them.
#[derive(Debug, Clone, Error)]
#[error("{message} (errno {code})")]
pub struct QueryError {
    /// MySQL error number, 0 when the failure happened client-side.
    pub code: u32,
    /// Engine error text.
    pub message: String,
}

impl QueryError {
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => {
                let code = db
                    .try_downcast_ref::<MySqlDatabaseError>()
                    .map(|e| u32::from(e.number()))
                    .unwrap_or(0);
                Self {
                    code,
                    message: db.message().to_string(),
                }
            }
            other => Self {
                code: 0,
                message: other.to_string(),
            },
        }
    }
}

/// Statement execution and schema inspection over one database session.
///
/// Per-statement failures are recoverable: they surface as [`QueryError`]
/// values, never as fatal errors.
#[async_trait]
pub trait SchemaSession: Send {
    /// Execute a raw statement (DDL or otherwise), discarding any result set.
    async fn execute(&mut self, sql: &str) -> std::result::Result<(), QueryError>;

    /// List base tables with metadata, keyed by table name in engine-reported
    /// order. Empty mapping when the database has no tables.
    async fn list_tables(
        &mut self,
        database: &str,
    ) -> std::result::Result<IndexMap<String, TableDescriptor>, QueryError>;

    /// List columns of a table, keyed by column name in ordinal order.
    async fn list_columns(
        &mut self,
        table: &str,
    ) -> std::result::Result<IndexMap<String, ColumnDescriptor>, QueryError>;
}

/// Live MySQL session over a single [`MySqlConnection`].
pub struct MySqlSession {
    conn: MySqlConnection,
    database: String,
}

impl MySqlSession {
    /// Connect to the server and select the target database.
    ///
    /// Connecting and selecting are two separate steps so that rejected
    /// credentials ([`FixError::Connection`]) and a missing database
    /// ([`FixError::DatabaseSelect`]) are distinguishable. Both are fatal.
    pub async fn connect(params: &ConnectionParams) -> Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(&params.host)
            .port(params.port)
            .username(&params.username)
            .password(&params.password);

        let mut conn =
            MySqlConnection::connect_with(&options)
                .await
                .map_err(|e| FixError::Connection {
                    host: params.host.clone(),
                    port: params.port,
                    source: e,
                })?;

        conn.execute(format!("USE {}", quote_ident(&params.database)).as_str())
            .await
            .map_err(|e| FixError::DatabaseSelect {
                database: params.database.clone(),
                source: e,
            })?;

        info!(
            "Connected to MySQL at {}:{}, database '{}'",
            params.host, params.port, params.database
        );

        Ok(Self {
            conn,
            database: params.database.clone(),
        })
    }

    /// The selected database.
    pub fn database(&self) -> &str {
        &self.database
    }
}

#[async_trait]
impl SchemaSession for MySqlSession {
    async fn execute(&mut self, sql: &str) -> std::result::Result<(), QueryError> {
        debug!(statement = sql, "executing");
        // Raw text-protocol execution: DDL statements are not all preparable.
        self.conn
            .execute(sql)
            .await
            .map(|_| ())
            .map_err(QueryError::from_sqlx)
    }

    async fn list_tables(
        &mut self,
        database: &str,
    ) -> std::result::Result<IndexMap<String, TableDescriptor>, QueryError> {
        // CAST to CHAR to handle collation differences where information_schema
        // may return VARBINARY instead of VARCHAR
        let query = r#"
            SELECT
                CAST(TABLE_NAME AS CHAR(255)) AS TABLE_NAME,
                CAST(ENGINE AS CHAR(64)) AS ENGINE_NAME,
                CAST(TABLE_COLLATION AS CHAR(64)) AS TABLE_COLLATION,
                CAST(COALESCE(TABLE_ROWS, 0) AS SIGNED) AS TABLE_ROWS
            FROM INFORMATION_SCHEMA.TABLES
            WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = 'BASE TABLE'
            ORDER BY TABLE_NAME
        "#;

        let rows: Vec<MySqlRow> = sqlx::query(query)
            .bind(database)
            .fetch_all(&mut self.conn)
            .await
            .map_err(QueryError::from_sqlx)?;

        let mut tables = IndexMap::with_capacity(rows.len());
        for row in rows {
            let name: String = row.get("TABLE_NAME");
            tables.insert(
                name.clone(),
                TableDescriptor {
                    name,
                    engine: row.get("ENGINE_NAME"),
                    collation: row.get("TABLE_COLLATION"),
                    row_count: row.get("TABLE_ROWS"),
                },
            );
        }

        debug!("Listed {} tables in '{}'", tables.len(), database);
        Ok(tables)
    }

    async fn list_columns(
        &mut self,
        table: &str,
    ) -> std::result::Result<IndexMap<String, ColumnDescriptor>, QueryError> {
        let query = r#"
            SELECT
                CAST(COLUMN_NAME AS CHAR(255)) AS COLUMN_NAME,
                CAST(COLUMN_TYPE AS CHAR(255)) AS COLUMN_TYPE,
                CAST(COLLATION_NAME AS CHAR(64)) AS COLLATION_NAME
            FROM INFORMATION_SCHEMA.COLUMNS
            WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
            ORDER BY ORDINAL_POSITION
        "#;

        let rows: Vec<MySqlRow> = sqlx::query(query)
            .bind(&self.database)
            .bind(table)
            .fetch_all(&mut self.conn)
            .await
            .map_err(QueryError::from_sqlx)?;

        let mut columns = IndexMap::with_capacity(rows.len());
        for row in rows {
            let name: String = row.get("COLUMN_NAME");
            columns.insert(
                name.clone(),
                ColumnDescriptor {
                    name,
                    column_type: row.get("COLUMN_TYPE"),
                    collation: row.get("COLLATION_NAME"),
                },
            );
        }

        debug!("Listed {} columns in '{}'", columns.len(), table);
        Ok(columns)
    }
}
