//! PostgreSQL sink over the synchronous `postgres` client.

use enquete_model::{DbConfig, FacilityCode, RecordBatch, TableName, Value};
use postgres::types::ToSql;
use postgres::{Client, Config, NoTls};
use tracing::{debug, info};

use crate::error::{Result, SinkError};
use crate::sink::{RecordSink, SinkConnector, WriteSummary};
use crate::sql::{delete_statement, insert_statement, rows_per_insert};
use crate::value::SqlValue;

const DEFAULT_HOST: &str = "localhost";

const APPLICATION_NAME: &str = "enquete-import";

/// Connects to corporation databases without TLS.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresConnector;

impl PostgresConnector {
    pub fn new() -> Self {
        Self
    }
}

/// `postgres` client configuration for `db`; unset host means localhost.
pub fn client_config(db: &DbConfig) -> Config {
    let mut config = Config::new();
    config
        .host(db.host.as_deref().unwrap_or(DEFAULT_HOST))
        .application_name(APPLICATION_NAME);
    if let Some(port) = db.port {
        config.port(port);
    }
    if let Some(dbname) = &db.dbname {
        config.dbname(dbname);
    }
    if let Some(user) = &db.user {
        config.user(user);
    }
    if let Some(password) = &db.password {
        config.password(password);
    }
    if let Some(options) = &db.options {
        config.options(options);
    }
    config
}

impl SinkConnector for PostgresConnector {
    type Sink = PostgresSink;

    fn connect(&self, corporation: &str, db: &DbConfig) -> Result<PostgresSink> {
        debug!(corporation, host = ?db.host, dbname = ?db.dbname, "connecting to database");
        let client = client_config(db)
            .connect(NoTls)
            .map_err(|source| SinkError::Connect {
                corporation: corporation.to_string(),
                source,
            })?;
        Ok(PostgresSink { client })
    }
}

/// An open connection; dropped (and closed) after the facility is written.
pub struct PostgresSink {
    client: Client,
}

impl RecordSink for PostgresSink {
    fn write_batch(
        &mut self,
        table: &TableName,
        facility_code: &FacilityCode,
        batch: &RecordBatch,
        replace: bool,
    ) -> Result<WriteSummary> {
        let mut transaction = self.client.transaction()?;

        let deleted = if replace {
            let code = Value::from(facility_code);
            let deleted = transaction.execute(delete_statement(table).as_str(), &[&SqlValue(&code)])?;
            info!(table = %table, facility_code = %facility_code, deleted, "existing records cleared");
            Some(deleted)
        } else {
            None
        };

        let columns = batch.columns();
        let rows: Vec<Vec<&Value>> = batch.rows().collect();
        let mut inserted = 0;
        for chunk in rows.chunks(rows_per_insert(columns.len())) {
            let sql = insert_statement(table, columns, chunk.len())?;
            let values: Vec<SqlValue<'_>> = chunk
                .iter()
                .flat_map(|row| row.iter().map(|value| SqlValue(*value)))
                .collect();
            let params: Vec<&(dyn ToSql + Sync)> = values
                .iter()
                .map(|value| value as &(dyn ToSql + Sync))
                .collect();
            inserted += transaction.execute(sql.as_str(), &params)?;
            debug!(table = %table, rows = chunk.len(), "insert chunk written");
        }

        transaction.commit()?;
        Ok(WriteSummary { deleted, inserted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_defaults_to_localhost() {
        let config = client_config(&DbConfig::default());
        assert_eq!(
            config.get_hosts(),
            &[postgres::config::Host::Tcp("localhost".to_string())]
        );
        assert_eq!(config.get_application_name(), Some(APPLICATION_NAME));
    }

    #[test]
    fn test_client_config_copies_parameters() {
        let db = DbConfig {
            host: Some("db.internal".to_string()),
            port: Some(5433),
            dbname: Some("enquete".to_string()),
            user: Some("importer".to_string()),
            password: Some("secret".to_string()),
            options: Some("-c search_path=survey".to_string()),
        };
        let config = client_config(&db);
        assert_eq!(config.get_ports(), &[5433]);
        assert_eq!(config.get_dbname(), Some("enquete"));
        assert_eq!(config.get_user(), Some("importer"));
        assert_eq!(config.get_password(), Some(&b"secret"[..]));
        assert_eq!(config.get_options(), Some("-c search_path=survey"));
    }
}
