//! Query command - runs a filter and prints the entity graph as JSON

use nestql::{Dialect, Entity, Filter, Nestql, Schema};
use nestql::postgres::PostgresDialect;
use nestql::postgres::tokio::TokioPostgresExecutor;
use nestql::sqlite::SQLiteDialect;
use nestql::sqlite::rusqlite::RusqliteExecutor;

use crate::config::Config;
use crate::error::CliError;

pub fn run(config: &Config, entity: &str, filter: &Filter, pretty: bool) -> Result<(), CliError> {
    let schema = config.load_schema()?;
    let database = config.database()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::IoError(e.to_string()))?;
    let entities = runtime.block_on(find(config.dialect, &database, schema, entity, filter))?;

    let json = if pretty {
        serde_json::to_string_pretty(&entities)
    } else {
        serde_json::to_string(&entities)
    }
    .map_err(|e| CliError::Other(e.to_string()))?;
    println!("{json}");
    Ok(())
}

async fn find(
    dialect: Dialect,
    database: &str,
    schema: Schema,
    entity: &str,
    filter: &Filter,
) -> Result<Vec<Entity>, CliError> {
    tracing::debug!(%dialect, entity, "running query");
    match dialect {
        Dialect::SQLite => {
            let conn = rusqlite::Connection::open(database).map_err(nestql::error::NestqlError::from)?;
            let db = Nestql::new(RusqliteExecutor::new(conn)?, schema, SQLiteDialect);
            Ok(db.find(entity, filter).await?)
        }
        Dialect::PostgreSQL => {
            let (client, connection) = tokio_postgres::connect(database, tokio_postgres::NoTls)
                .await
                .map_err(nestql::error::NestqlError::from)?;
            tokio::spawn(async move {
                if let Err(e) = connection.await {
                    tracing::error!("postgres connection error: {e}");
                }
            });
            let db = Nestql::new(TokioPostgresExecutor::new(client), schema, PostgresDialect);
            Ok(db.find(entity, filter).await?)
        }
        Dialect::MySQL => Err(CliError::Other(
            "no execution channel for mysql; use `nestql compile` and run the SQL yourself".into(),
        )),
    }
}
