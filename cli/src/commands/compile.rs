//! Compile command - prints the SQL for a filter

use nestql::{CompileOptions, Filter, adapter_for, compile};

use crate::config::Config;
use crate::error::CliError;

/// The statement `filter` compiles to on `entity`.
pub fn render(
    config: &Config,
    entity: &str,
    filter: &Filter,
    multiple: bool,
) -> Result<String, CliError> {
    let schema = config.load_schema()?;
    let adapter = adapter_for(config.dialect)?;
    let options = CompileOptions {
        multiple,
        ..CompileOptions::default()
    };
    tracing::debug!(dialect = %config.dialect, entity, multiple, "compiling filter");
    Ok(compile(&schema, &adapter, entity, filter, &options)?.into_sql())
}

pub fn run(config: &Config, entity: &str, filter: &Filter, multiple: bool) -> Result<(), CliError> {
    println!("{}", render(config, entity, filter, multiple)?);
    Ok(())
}
