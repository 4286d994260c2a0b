//! Check command - validates the configuration and schema

use nestql::Schema;

use crate::config::Config;
use crate::error::CliError;
use crate::output;

/// Relations whose target or join entity is not defined.
pub fn dangling_relations(schema: &Schema) -> Vec<String> {
    let mut problems = Vec::new();
    for (name, entity) in &schema.entities {
        for (relation, meta) in &entity.relations {
            if !schema.entities.contains_key(&meta.target) {
                problems.push(format!("{name}.{relation}: unknown target `{}`", meta.target));
            }
            if let Some(through) = &meta.through {
                if !schema.entities.contains_key(&through.entity) {
                    problems.push(format!(
                        "{name}.{relation}: unknown join entity `{}`",
                        through.entity
                    ));
                }
            }
        }
    }
    problems
}

pub fn run(config: &Config) -> Result<(), CliError> {
    println!("{}", output::heading("Checking configuration..."));
    println!();
    println!("  {}: {}", output::label("Dialect"), config.dialect);
    println!("  {}: {}", output::label("Schema"), config.schema_path().display());
    match &config.database {
        Some(database) => println!("  {}: {}", output::label("Database"), database),
        None => println!("  {}: {}", output::label("Database"), output::muted("(not set)")),
    }

    println!();
    print!("  {} Schema... ", output::label("Checking"));
    let schema = match config.load_schema() {
        Ok(schema) => schema,
        Err(e) => {
            println!("{}", output::status_error());
            return Err(e.into());
        }
    };

    let problems = dangling_relations(&schema);
    if !problems.is_empty() {
        println!("{}", output::status_error());
        for problem in &problems {
            println!("    {problem}");
        }
        return Err(CliError::InvalidSchema(problems.join("; ")));
    }

    println!("{}", output::status_ok());
    for (name, entity) in &schema.entities {
        println!(
            "    {name} {}",
            output::muted(&format!(
                "({} fields, {} relations)",
                entity.fields.len(),
                entity.relations.len()
            ))
        );
    }

    println!();
    println!("{}", output::success("Configuration OK."));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_dangling_targets() {
        let schema = Schema::from_toml(
            r#"
            [entities.User]
            fields = [{ name = "id" }]

            [entities.User.relations.posts]
            target = "Post"
            kind = "hasMany"
            foreign_key = "userId"

            [entities.User.relations.groups]
            target = "User"
            kind = "hasMany"
            through = { entity = "Membership", key_to_owner = "userId", key_to_target = "groupId" }
            "#,
        )
        .unwrap();

        let problems = dangling_relations(&schema);
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("unknown join entity `Membership`"));
        assert!(problems[1].contains("unknown target `Post`"));
    }
}
