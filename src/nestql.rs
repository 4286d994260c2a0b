use nestql_core::error::Result;
use nestql_core::filter::{Filter, Where};
use nestql_core::literal::Literal;
use nestql_core::query::{CompileOptions, CompiledStatement, QueryCompiler};
use nestql_core::{DialectAdapter, Entity, Executor, Schema, SchemaProvider, materialize};

/// Compile → execute → materialize in one call.
///
/// The dialect adapter is fixed at construction; see [`crate::adapter_for`]
/// to pick one from a [`Dialect`](crate::Dialect) value.
#[derive(Debug, Clone)]
pub struct Nestql<E, S = Schema, D = Box<dyn DialectAdapter>> {
    executor: E,
    schema: S,
    dialect: D,
}

impl<E, S, D> Nestql<E, S, D>
where
    E: Executor,
    S: SchemaProvider,
    D: DialectAdapter,
{
    pub fn new(executor: E, schema: S, dialect: D) -> Self {
        Self {
            executor,
            schema,
            dialect,
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    /// The statement [`Nestql::find`] would run.
    pub fn compile(&self, entity: &str, filter: &Filter) -> Result<CompiledStatement> {
        QueryCompiler::new(&self.schema, &self.dialect).compile(
            entity,
            filter,
            &CompileOptions::default(),
        )
    }

    /// Every `entity` matching `filter`, with its includes populated.
    pub async fn find(&self, entity: &str, filter: &Filter) -> Result<Vec<Entity>> {
        let statement = self.compile(entity, filter)?;
        let rows = self.executor.execute(statement.sql(), &[]).await?;
        materialize(&self.schema, entity, filter, &rows)
    }

    /// The first match, if any.
    pub async fn find_one(&self, entity: &str, filter: &Filter) -> Result<Option<Entity>> {
        let filter = Filter {
            limit: Some(1),
            ..filter.clone()
        };
        Ok(self.find(entity, &filter).await?.into_iter().next())
    }

    /// The entity whose id field equals `id`, AND-ed with the filter's own
    /// predicate.
    pub async fn find_by_id(
        &self,
        entity: &str,
        id: impl Into<Literal>,
        filter: &Filter,
    ) -> Result<Option<Entity>> {
        let by_id = Where::eq(self.schema.id_field(entity), id);
        let predicate = match filter.r#where.clone() {
            Some(existing) => Where::and([by_id, existing]),
            None => by_id,
        };
        let filter = Filter {
            r#where: Some(predicate),
            ..filter.clone()
        };
        self.find_one(entity, &filter).await
    }
}
