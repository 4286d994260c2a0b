use crate::alias::{Alias, AliasCounter};
use crate::dialect::{DialectAdapter, JsonField};
use crate::error::Result;
use crate::filter::{self, Filter, OrderBy};
use crate::nestql_trace_compile;
use crate::schema::SchemaProvider;

use super::QueryCompiler;

/// Context of one nesting level.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Level<'l> {
    pub alias: Alias,
    pub join: Option<&'l str>,
    pub sub_where: Option<&'l str>,
    pub multiple: bool,
    /// Row cap applied when the filter sets no limit (to-one relations).
    pub implicit_limit: Option<u64>,
}

impl<S, D> QueryCompiler<'_, S, D>
where
    S: SchemaProvider + ?Sized,
    D: DialectAdapter + ?Sized,
{
    /// Builds `SELECT <aggregate> AS data FROM ...` for one level and
    /// returns it with the counter advanced past every alias it consumed.
    pub(crate) fn statement(
        &self,
        entity: &str,
        filter: &Filter,
        level: &Level<'_>,
        counter: AliasCounter,
    ) -> Result<(String, AliasCounter)> {
        nestql_trace_compile!(entity, level.alias, level.multiple);

        let alias = level.alias;
        let table = self.dialect.quote_ident(self.schema.table_name(entity)?);

        let mut fields: Vec<JsonField> =
            filter::project(filter.fields.as_ref(), self.schema.field_names(entity)?)
                .into_iter()
                .map(|field| JsonField::new(field, self.column(entity, alias, field)))
                .collect();
        let (relations, counter) = self.includes(entity, &filter.include, alias, counter)?;
        fields.extend(relations);

        let order = self.order_by(entity, &filter.order, alias);
        let ordered = (!order.is_empty()).then_some(order.as_str());
        let aggregate = if level.multiple {
            self.dialect.aggregate_array(&fields, ordered)?
        } else {
            self.dialect.aggregate_object(&fields)?
        };

        let mut source = format!("{table} AS {alias}");
        if let Some(join) = level.join {
            source.push(' ');
            source.push_str(join);
        }

        let predicate = self.predicate(entity, filter.r#where.as_ref(), alias)?;
        let conditions: Vec<&str> = level
            .sub_where
            .into_iter()
            .chain(predicate.as_deref())
            .collect();
        let limit = filter.limit.or(level.implicit_limit);

        let mut tail = String::new();
        if !conditions.is_empty() {
            tail.push_str(" WHERE ");
            tail.push_str(&conditions.join(" AND "));
        }
        if !order.is_empty() {
            tail.push_str(" ORDER BY ");
            tail.push_str(&order);
        }
        if let Some(limit) = limit {
            tail.push_str(&format!(" LIMIT {limit}"));
            if let Some(skip) = filter.skip {
                tail.push_str(&format!(" OFFSET {skip}"));
            }
        }

        // An aggregate collapses its rows before ORDER BY/LIMIT apply, so a
        // paged plural level selects its rows in a derived table first.
        let sql = if level.multiple && (limit.is_some() || ordered.is_some()) {
            let cut = if ordered.is_some() && self.dialect.windowed_array() {
                " LIMIT 1"
            } else {
                ""
            };
            format!("SELECT {aggregate} AS data FROM (SELECT {alias}.* FROM {source}{tail}) AS {alias}{cut}")
        } else {
            format!("SELECT {aggregate} AS data FROM {source}{tail}")
        };
        Ok((sql, counter))
    }

    fn order_by(&self, entity: &str, order: &[OrderBy], alias: Alias) -> String {
        order
            .iter()
            .map(|entry| {
                let column = self.column(entity, alias, &entry.field);
                match entry.direction {
                    Some(direction) => format!("{column} {}", direction.as_sql()),
                    None => column,
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
