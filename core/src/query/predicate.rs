use crate::alias::Alias;
use crate::dialect::DialectAdapter;
use crate::error::{NestqlError, Result};
use crate::filter::{Condition, Op, Where};
use crate::literal::{Literal, format_literal};
use crate::schema::SchemaProvider;

use super::QueryCompiler;

impl<S, D> QueryCompiler<'_, S, D>
where
    S: SchemaProvider + ?Sized,
    D: DialectAdapter + ?Sized,
{
    pub(crate) fn predicate(
        &self,
        entity: &str,
        predicate: Option<&Where>,
        alias: Alias,
    ) -> Result<Option<String>> {
        predicate
            .map(|node| self.where_clause(entity, node, alias))
            .transpose()
    }

    fn where_clause(&self, entity: &str, node: &Where, alias: Alias) -> Result<String> {
        match node {
            Where::And(children) => self.group(entity, children, alias, " AND "),
            Where::Or(children) => self.group(entity, children, alias, " OR "),
            Where::Condition(condition) => self.condition(entity, condition, alias),
        }
    }

    fn group(&self, entity: &str, children: &[Where], alias: Alias, sep: &str) -> Result<String> {
        if children.is_empty() {
            return Err(NestqlError::InvalidFilter(format!(
                "empty {} group",
                sep.trim()
            )));
        }
        let parts = children
            .iter()
            .map(|child| self.where_clause(entity, child, alias))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("({})", parts.join(sep)))
    }

    fn condition(&self, entity: &str, condition: &Condition, alias: Alias) -> Result<String> {
        let field = condition.field.as_str();
        let column = self.column(entity, alias, field);
        let field_type = self.schema.field_type(entity, field);
        let lit = |literal: &Literal| format_literal(self.dialect, field, field_type, literal);
        let list = |values: &[Literal]| -> Result<String> {
            Ok(values.iter().map(|value| lit(value)).collect::<Result<Vec<_>>>()?.join(", "))
        };

        Ok(match &condition.op {
            Op::Eq(value) => format!("{column} = {}", lit(value)?),
            Op::Neq(value) => format!("{column} != {}", lit(value)?),
            Op::IsNull => format!("{column} IS NULL"),
            Op::IsNotNull => format!("{column} IS NOT NULL"),
            Op::Gt(value) => format!("{column} > {}", lit(value)?),
            Op::Gte(value) => format!("{column} >= {}", lit(value)?),
            Op::Lt(value) => format!("{column} < {}", lit(value)?),
            Op::Lte(value) => format!("{column} <= {}", lit(value)?),
            Op::Between(low, high) => {
                format!("{column} BETWEEN {} AND {}", lit(low)?, lit(high)?)
            }
            Op::In(values) if values.is_empty() => "1 = 0".to_string(),
            Op::In(values) => format!("{column} IN ({})", list(values)?),
            Op::NotIn(values) if values.is_empty() => "1 = 1".to_string(),
            Op::NotIn(values) => format!("{column} NOT IN ({})", list(values)?),
            Op::Like(pattern) => self.dialect.compare_like(&column, pattern)?,
            Op::NotLike(pattern) => self.dialect.compare_not_like(&column, pattern)?,
        })
    }
}
