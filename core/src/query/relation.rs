use crate::alias::{Alias, AliasCounter};
use crate::dialect::{DialectAdapter, JsonField};
use crate::error::Result;
use crate::filter::{Filter, Include};
use crate::schema::{Multiplicity, RelationKind, RelationMeta, SchemaProvider, Through};

use super::QueryCompiler;
use super::statement::Level;

impl<S, D> QueryCompiler<'_, S, D>
where
    S: SchemaProvider + ?Sized,
    D: DialectAdapter + ?Sized,
{
    /// Compiles every include of `entity` into a JSON field holding its
    /// correlated subquery. Includes are visited in declaration order; each one
    /// starts from the counter the previous one returned.
    pub(crate) fn includes(
        &self,
        entity: &str,
        includes: &[Include],
        parent: Alias,
        mut counter: AliasCounter,
    ) -> Result<(Vec<JsonField>, AliasCounter)> {
        let empty = Filter::default();
        let mut fields = Vec::with_capacity(includes.len());

        for include in includes {
            let meta = self.schema.relation(entity, &include.relation)?;
            let scope = include.scope.as_deref().unwrap_or(&empty);
            let (sql, next) = match &meta.through {
                None => self.direct(entity, meta, scope, parent, counter)?,
                Some(through) => self.through(entity, meta, through, scope, parent, counter)?,
            };
            fields.push(JsonField::new(
                include.relation.as_str(),
                self.dialect.embed_subquery(&sql),
            ));
            counter = next;
        }

        Ok((fields, counter))
    }

    /// belongsTo / hasOne / hasMany.
    fn direct(
        &self,
        entity: &str,
        meta: &RelationMeta,
        scope: &Filter,
        parent: Alias,
        counter: AliasCounter,
    ) -> Result<(String, AliasCounter)> {
        let (alias, counter) = counter.next()?;
        let target = meta.target.as_str();

        let correlation = match meta.kind {
            RelationKind::BelongsTo => format!(
                "{} = {}",
                self.column(target, alias, &meta.owner_key),
                self.column(entity, parent, &meta.foreign_key)
            ),
            RelationKind::HasOne | RelationKind::HasMany => format!(
                "{} = {}",
                self.column(target, alias, &meta.foreign_key),
                self.column(entity, parent, &meta.owner_key)
            ),
        };

        let multiple = meta.multiplicity() == Multiplicity::Many;
        let level = Level {
            alias,
            join: None,
            sub_where: Some(correlation.as_str()),
            multiple,
            implicit_limit: (!multiple).then_some(1),
        };
        self.statement(target, scope, &level, counter)
    }

    /// Many-to-many: the join table takes the first alias, the target the next.
    fn through(
        &self,
        entity: &str,
        meta: &RelationMeta,
        through: &Through,
        scope: &Filter,
        parent: Alias,
        counter: AliasCounter,
    ) -> Result<(String, AliasCounter)> {
        let (join_alias, counter) = counter.next()?;
        let (alias, counter) = counter.next()?;
        let target = meta.target.as_str();
        let join_entity = through.entity.as_str();

        let join = format!(
            "INNER JOIN {} AS {join_alias} ON {} = {}",
            self.dialect.quote_ident(self.schema.table_name(join_entity)?),
            self.column(join_entity, join_alias, &through.key_to_target),
            self.column(target, alias, &through.target_key)
        );
        let correlation = format!(
            "{} = {}",
            self.column(join_entity, join_alias, &through.key_to_owner),
            self.column(entity, parent, &meta.owner_key)
        );

        let level = Level {
            alias,
            join: Some(join.as_str()),
            sub_where: Some(correlation.as_str()),
            multiple: true,
            implicit_limit: None,
        };
        self.statement(target, scope, &level, counter)
    }
}
