//! Entity schema: the field→column mapping and relation graph the compiler
//! and materializer consult.
//!
//! [`SchemaProvider`] is the seam; [`Schema`] is the in-memory implementation,
//! built fluently or deserialized from a TOML schema file:
//!
//! ```toml
//! [entities.Customer]
//! table = "customers"
//! fields = [{ name = "id" }, { name = "createdAt", column = "created_at", type = "date" }]
//!
//! [entities.Customer.relations.orders]
//! target = "Order"
//! kind = "hasMany"
//! foreign_key = "customerId"
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{NestqlError, Result};

/// Logical type of an entity field, used for literal formatting and payload
/// coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Scalar,
    Boolean,
    Date,
}

/// Which side of a direct relation holds the foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    /// The parent holds `foreign_key`, pointing at the target's `owner_key`.
    BelongsTo,
    /// The target holds `foreign_key`, pointing at the parent's `owner_key`.
    HasOne,
    /// Like [`RelationKind::HasOne`], many targets per parent.
    HasMany,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    One,
    Many,
}

/// Join entity of a many-to-many relation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Through {
    /// Entity name of the join table.
    pub entity: String,
    /// Join-entity field referencing the parent's `owner_key`.
    #[serde(alias = "keyToOwner")]
    pub key_to_owner: String,
    /// Join-entity field referencing the target's `target_key`.
    #[serde(alias = "keyToTarget")]
    pub key_to_target: String,
    #[serde(default = "default_key", alias = "targetKey")]
    pub target_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelationMeta {
    pub target: String,
    pub kind: RelationKind,
    #[serde(default, alias = "foreignKey")]
    pub foreign_key: String,
    #[serde(default = "default_key", alias = "ownerKey")]
    pub owner_key: String,
    #[serde(default)]
    pub through: Option<Through>,
}

fn default_key() -> String {
    "id".to_string()
}

impl RelationMeta {
    fn direct(kind: RelationKind, target: &str, foreign_key: &str) -> Self {
        Self {
            target: target.to_string(),
            kind,
            foreign_key: foreign_key.to_string(),
            owner_key: default_key(),
            through: None,
        }
    }

    pub fn belongs_to(target: &str, foreign_key: &str) -> Self {
        Self::direct(RelationKind::BelongsTo, target, foreign_key)
    }

    pub fn has_one(target: &str, foreign_key: &str) -> Self {
        Self::direct(RelationKind::HasOne, target, foreign_key)
    }

    pub fn has_many(target: &str, foreign_key: &str) -> Self {
        Self::direct(RelationKind::HasMany, target, foreign_key)
    }

    /// Many-to-many relation through `join_entity`.
    pub fn has_many_through(
        target: &str,
        join_entity: &str,
        key_to_owner: &str,
        key_to_target: &str,
    ) -> Self {
        Self {
            target: target.to_string(),
            kind: RelationKind::HasMany,
            foreign_key: String::new(),
            owner_key: default_key(),
            through: Some(Through {
                entity: join_entity.to_string(),
                key_to_owner: key_to_owner.to_string(),
                key_to_target: key_to_target.to_string(),
                target_key: default_key(),
            }),
        }
    }

    pub fn owner_key(mut self, key: &str) -> Self {
        self.owner_key = key.to_string();
        self
    }

    pub fn multiplicity(&self) -> Multiplicity {
        match (self.kind, &self.through) {
            (_, Some(_)) | (RelationKind::HasMany, None) => Multiplicity::Many,
            (RelationKind::BelongsTo | RelationKind::HasOne, None) => Multiplicity::One,
        }
    }
}

/// The schema provider consumed by the compiler and the materializer.
pub trait SchemaProvider {
    /// Physical table name of `entity`.
    fn table_name<'a>(&'a self, entity: &str) -> Result<&'a str>;

    /// Logical field names of `entity`, in declaration order.
    fn field_names<'a>(&'a self, entity: &str) -> Result<Vec<&'a str>>;

    /// Physical column for `field`; unknown fields map to themselves.
    fn column_name<'a>(&'a self, entity: &str, field: &'a str) -> &'a str;

    fn field_type(&self, entity: &str, field: &str) -> FieldType;

    fn relation<'a>(&'a self, entity: &str, relation: &str) -> Result<&'a RelationMeta>;

    /// Identifier field used by `find_by_id`.
    fn id_field<'a>(&'a self, _entity: &str) -> &'a str {
        "id"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default, rename = "type")]
    pub field_type: FieldType,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntityDef {
    /// Table name; defaults to the entity name.
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default = "default_key")]
    pub id: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub relations: BTreeMap<String, RelationMeta>,
}

impl EntityDef {
    pub fn new(table: &str) -> Self {
        Self {
            table: Some(table.to_string()),
            id: default_key(),
            fields: Vec::new(),
            relations: BTreeMap::new(),
        }
    }

    /// Adds a scalar field stored in a column of the same name.
    pub fn field(self, name: &str) -> Self {
        self.typed_field(name, name, FieldType::Scalar)
    }

    pub fn typed_field(mut self, name: &str, column: &str, field_type: FieldType) -> Self {
        self.fields.push(FieldDef {
            name: name.to_string(),
            column: (column != name).then(|| column.to_string()),
            field_type,
        });
        self
    }

    pub fn id(mut self, field: &str) -> Self {
        self.id = field.to_string();
        self
    }

    pub fn relation(mut self, name: &str, meta: RelationMeta) -> Self {
        self.relations.insert(name.to_string(), meta);
        self
    }

    fn field_def(&self, field: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == field)
    }
}

/// In-memory schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub entities: BTreeMap<String, EntityDef>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(mut self, name: &str, def: EntityDef) -> Self {
        self.entities.insert(name.to_string(), def);
        self
    }

    /// Parses a TOML schema document.
    pub fn from_toml(source: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    fn def(&self, entity: &str) -> Result<&EntityDef> {
        self.entities
            .get(entity)
            .ok_or_else(|| NestqlError::UnknownEntity(entity.to_string()))
    }
}

impl SchemaProvider for Schema {
    fn table_name<'a>(&'a self, entity: &str) -> Result<&'a str> {
        let (name, def) = self
            .entities
            .get_key_value(entity)
            .ok_or_else(|| NestqlError::UnknownEntity(entity.to_string()))?;
        Ok(def.table.as_deref().unwrap_or(name))
    }

    fn field_names<'a>(&'a self, entity: &str) -> Result<Vec<&'a str>> {
        Ok(self.def(entity)?.fields.iter().map(|f| f.name.as_str()).collect())
    }

    fn column_name<'a>(&'a self, entity: &str, field: &'a str) -> &'a str {
        self.entities
            .get(entity)
            .and_then(|def| def.field_def(field))
            .and_then(|f| f.column.as_deref())
            .unwrap_or(field)
    }

    fn field_type(&self, entity: &str, field: &str) -> FieldType {
        self.entities
            .get(entity)
            .and_then(|def| def.field_def(field))
            .map(|f| f.field_type)
            .unwrap_or_default()
    }

    fn relation<'a>(&'a self, entity: &str, relation: &str) -> Result<&'a RelationMeta> {
        self.def(entity)?
            .relations
            .get(relation)
            .ok_or_else(|| NestqlError::UnknownRelation {
                entity: entity.to_string(),
                relation: relation.to_string(),
            })
    }

    fn id_field<'a>(&'a self, entity: &str) -> &'a str {
        self.entities
            .get(entity)
            .map(|def| def.id.as_str())
            .unwrap_or("id")
    }
}
