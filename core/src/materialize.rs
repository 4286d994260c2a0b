//! Turns the JSON `data` payloads of a compiled statement back into an
//! entity graph. Nothing here touches the database: every relation the filter
//! asked for is already embedded in the payload.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::error::{NestqlError, Result};
use crate::executor::Row;
use crate::filter::{self, Filter};
use crate::nestql_trace_rows;
use crate::schema::{FieldType, Multiplicity, SchemaProvider};

/// A materialized entity with its projected attributes and populated relations.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub model: String,
    pub attributes: BTreeMap<String, Value>,
    pub relations: BTreeMap<String, Related>,
}

/// The value of one populated relation.
#[derive(Debug, Clone, PartialEq)]
pub enum Related {
    One(Box<Entity>),
    Many(Vec<Entity>),
}

impl Entity {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            attributes: BTreeMap::new(),
            relations: BTreeMap::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    pub fn related(&self, relation: &str) -> Option<&Related> {
        self.relations.get(relation)
    }

    /// The to-one relation `relation`, if populated.
    pub fn one(&self, relation: &str) -> Option<&Entity> {
        match self.relations.get(relation)? {
            Related::One(entity) => Some(entity),
            Related::Many(_) => None,
        }
    }

    /// The to-many relation `relation`; empty when absent.
    pub fn many(&self, relation: &str) -> &[Entity] {
        match self.relations.get(relation) {
            Some(Related::Many(entities)) => entities,
            _ => &[],
        }
    }

    /// Plain JSON view: attributes followed by relations, inline.
    pub fn to_json(&self) -> Value {
        let mut out: Map<String, Value> = self
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (name, related) in &self.relations {
            let value = match related {
                Related::One(entity) => entity.to_json(),
                Related::Many(entities) => Value::Array(entities.iter().map(Entity::to_json).collect()),
            };
            out.insert(name.clone(), value);
        }
        Value::Object(out)
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len() + self.relations.len()))?;
        for (key, value) in &self.attributes {
            map.serialize_entry(key, value)?;
        }
        for (key, related) in &self.relations {
            map.serialize_entry(key, related)?;
        }
        map.end()
    }
}

impl Serialize for Related {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Related::One(entity) => entity.serialize(serializer),
            Related::Many(entities) => entities.serialize(serializer),
        }
    }
}

/// Materializes the rows returned for `filter` compiled on `entity`.
pub fn materialize<S: SchemaProvider + ?Sized>(
    schema: &S,
    entity: &str,
    filter: &Filter,
    rows: &[Row],
) -> Result<Vec<Entity>> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(data) = row.data.as_deref() else {
            continue;
        };
        match serde_json::from_str::<Value>(data)? {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    out.push(entity_from(schema, entity, filter, item)?);
                }
            }
            object @ Value::Object(_) => out.push(entity_from(schema, entity, filter, object)?),
            other => {
                return Err(NestqlError::Materialize(format!(
                    "expected an object or array for `{entity}`, got {other}"
                )));
            }
        }
    }
    nestql_trace_rows!(entity, rows.len(), out.len());
    Ok(out)
}

fn entity_from<S: SchemaProvider + ?Sized>(
    schema: &S,
    entity: &str,
    filter: &Filter,
    value: Value,
) -> Result<Entity> {
    let mut object = match value {
        Value::Object(object) => object,
        other => {
            return Err(NestqlError::Materialize(format!(
                "expected an object for `{entity}`, got {other}"
            )));
        }
    };

    let mut out = Entity::new(entity);
    for field in filter::project(filter.fields.as_ref(), schema.field_names(entity)?) {
        if let Some(value) = object.remove(field) {
            out.attributes
                .insert(field.to_string(), coerce(schema.field_type(entity, field), value));
        }
    }

    let empty = Filter::default();
    for include in &filter.include {
        let meta = schema.relation(entity, &include.relation)?;
        let scope = include.scope.as_deref().unwrap_or(&empty);
        let target = meta.target.as_str();
        let payload = match object.remove(&include.relation) {
            Some(Value::String(text)) => serde_json::from_str(&text)?,
            Some(value) => value,
            None => Value::Null,
        };

        let related = match (meta.multiplicity(), payload) {
            (Multiplicity::Many, Value::Null) => Related::Many(Vec::new()),
            (Multiplicity::Many, Value::Array(items)) => Related::Many(
                items
                    .into_iter()
                    .map(|item| entity_from(schema, target, scope, item))
                    .collect::<Result<_>>()?,
            ),
            (Multiplicity::One, Value::Null) => continue,
            (Multiplicity::One, object @ Value::Object(_)) => {
                Related::One(Box::new(entity_from(schema, target, scope, object)?))
            }
            (_, other) => {
                return Err(NestqlError::Materialize(format!(
                    "unexpected payload for relation `{entity}.{}`: {other}",
                    include.relation
                )));
            }
        };
        out.relations.insert(include.relation.clone(), related);
    }

    Ok(out)
}

fn coerce(field_type: FieldType, value: Value) -> Value {
    match (field_type, &value) {
        (FieldType::Boolean, Value::Number(n)) => match n.as_i64() {
            Some(0) => Value::Bool(false),
            Some(1) => Value::Bool(true),
            _ => value,
        },
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::query::tests::shop;
    use crate::schema::{EntityDef, Schema};

    fn filter(value: Value) -> Filter {
        Filter::from_json(&value).unwrap()
    }

    #[test]
    fn object_payload_yields_one_entity() {
        let rows = [Row::new(r#"{"id": 1, "name": "Ann", "status": "A", "age": 30, "createdAt": null}"#)];
        let out = materialize(&shop(), "Customer", &Filter::new(), &rows).unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].model, "Customer");
        assert_eq!(out[0].get("name"), Some(&json!("Ann")));
        assert_eq!(out[0].get("createdAt"), Some(&Value::Null));
        assert!(out[0].relations.is_empty());
    }

    #[test]
    fn array_payload_yields_one_entity_per_element() {
        let rows = [Row::new(r#"[{"id": 1}, {"id": 2}, {"id": 3}]"#)];
        let out = materialize(&shop(), "Customer", &filter(json!({"fields": ["id"]})), &rows).unwrap();
        let ids: Vec<_> = out.iter().map(|e| e.get("id").cloned().unwrap()).collect();
        assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn repeated_materialization_gives_independent_graphs() {
        let f = filter(json!({"fields": ["id", "name"], "include": {"relation": "orders", "scope": {"fields": ["id"]}}}));
        let rows = [Row::new(r#"{"id":1,"name":"A","orders":[{"id":10},{"id":11}]}"#)];

        let mut first = materialize(&shop(), "Customer", &f, &rows).unwrap();
        let second = materialize(&shop(), "Customer", &f, &rows).unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].many("orders").len(), 2);

        let Some(Related::Many(orders)) = first[0].relations.get_mut("orders") else {
            panic!("orders should be a collection");
        };
        orders[0].attributes.insert("id".to_string(), json!(99));
        orders.pop();

        assert_ne!(first, second);
        let untouched: Vec<_> = second[0].many("orders").iter().map(|o| o.get("id").cloned().unwrap()).collect();
        assert_eq!(untouched, vec![json!(10), json!(11)]);
    }

    #[test]
    fn null_rows_are_skipped() {
        let rows = [Row::null(), Row::new("null")];
        assert!(materialize(&shop(), "Customer", &Filter::new(), &rows).unwrap().is_empty());
    }

    #[test]
    fn nested_relations_follow_the_include_tree() {
        let f = filter(json!({
            "fields": ["id"],
            "include": [
                {"relation": "orders", "scope": {"fields": ["id"], "include": "items"}},
                "profile",
                "tags",
            ]
        }));
        let rows = [Row::new(
            json!({
                "id": 1,
                "orders": [
                    {"id": 10, "items": [{"id": 100, "orderId": 10, "sku": "A"}]},
                    {"id": 11, "items": null},
                ],
                "profile": {"id": 5, "customerId": 1, "bio": "hi"},
                "tags": null,
            })
            .to_string(),
        )];

        let out = materialize(&shop(), "Customer", &f, &rows).unwrap();
        let customer = &out[0];
        let orders = customer.many("orders");
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].model, "Order");
        assert_eq!(orders[0].many("items")[0].get("sku"), Some(&json!("A")));
        assert!(orders[1].many("items").is_empty());
        assert_eq!(customer.one("profile").unwrap().get("bio"), Some(&json!("hi")));
        assert_eq!(customer.related("tags"), Some(&Related::Many(Vec::new())));
    }

    #[test]
    fn missing_to_one_is_absent() {
        let f = filter(json!({"fields": ["id"], "include": "profile"}));
        let rows = [Row::new(r#"{"id": 1, "profile": null}"#)];
        let out = materialize(&shop(), "Customer", &f, &rows).unwrap();
        assert!(out[0].related("profile").is_none());
    }

    #[test]
    fn relation_given_as_json_text_is_parsed() {
        let f = filter(json!({"fields": ["id"], "include": {"relation": "orders", "scope": {"fields": ["id"]}}}));
        let rows = [Row::new(r#"{"id": 1, "orders": "[{\"id\": 7}]"}"#)];
        let out = materialize(&shop(), "Customer", &f, &rows).unwrap();
        assert_eq!(out[0].many("orders")[0].get("id"), Some(&json!(7)));
    }

    #[test]
    fn boolean_fields_accept_integers() {
        let schema = Schema::new().entity(
            "Flag",
            EntityDef::new("flags")
                .field("id")
                .typed_field("on", "on", FieldType::Boolean),
        );
        let rows = [Row::new(r#"[{"id": 1, "on": 1}, {"id": 2, "on": 0}, {"id": 3, "on": true}]"#)];
        let out = materialize(&schema, "Flag", &Filter::new(), &rows).unwrap();
        let flags: Vec<_> = out.iter().map(|e| e.get("on").cloned().unwrap()).collect();
        assert_eq!(flags, vec![json!(true), json!(false), json!(true)]);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let err = materialize(&shop(), "Customer", &Filter::new(), &[Row::new("{not json")]).unwrap_err();
        assert!(matches!(err, NestqlError::MalformedPayload(_)));

        let err = materialize(&shop(), "Customer", &Filter::new(), &[Row::new("42")]).unwrap_err();
        assert!(matches!(err, NestqlError::Materialize(_)));

        let f = filter(json!({"fields": ["id"], "include": "orders"}));
        let err = materialize(&shop(), "Customer", &f, &[Row::new(r#"{"id": 1, "orders": 3}"#)]).unwrap_err();
        assert!(matches!(err, NestqlError::Materialize(_)));
    }

    #[test]
    fn serializes_with_relations_inline() {
        let f = filter(json!({"fields": ["id"], "include": {"relation": "orders", "scope": {"fields": ["id"]}}}));
        let rows = [Row::new(r#"{"id": 1, "orders": [{"id": 7}]}"#)];
        let out = materialize(&shop(), "Customer", &f, &rows).unwrap();

        let expected = json!({"id": 1, "orders": [{"id": 7}]});
        assert_eq!(serde_json::to_value(&out[0]).unwrap(), expected);
        assert_eq!(out[0].to_json(), expected);
    }
}
