#![cfg(all(feature = "sqlite", feature = "postgres", feature = "mysql"))]
mod common;

use common::{filter, shop_schema};
use nestql::prelude::*;
use serde_json::json;

fn compiled(dialect: Dialect) -> String {
    let f = filter(json!({
        "fields": ["id", "name"],
        "where": {"status": "A"},
        "order": "name",
        "include": [
            {"relation": "orders", "scope": {"fields": ["id", "total"], "order": "total DESC", "limit": 2}},
            {"relation": "tags", "scope": {"fields": ["label"]}},
        ],
    }));
    let adapter = adapter_for(dialect).unwrap();
    compile(&shop_schema(), &adapter, "Customer", &f, &CompileOptions::default())
        .unwrap()
        .into_sql()
}

#[test]
fn sqlite_statement() {
    assert_eq!(
        compiled(Dialect::SQLite),
        concat!(
            r#"SELECT json_object('id', _0."id", 'name', _0."name", "#,
            r#"'orders', json((SELECT json_group_array(json_object('id', _1."id", 'total', _1."total")) AS data "#,
            r#"FROM (SELECT _1.* FROM "orders" AS _1 WHERE _1."customer_id" = _0."id" "#,
            r#"ORDER BY _1."total" DESC LIMIT 2) AS _1)), "#,
            r#"'tags', json((SELECT json_group_array(json_object('label', _3."label")) AS data "#,
            r#"FROM "tags" AS _3 INNER JOIN "customer_tags" AS _2 ON _2."tag_id" = _3."id" "#,
            r#"WHERE _2."customer_id" = _0."id"))) AS data "#,
            r#"FROM "customers" AS _0 WHERE _0."status" = 'A' ORDER BY _0."name""#,
        )
    );
}

#[test]
fn postgres_statement() {
    assert_eq!(
        compiled(Dialect::PostgreSQL),
        concat!(
            r#"SELECT json_build_object('id', _0."id", 'name', _0."name", "#,
            r#"'orders', (SELECT COALESCE(json_agg(json_build_object('id', _1."id", 'total', _1."total") "#,
            r#"ORDER BY _1."total" DESC), '[]'::json) AS data "#,
            r#"FROM (SELECT _1.* FROM "orders" AS _1 WHERE _1."customer_id" = _0."id" "#,
            r#"ORDER BY _1."total" DESC LIMIT 2) AS _1), "#,
            r#"'tags', (SELECT COALESCE(json_agg(json_build_object('label', _3."label")), '[]'::json) AS data "#,
            r#"FROM "tags" AS _3 INNER JOIN "customer_tags" AS _2 ON _2."tag_id" = _3."id" "#,
            r#"WHERE _2."customer_id" = _0."id")) AS data "#,
            r#"FROM "customers" AS _0 WHERE _0."status" = 'A' ORDER BY _0."name""#,
        )
    );
}

#[test]
fn mysql_statement() {
    assert_eq!(
        compiled(Dialect::MySQL),
        concat!(
            "SELECT JSON_OBJECT('id', _0.`id`, 'name', _0.`name`, ",
            "'orders', (SELECT JSON_ARRAYAGG(JSON_OBJECT('id', _1.`id`, 'total', _1.`total`)) ",
            "OVER (ORDER BY _1.`total` DESC ROWS BETWEEN UNBOUNDED PRECEDING AND UNBOUNDED FOLLOWING) AS data ",
            "FROM (SELECT _1.* FROM `orders` AS _1 WHERE _1.`customer_id` = _0.`id` ",
            "ORDER BY _1.`total` DESC LIMIT 2) AS _1 LIMIT 1), ",
            "'tags', (SELECT JSON_ARRAYAGG(JSON_OBJECT('label', _3.`label`)) AS data ",
            "FROM `tags` AS _3 INNER JOIN `customer_tags` AS _2 ON _2.`tag_id` = _3.`id` ",
            "WHERE _2.`customer_id` = _0.`id`)) AS data ",
            "FROM `customers` AS _0 WHERE _0.`status` = 'A' ORDER BY _0.`name`",
        )
    );
}

#[test]
fn every_dialect_is_deterministic() {
    for dialect in [Dialect::SQLite, Dialect::PostgreSQL, Dialect::MySQL] {
        assert_eq!(compiled(dialect), compiled(dialect));
    }
}

#[test]
fn deep_include_tree_has_one_subquery_per_edge() {
    let f = filter(json!({"include": {"orders": {"items": true}, "profile": true, "tags": true}}));
    let sql = compile(&shop_schema(), &adapter_for(Dialect::PostgreSQL).unwrap(), "Customer", &f, &CompileOptions::default())
        .unwrap()
        .into_sql();
    assert_eq!(sql.matches("(SELECT").count(), 4);
    for alias in ["_1", "_2", "_3", "_4", "_5"] {
        assert_eq!(sql.matches(&format!(" AS {alias}")).count(), 1, "{alias} in {sql}");
    }
}

#[test]
fn string_literals_follow_dialect_escaping() {
    let f = filter(json!({"fields": ["id"], "where": {"name": "O'Brien \\ co"}}));
    let sql = |d| {
        compile(&shop_schema(), &adapter_for(d).unwrap(), "Customer", &f, &CompileOptions::default())
            .unwrap()
            .into_sql()
    };
    assert!(sql(Dialect::SQLite).ends_with(r#"WHERE _0."name" = 'O''Brien \ co'"#));
    assert!(sql(Dialect::PostgreSQL).ends_with(r#"WHERE _0."name" = 'O''Brien \ co'"#));
    assert!(sql(Dialect::MySQL).ends_with(r"WHERE _0.`name` = 'O''Brien \\ co'"));
}

#[test]
fn ordered_plural_include_orders_the_aggregate() {
    let f = filter(json!({
        "fields": ["id"],
        "include": {"relation": "orders", "scope": {"fields": ["id"], "order": "total DESC"}},
    }));
    let sql = |d| {
        compile(&shop_schema(), &adapter_for(d).unwrap(), "Customer", &f, &CompileOptions::default())
            .unwrap()
            .into_sql()
    };

    assert_eq!(
        sql(Dialect::PostgreSQL),
        concat!(
            r#"SELECT json_build_object('id', _0."id", "#,
            r#"'orders', (SELECT COALESCE(json_agg(json_build_object('id', _1."id") ORDER BY _1."total" DESC), '[]'::json) AS data "#,
            r#"FROM (SELECT _1.* FROM "orders" AS _1 WHERE _1."customer_id" = _0."id" ORDER BY _1."total" DESC) AS _1)) AS data "#,
            r#"FROM "customers" AS _0"#,
        )
    );
    assert!(sql(Dialect::MySQL).contains(
        "(SELECT JSON_ARRAYAGG(JSON_OBJECT('id', _1.`id`)) OVER (ORDER BY _1.`total` DESC \
         ROWS BETWEEN UNBOUNDED PRECEDING AND UNBOUNDED FOLLOWING) AS data \
         FROM (SELECT _1.* FROM `orders` AS _1 WHERE _1.`customer_id` = _0.`id` ORDER BY _1.`total` DESC) AS _1 LIMIT 1)"
    ));

    // unordered plural levels aggregate directly
    let plain = filter(json!({"fields": ["id"], "include": {"relation": "orders", "scope": {"fields": ["id"]}}}));
    let pg = compile(&shop_schema(), &adapter_for(Dialect::PostgreSQL).unwrap(), "Customer", &plain, &CompileOptions::default())
        .unwrap()
        .into_sql();
    assert!(pg.contains("COALESCE(json_agg(json_build_object('id', _1.\"id\")), '[]'::json) AS data FROM \"orders\" AS _1"));
}
