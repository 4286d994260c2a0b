#![allow(dead_code)]

use nestql::prelude::*;
use nestql::sqlite::SQLiteDialect;
use nestql::sqlite::rusqlite::RusqliteExecutor;
use rusqlite::Connection;

pub type Db = Nestql<RusqliteExecutor, Schema, SQLiteDialect>;

/// Customers, their orders and order items, a profile per customer and
/// many-to-many tags.
pub fn shop_schema() -> Schema {
    Schema::new()
        .entity(
            "Customer",
            EntityDef::new("customers")
                .field("id")
                .field("name")
                .field("status")
                .field("age")
                .typed_field("vip", "vip", FieldType::Boolean)
                .typed_field("createdAt", "created_at", FieldType::Date)
                .relation("orders", RelationMeta::has_many("Order", "customerId"))
                .relation("profile", RelationMeta::has_one("Profile", "customerId"))
                .relation(
                    "tags",
                    RelationMeta::has_many_through("Tag", "CustomerTag", "customerId", "tagId"),
                ),
        )
        .entity(
            "Order",
            EntityDef::new("orders")
                .field("id")
                .typed_field("customerId", "customer_id", FieldType::Scalar)
                .field("total")
                .relation("customer", RelationMeta::belongs_to("Customer", "customerId"))
                .relation("items", RelationMeta::has_many("Item", "orderId")),
        )
        .entity(
            "Item",
            EntityDef::new("items")
                .field("id")
                .typed_field("orderId", "order_id", FieldType::Scalar)
                .field("sku"),
        )
        .entity(
            "Profile",
            EntityDef::new("profiles")
                .field("id")
                .typed_field("customerId", "customer_id", FieldType::Scalar)
                .field("bio"),
        )
        .entity("Tag", EntityDef::new("tags").field("id").field("label"))
        .entity(
            "CustomerTag",
            EntityDef::new("customer_tags")
                .typed_field("customerId", "customer_id", FieldType::Scalar)
                .typed_field("tagId", "tag_id", FieldType::Scalar),
        )
}

pub const SEED: &str = "
    CREATE TABLE customers (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        status TEXT NOT NULL,
        age INTEGER NOT NULL,
        vip INTEGER NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE TABLE orders (
        id INTEGER PRIMARY KEY,
        customer_id INTEGER NOT NULL REFERENCES customers(id),
        total INTEGER NOT NULL
    );
    CREATE TABLE items (
        id INTEGER PRIMARY KEY,
        order_id INTEGER NOT NULL REFERENCES orders(id),
        sku TEXT NOT NULL
    );
    CREATE TABLE profiles (
        id INTEGER PRIMARY KEY,
        customer_id INTEGER NOT NULL REFERENCES customers(id),
        bio TEXT NOT NULL
    );
    CREATE TABLE tags (id INTEGER PRIMARY KEY, label TEXT NOT NULL);
    CREATE TABLE customer_tags (
        customer_id INTEGER NOT NULL REFERENCES customers(id),
        tag_id INTEGER NOT NULL REFERENCES tags(id)
    );

    INSERT INTO customers (id, name, status, age, vip, created_at) VALUES
        (1, 'John Smith', 'A', 34, 1, '2024-01-05 10:00:00'),
        (2, 'jane doe', 'B', 28, 0, '2024-02-10 09:30:00'),
        (3, 'Bob Stone', 'A', 45, 0, '2024-03-15 12:00:00');
    INSERT INTO orders (id, customer_id, total) VALUES
        (10, 1, 100), (11, 1, 250), (12, 1, 50), (13, 3, 75);
    INSERT INTO items (id, order_id, sku) VALUES
        (100, 10, 'A-1'), (101, 10, 'B-2'), (102, 11, 'C-3');
    INSERT INTO profiles (id, customer_id, bio) VALUES (1, 1, 'likes tea');
    INSERT INTO tags (id, label) VALUES (1, 'gold'), (2, 'early'), (3, 'west');
    INSERT INTO customer_tags (customer_id, tag_id) VALUES (1, 1), (1, 2), (3, 3);
";

pub fn setup_db() -> Db {
    let conn = Connection::open_in_memory().expect("open in-memory database");
    conn.execute_batch(SEED).expect("seed database");
    let executor = RusqliteExecutor::new(conn).expect("register sqlite functions");
    Nestql::new(executor, shop_schema(), SQLiteDialect)
}

pub fn filter(value: serde_json::Value) -> Filter {
    Filter::from_json(&value).expect("valid filter")
}

pub fn names(entities: &[Entity]) -> Vec<&str> {
    entities
        .iter()
        .map(|e| e.get("name").and_then(|v| v.as_str()).unwrap_or_default())
        .collect()
}

pub fn ids(entities: &[Entity]) -> Vec<i64> {
    entities
        .iter()
        .map(|e| e.get("id").and_then(|v| v.as_i64()).unwrap_or_default())
        .collect()
}
