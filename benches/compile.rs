use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use nestql::prelude::*;
use nestql::sqlite::SQLiteDialect;
use nestql::sqlite::rusqlite::RusqliteExecutor;
use rusqlite::Connection;
use serde_json::json;
use std::hint::black_box;

fn schema() -> Schema {
    Schema::new()
        .entity(
            "User",
            EntityDef::new("users")
                .field("id")
                .field("name")
                .relation("posts", RelationMeta::has_many("Post", "userId")),
        )
        .entity(
            "Post",
            EntityDef::new("posts")
                .field("id")
                .typed_field("userId", "user_id", FieldType::Scalar)
                .field("title")
                .relation("comments", RelationMeta::has_many("Comment", "postId")),
        )
        .entity(
            "Comment",
            EntityDef::new("comments")
                .field("id")
                .typed_field("postId", "post_id", FieldType::Scalar)
                .field("body"),
        )
}

fn nested_filter() -> Filter {
    Filter::from_json(&json!({
        "where": {"or": [{"name": {"like": "User 1%"}}, {"id": {"inq": [1, 2, 3]}}]},
        "order": "id",
        "include": {
            "relation": "posts",
            "scope": {"order": "id DESC", "limit": 5, "include": "comments"},
        },
    }))
    .unwrap()
}

const CREATE_TABLES_SQL: &str = r#"
    CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
    CREATE TABLE posts (id INTEGER PRIMARY KEY, user_id INTEGER NOT NULL, title TEXT NOT NULL);
    CREATE TABLE comments (id INTEGER PRIMARY KEY, post_id INTEGER NOT NULL, body TEXT NOT NULL);
"#;

fn setup_db() -> Nestql<RusqliteExecutor, Schema, SQLiteDialect> {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(CREATE_TABLES_SQL).unwrap();
    for u in 0..100 {
        conn.execute("INSERT INTO users (id, name) VALUES (?1, ?2)", (u, format!("User {u}")))
            .unwrap();
        for p in 0..10 {
            let post = u * 10 + p;
            conn.execute(
                "INSERT INTO posts (id, user_id, title) VALUES (?1, ?2, ?3)",
                (post, u, format!("Post {post}")),
            )
            .unwrap();
            conn.execute(
                "INSERT INTO comments (post_id, body) VALUES (?1, 'first'), (?1, 'second')",
                [post],
            )
            .unwrap();
        }
    }
    Nestql::new(RusqliteExecutor::new(conn).unwrap(), schema(), SQLiteDialect)
}

fn compile_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    let schema = schema();

    group.bench_function("parse_json", |b| b.iter(|| black_box(nested_filter())));

    let filter = nested_filter();
    for dialect in [Dialect::SQLite, Dialect::PostgreSQL, Dialect::MySQL] {
        let adapter = adapter_for(dialect).unwrap();
        group.bench_function(dialect.as_str(), |b| {
            b.iter(|| {
                compile(
                    black_box(&schema),
                    &adapter,
                    "User",
                    black_box(&filter),
                    &CompileOptions::default(),
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

fn find_nested(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let filter = nested_filter();

    c.bench_function("find_nested/rusqlite", |b| {
        b.iter_batched(
            setup_db,
            |db| runtime.block_on(db.find("User", &filter)).unwrap(),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, compile_filter, find_nested);
criterion_main!(benches);
