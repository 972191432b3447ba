//! PostgreSQL integration tests
//!
//! These tests share one PostgreSQL container and need Docker.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --ignored
//! ```

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serial_test::serial;
use sqlx::PgPool;
use store::{
    Committer, Mutation, PostgresCommitter, StoreError, Value, WritePlan,
    schema::{outbox_events, products},
};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            PostgresCommitter::new(temp_pool.clone())
                .run_migrations()
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh committer with its own pool and cleared tables
async fn get_test_committer() -> PostgresCommitter {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE products, outbox_events")
        .execute(&pool)
        .await
        .unwrap();

    PostgresCommitter::new(pool)
}

fn product_insert(id: &str) -> Mutation {
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    Mutation::insert(
        products::TABLE,
        products::PRODUCT_ID,
        id,
        vec![
            (products::NAME, Value::from("Widget")),
            (products::DESCRIPTION, Value::from("")),
            (products::CATEGORY, Value::from("Tools")),
            (products::BASE_PRICE_NUMERATOR, Value::from(1999_i64)),
            (products::BASE_PRICE_DENOMINATOR, Value::from(100_i64)),
            (products::DISCOUNT_PERCENT, Value::Text(None)),
            (products::DISCOUNT_START, Value::Timestamp(None)),
            (products::DISCOUNT_END, Value::Timestamp(None)),
            (products::STATUS, Value::from("draft")),
            (products::CREATED_AT, Value::from(now)),
            (products::UPDATED_AT, Value::from(now)),
            (products::ARCHIVED_AT, Value::Timestamp(None)),
        ],
    )
}

fn outbox_insert(aggregate_id: &str) -> Mutation {
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    Mutation::insert(
        outbox_events::TABLE,
        outbox_events::EVENT_ID,
        Uuid::new_v4(),
        vec![
            (outbox_events::EVENT_TYPE, Value::from("product.created")),
            (outbox_events::AGGREGATE_ID, Value::from(aggregate_id)),
            (
                outbox_events::PAYLOAD,
                Value::from(serde_json::json!({"aggregate_id": aggregate_id})),
            ),
            (outbox_events::STATUS, Value::from("pending")),
            (outbox_events::CREATED_AT, Value::from(now)),
            (outbox_events::PROCESSED_AT, Value::Timestamp(None)),
        ],
    )
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires Docker"]
#[serial]
async fn commit_state_and_event_together() {
    let committer = get_test_committer().await;

    let mut plan = WritePlan::new();
    plan.add(product_insert("p-1"));
    plan.add(outbox_insert("p-1"));
    committer.apply(&plan).await.unwrap();

    assert_eq!(count(committer.pool(), "products").await, 1);
    assert_eq!(count(committer.pool(), "outbox_events").await, 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
#[serial]
async fn failed_update_rolls_back_earlier_inserts() {
    let committer = get_test_committer().await;

    let mut plan = WritePlan::new();
    plan.add(product_insert("p-1"));
    plan.add(outbox_insert("p-1"));
    plan.add(Mutation::update(
        products::TABLE,
        products::PRODUCT_ID,
        "missing",
        vec![(products::NAME, Value::from("x"))],
    ));
    let result = committer.apply(&plan).await;

    assert!(matches!(result, Err(StoreError::RowNotFound { .. })));
    assert_eq!(count(committer.pool(), "products").await, 0);
    assert_eq!(count(committer.pool(), "outbox_events").await, 0);
}

#[tokio::test]
#[ignore = "requires Docker"]
#[serial]
async fn duplicate_insert_is_reported() {
    let committer = get_test_committer().await;
    committer
        .apply_mutations(vec![product_insert("p-1")])
        .await
        .unwrap();

    let result = committer
        .apply_mutations(vec![product_insert("p-1"), outbox_insert("p-1")])
        .await;

    assert!(matches!(result, Err(StoreError::DuplicateKey { .. })));
    assert_eq!(count(committer.pool(), "outbox_events").await, 0);
}

#[tokio::test]
#[ignore = "requires Docker"]
#[serial]
async fn typed_nulls_clear_columns() {
    let committer = get_test_committer().await;
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    committer
        .apply_mutations(vec![product_insert("p-1")])
        .await
        .unwrap();

    committer
        .apply_mutations(vec![Mutation::update(
            products::TABLE,
            products::PRODUCT_ID,
            "p-1",
            vec![
                (products::DISCOUNT_PERCENT, Value::from("25/2")),
                (products::DISCOUNT_START, Value::from(start)),
            ],
        )])
        .await
        .unwrap();
    committer
        .apply_mutations(vec![Mutation::update(
            products::TABLE,
            products::PRODUCT_ID,
            "p-1",
            vec![
                (products::DISCOUNT_PERCENT, Value::Text(None)),
                (products::DISCOUNT_START, Value::Timestamp(None)),
            ],
        )])
        .await
        .unwrap();

    let percent: Option<String> =
        sqlx::query_scalar("SELECT discount_percent FROM products WHERE product_id = $1")
            .bind("p-1")
            .fetch_one(committer.pool())
            .await
            .unwrap();
    assert_eq!(percent, None);
}

#[tokio::test]
#[ignore = "requires Docker"]
#[serial]
async fn empty_plan_is_a_no_op() {
    let committer = get_test_committer().await;
    committer.apply(&WritePlan::new()).await.unwrap();
    assert_eq!(count(committer.pool(), "products").await, 0);
}
