//! PostgreSQL integration tests for the catalog use cases.
//!
//! These tests share one PostgreSQL container and need Docker.
//! Run with:
//!
//! ```bash
//! cargo test -p catalog --test postgres_integration -- --ignored
//! ```

use std::sync::Arc;

use catalog::{
    ActivateProduct, ApplyDiscount, ArchiveProduct, CatalogError, CreateProduct,
    PostgresProductRepository, ProductService, RemoveDiscount, UpdateProduct,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use common::{Clock, FixedClock};
use domain::{Money, ProductError, ProductStatus, rational};
use serial_test::serial;
use sqlx::PgPool;
use store::PostgresCommitter;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

type Service = ProductService<PostgresProductRepository, PostgresCommitter>;

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

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 8, 0, 0).unwrap()
}

/// Get a fresh service with its own pool and cleared tables
async fn get_test_service() -> (Service, PgPool, FixedClock) {
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

    let clock = FixedClock::new(t0());
    let service = ProductService::new(
        PostgresProductRepository::new(pool.clone()),
        PostgresCommitter::new(pool.clone()),
        Arc::new(clock.clone()),
    );
    (service, pool, clock)
}

async fn outbox_types(pool: &PgPool) -> Vec<String> {
    sqlx::query_scalar("SELECT event_type FROM outbox_events ORDER BY created_at")
        .fetch_all(pool)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires Docker"]
#[serial]
async fn full_lifecycle_round_trips_through_postgres() {
    let (service, pool, clock) = get_test_service().await;

    let created = service
        .create_product(CreateProduct::new("Widget", "Small", "X", Money::new(1999, 100)))
        .await
        .unwrap();
    let id = created.product_id().clone();

    clock.advance(Duration::seconds(1));
    service
        .activate_product(ActivateProduct::new(id.clone()))
        .await
        .unwrap();

    clock.advance(Duration::seconds(1));
    service
        .apply_discount(ApplyDiscount::new(
            id.clone(),
            rational(25, 2),
            clock.now(),
            clock.now() + Duration::days(7),
        ))
        .await
        .unwrap();

    let product = service.get_product(&id).await.unwrap();
    assert_eq!(product.status(), ProductStatus::Active);
    assert_eq!(product.discount().unwrap().percentage(), &rational(25, 2));
    assert_eq!(
        product.effective_price(clock.now()),
        Money::new(1999, 100).apply_discount(&rational(25, 2))
    );

    clock.advance(Duration::seconds(1));
    service
        .remove_discount(RemoveDiscount::new(id.clone()))
        .await
        .unwrap();

    let product = service.get_product(&id).await.unwrap();
    assert!(product.discount().is_none());
    assert_eq!(
        outbox_types(&pool).await,
        vec![
            "product.created",
            "product.activated",
            "product.discount_applied",
            "product.discount_removed"
        ]
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
#[serial]
async fn partial_update_keeps_untouched_columns() {
    let (service, pool, clock) = get_test_service().await;

    let created = service
        .create_product(CreateProduct::new("Widget", "Small", "X", Money::new(1999, 100)))
        .await
        .unwrap();
    let id = created.product_id().clone();

    clock.advance(Duration::hours(1));
    service
        .update_product(UpdateProduct::new(id.clone(), "Widget", "Large", "X"))
        .await
        .unwrap();

    let (description, created_at): (String, DateTime<Utc>) =
        sqlx::query_as("SELECT description, created_at FROM products WHERE product_id = $1")
            .bind(id.as_str())
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(description, "Large");
    assert_eq!(created_at, t0());
}

#[tokio::test]
#[ignore = "requires Docker"]
#[serial]
async fn archive_sets_archived_at_and_blocks_changes() {
    let (service, _pool, clock) = get_test_service().await;

    let created = service
        .create_product(CreateProduct::new("Widget", "", "X", Money::new(5, 1)))
        .await
        .unwrap();
    let id = created.product_id().clone();

    clock.advance(Duration::days(1));
    service
        .archive_product(ArchiveProduct::new(id.clone()))
        .await
        .unwrap();

    let product = service.get_product(&id).await.unwrap();
    assert!(product.is_archived());
    assert_eq!(product.archived_at(), Some(t0() + Duration::days(1)));

    let result = service.activate_product(ActivateProduct::new(id)).await;
    assert!(matches!(
        result,
        Err(CatalogError::Product(ProductError::ProductArchived))
    ));
}

#[tokio::test]
#[ignore = "requires Docker"]
#[serial]
async fn nanosecond_discount_bounds_still_load() {
    let (service, _pool, clock) = get_test_service().await;

    let created = service
        .create_product(CreateProduct::new("Widget", "", "X", Money::new(5, 1)))
        .await
        .unwrap();
    let id = created.product_id().clone();
    service
        .activate_product(ActivateProduct::new(id.clone()))
        .await
        .unwrap();

    let start = clock.now() + Duration::nanoseconds(1_700);
    let end = start + Duration::microseconds(1);
    let applied = service
        .apply_discount(ApplyDiscount::new(id.clone(), rational(10, 1), start, end))
        .await
        .unwrap();

    let loaded = service.get_product(&id).await.unwrap();
    assert_eq!(loaded.discount(), applied.product.discount());

    service
        .remove_discount(RemoveDiscount::new(id))
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires Docker"]
#[serial]
async fn missing_product_is_not_found() {
    let (service, _pool, _clock) = get_test_service().await;

    let result = service
        .get_product(&common::ProductId::new("missing"))
        .await;

    assert!(matches!(result, Err(CatalogError::NotFound { .. })));
}
