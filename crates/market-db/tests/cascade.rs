//! Integration tests for foreign key cascades across the marketplace schema.

use market_core::{NewUser, OwnerItem, UserChanges};
use market_db::{ConstraintKind, Database, DbConfig, DbError};

async fn db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

async fn scalar(db: &Database, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(db.pool()).await.unwrap()
}

/// Location 1 ← Owner 1 ← User "smaug" (id 1), plus a want-list entry for
/// user 1 on item 1 and an owner listing of the same item.
async fn seed_graph(db: &Database) -> i64 {
    let location_id = scalar(db, "INSERT INTO locations (location) VALUES ('Lonely Mountain') RETURNING id").await;
    let owner_id: i64 = sqlx::query_scalar("INSERT INTO owners (location_id) VALUES (?1) RETURNING id")
        .bind(location_id)
        .fetch_one(db.pool())
        .await
        .unwrap();
    let category_id = scalar(db, "INSERT INTO item_categories (category) VALUES ('Tools') RETURNING id").await;
    let item_id: i64 = sqlx::query_scalar("INSERT INTO items (name, item_category_id) VALUES ('Hammer', ?1) RETURNING id")
        .bind(category_id)
        .fetch_one(db.pool())
        .await
        .unwrap();

    sqlx::query(
        "INSERT INTO owner_items (quantity, price, description, owner_id, item_id) \
         VALUES (2, 1250, 'Barely used', ?1, ?2)",
    )
    .bind(owner_id)
    .bind(item_id)
    .execute(db.pool())
    .await
    .unwrap();

    let ids = db
        .users()
        .create(&NewUser::new("smaug", "pass", "Smaug").owner(owner_id))
        .await
        .unwrap();

    sqlx::query("INSERT INTO items_to_buy (item_id, user_id) VALUES (?1, ?2)")
        .bind(item_id)
        .bind(ids[0])
        .execute(db.pool())
        .await
        .unwrap();

    location_id
}

#[tokio::test]
async fn deleting_location_cascades_to_owner_users_and_listings() {
    let db = db().await;
    let location_id = seed_graph(&db).await;
    db.users()
        .create(&NewUser::new("bilbo", "pass", "Bilbo"))
        .await
        .unwrap();

    sqlx::query("DELETE FROM locations WHERE id = ?1")
        .bind(location_id)
        .execute(db.pool())
        .await
        .unwrap();

    assert_eq!(scalar(&db, "SELECT COUNT(*) FROM owners").await, 0);
    assert_eq!(scalar(&db, "SELECT COUNT(*) FROM owner_items").await, 0);
    assert_eq!(scalar(&db, "SELECT COUNT(*) FROM items_to_buy").await, 0);

    // Only the user without an owner survives
    let users = db.users().list().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "bilbo");
    assert_eq!(users[0].id, 2);
}

#[tokio::test]
async fn deleting_user_cascades_to_want_list() {
    let db = db().await;
    seed_graph(&db).await;

    assert_eq!(db.users().delete_by_id(1).await.unwrap(), 1);

    assert_eq!(scalar(&db, "SELECT COUNT(*) FROM items_to_buy").await, 0);
    // Parents are untouched
    assert_eq!(scalar(&db, "SELECT COUNT(*) FROM owners").await, 1);
    assert_eq!(scalar(&db, "SELECT COUNT(*) FROM items").await, 1);
}

#[tokio::test]
async fn updating_owner_id_cascades_to_users() {
    let db = db().await;
    seed_graph(&db).await;

    sqlx::query("UPDATE owners SET id = 10 WHERE id = 1")
        .execute(db.pool())
        .await
        .unwrap();

    let user = db.users().get_by_id(1).await.unwrap().unwrap();
    assert_eq!(user.owner_id, Some(10));
}

#[tokio::test]
async fn unique_constraints_on_supporting_tables() {
    let db = db().await;
    seed_graph(&db).await;

    for sql in [
        "INSERT INTO locations (location) VALUES ('Lonely Mountain')",
        "INSERT INTO item_categories (category) VALUES ('Tools')",
        "INSERT INTO items (name) VALUES ('Hammer')",
    ] {
        let err: DbError = sqlx::query(sql).execute(db.pool()).await.unwrap_err().into();
        assert!(err.is_unique_violation(), "{sql}: {err:?}");
    }
}

#[tokio::test]
async fn owner_item_requires_quantity_and_price() {
    let db = db().await;

    let err: DbError = sqlx::query("INSERT INTO owner_items (quantity) VALUES (1)")
        .execute(db.pool())
        .await
        .unwrap_err()
        .into();

    assert!(matches!(
        err,
        DbError::ConstraintViolation {
            kind: ConstraintKind::NotNull,
            ..
        }
    ));
}

#[tokio::test]
async fn owner_item_price_reads_back_as_cents() {
    let db = db().await;
    seed_graph(&db).await;

    let items: Vec<OwnerItem> = sqlx::query_as("SELECT * FROM owner_items ORDER BY id")
        .fetch_all(db.pool())
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].price, 1250);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[0].description.as_deref(), Some("Barely used"));
}

#[tokio::test]
async fn concurrent_duplicate_creates_admit_one() {
    let db = db().await;
    let repo = db.users();

    let first = NewUser::new("dragon", "pass", "Dragon");
    let second = NewUser::new("dragon", "pass", "Dragon");
    let (a, b) = tokio::join!(repo.create(&first), repo.create(&second));

    assert!(a.is_ok() != b.is_ok());
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn full_crud_cycle_against_fresh_schema() {
    let db = db().await;
    let repo = db.users();

    let id = repo
        .create(&NewUser::new("dragon", "pass", "Dragon"))
        .await
        .unwrap()[0];
    repo.update(id, &UserChanges::default().password("hunter2"))
        .await
        .unwrap();

    let user = repo.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(user.password, "hunter2");
    assert_eq!(user.first_name, "Dragon");

    repo.delete_by_id(id).await.unwrap();
    assert!(repo.list().await.unwrap().is_empty());

    db.rollback_migrations().await.unwrap();
    let err = repo.list().await.unwrap_err();
    assert!(matches!(err, DbError::QueryFailed(_)), "{err:?}");
}
