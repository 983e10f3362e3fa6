//! Integration tests against a live PostgreSQL database.
//!
//! Set `TASKBOARD_TEST_DATABASE_URL` to run them; without it every test
//! returns immediately. Each test works inside one transaction and rolls it
//! back, so the database is left untouched.

use std::sync::Arc;

use taskboard_core::config::DatabaseConfig;
use taskboard_core::error::ErrorKind;
use taskboard_core::registry::RepositoryGetter;
use taskboard_core::traits::{
    Creator, Deleter, Getter, GetterList, SessionHandle, Statement, UnitOfWork, Updater,
};
use taskboard_core::types::{Criteria, FilterKind, OrderKind, SqlValue};
use taskboard_database::migration::run_migrations;
use taskboard_database::{DatabasePool, postgres_filter_builder, postgres_repositories};
use taskboard_entity::board::{Board, BoardRepository, OwnershipBoard, OwnershipBoardRepository};
use taskboard_entity::user::{Role, User, UserRepository};

struct TestDb {
    repositories: RepositoryGetter,
    session: SessionHandle,
}

impl TestDb {
    async fn open() -> Option<Self> {
        let url = std::env::var("TASKBOARD_TEST_DATABASE_URL").ok()?;
        let pool = DatabasePool::connect(&DatabaseConfig::with_url(url))
            .await
            .expect("Failed to connect to test database");
        run_migrations(pool.pool())
            .await
            .expect("Failed to run migrations");
        let session = pool
            .unit_of_work()
            .begin()
            .await
            .expect("Failed to begin transaction");
        Some(Self {
            repositories: postgres_repositories(Arc::new(postgres_filter_builder())),
            session,
        })
    }

    fn user(&self, prefix: &str) -> User {
        let unique = format!("{prefix}-{}", uuid::Uuid::new_v4().simple());
        User::new(
            "Test",
            "User",
            unique.clone(),
            format!("{unique}@example.com"),
            "hash",
            Role::Client,
        )
    }
}

#[tokio::test]
async fn test_create_then_get() {
    let Some(db) = TestDb::open().await else {
        return;
    };
    let users = db
        .repositories
        .get::<dyn UserRepository>(&db.session)
        .unwrap();

    let created = users.create(db.user("create")).await.unwrap();
    assert!(!created.data.id.is_empty());

    let loaded = users.get_by_id(&created.data.id).await.unwrap();
    assert_eq!(loaded.username, created.username);
    assert_eq!(loaded.permissions, created.permissions);

    let by_email = users.by_email(&created.email).await.unwrap().unwrap();
    assert_eq!(by_email.data.id, created.data.id);

    db.session.rollback().await.unwrap();
}

#[tokio::test]
async fn test_soft_delete_keeps_row() {
    let Some(db) = TestDb::open().await else {
        return;
    };
    let users = db
        .repositories
        .get::<dyn UserRepository>(&db.session)
        .unwrap();

    let created = users.create(db.user("delete")).await.unwrap();
    users.delete(&created.data.id).await.unwrap();

    let err = users.get_by_id(&created.data.id).await.unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
    let err = users.delete(&created.data.id).await.unwrap_err();
    assert!(err.is(ErrorKind::NotFound));

    let raw = db
        .session
        .atomic_execute(&Statement::query(
            "SELECT deleted_at, is_activated FROM tbl_user WHERE id = ?",
            vec![SqlValue::from(&created.data.id)],
        ))
        .await
        .unwrap();
    let row = raw.fetch_one().expect("row still present");
    assert!(row.opt_timestamp("deleted_at").unwrap().is_some());
    assert!(!row.boolean("is_activated").unwrap());

    db.session.rollback().await.unwrap();
}

#[tokio::test]
async fn test_update_overwrites_columns() {
    let Some(db) = TestDb::open().await else {
        return;
    };
    let users = db
        .repositories
        .get::<dyn UserRepository>(&db.session)
        .unwrap();

    let mut user = users.create(db.user("update")).await.unwrap();
    user.name = "Renamed".to_string();
    let id = user.data.id.clone();
    users.update(&id, user).await.unwrap();
    assert_eq!(users.get_by_id(&id).await.unwrap().name, "Renamed");

    db.session.rollback().await.unwrap();
}

#[tokio::test]
async fn test_pagination() {
    let Some(db) = TestDb::open().await else {
        return;
    };
    let users = db
        .repositories
        .get::<dyn UserRepository>(&db.session)
        .unwrap();

    let marker = format!("page-{}", uuid::Uuid::new_v4().simple());
    for _ in 0..5 {
        users.create(db.user(&marker)).await.unwrap();
    }

    let builder = db.repositories.filter_builder();
    let criteria = Criteria::new(2, 2)
        .unwrap()
        .filter(builder.filter(FilterKind::Like, "username", marker.as_str()).unwrap())
        .order_by(builder.order(OrderKind::Asc, "username").unwrap());
    let page = users.filter(&criteria, &[]).await.unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.count, 2);
    assert_eq!(page.total_pages(), 3);

    let last = users
        .filter(&Criteria::new(3, 2).unwrap().filter(
            builder.filter(FilterKind::Like, "username", marker.as_str()).unwrap(),
        ), &[])
        .await
        .unwrap();
    assert_eq!(last.count, 1);
    assert!(!last.has_next());

    db.session.rollback().await.unwrap();
}

#[tokio::test]
async fn test_filter_by_member() {
    let Some(db) = TestDb::open().await else {
        return;
    };
    let users = db
        .repositories
        .get::<dyn UserRepository>(&db.session)
        .unwrap();
    let boards = db
        .repositories
        .get::<dyn BoardRepository>(&db.session)
        .unwrap();
    let ownerships = db
        .repositories
        .get::<dyn OwnershipBoardRepository>(&db.session)
        .unwrap();

    let owner = users.create(db.user("owner")).await.unwrap();
    let board = Board::create("Roadmap", "Next quarter", &owner.data.id, None);
    let members = board.members.clone();
    let board = boards.create(board).await.unwrap();
    for member in &members {
        ownerships.create(OwnershipBoard::from(member)).await.unwrap();
    }

    let page = boards
        .filter_by_member(&owner.data.id, &Criteria::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.elements[0].data.id, board.data.id);
    assert_eq!(ownerships.by_board_id(&board.data.id).await.unwrap().len(), 1);

    db.session.rollback().await.unwrap();
}
