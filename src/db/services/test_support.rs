//! Store fixtures for service tests: an in-memory SQLite database with the
//! full schema, plus shortcuts for inserting rows with explicit timestamps.

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DbConn, Set};

use crate::db::entities::{comment, tag, task, task_tag, todo_list};
use crate::db::enums::TaskStatus;
use crate::db::schema::ensure_schema;
use crate::db::services::task_service::title_key;

pub async fn memory_db() -> DbConn {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // A single pooled connection keeps every query on the same in-memory database.
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("connect to in-memory sqlite");
    ensure_schema(&db).await.expect("create schema");
    db
}

pub fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub async fn insert_list(db: &DbConn, owner_id: &str, title: &str) -> todo_list::Model {
    todo_list::ActiveModel {
        title: Set(title.to_string()),
        description: Set(None),
        owner_id: Set(owner_id.to_string()),
        created_utc: Set(Utc::now()),
        updated_utc: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert list")
}

pub async fn insert_task(
    db: &DbConn,
    list_id: i32,
    title: &str,
    assignee_id: &str,
    status: TaskStatus,
    due_date: Option<DateTime<Utc>>,
) -> task::Model {
    insert_task_created(db, list_id, title, assignee_id, status, due_date, utc(2024, 1, 1, 12)).await
}

pub async fn insert_task_created(
    db: &DbConn,
    list_id: i32,
    title: &str,
    assignee_id: &str,
    status: TaskStatus,
    due_date: Option<DateTime<Utc>>,
    created_date: DateTime<Utc>,
) -> task::Model {
    task::ActiveModel {
        title: Set(title.to_string()),
        title_key: Set(title_key(title)),
        description: Set(None),
        created_date: Set(created_date),
        due_date: Set(due_date),
        status: Set(status),
        assignee_id: Set(assignee_id.to_string()),
        todo_list_id: Set(list_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert task")
}

pub async fn insert_tag(db: &DbConn, name: &str) -> tag::Model {
    tag::ActiveModel {
        name: Set(name.to_string()),
        color_hex: Set(crate::services::tag_color::derive_color(name)),
        created_utc: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert tag")
}

pub async fn insert_link(db: &DbConn, task_id: i32, tag_id: i32) -> task_tag::Model {
    task_tag::ActiveModel {
        task_id: Set(task_id),
        tag_id: Set(tag_id),
        linked_utc: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("insert link")
}

pub async fn insert_comment(
    db: &DbConn,
    task_id: i32,
    author: &str,
    text: &str,
    created_utc: DateTime<Utc>,
) -> comment::Model {
    comment::ActiveModel {
        task_id: Set(task_id),
        text: Set(text.to_string()),
        created_by_user_id: Set(author.to_string()),
        created_utc: Set(created_utc),
        updated_utc: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert comment")
}
