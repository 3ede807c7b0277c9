use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};
use tracing::info;

use crate::db::entities::{comment, tag, task, task_tag, todo_list};

/// Creates any missing tables and indexes from the entity definitions.
/// Tables are created parents first so the foreign keys resolve.
pub async fn ensure_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    create_table(db, todo_list::Entity).await?;
    create_table(db, task::Entity).await?;
    create_table(db, tag::Entity).await?;
    create_table(db, task_tag::Entity).await?;
    create_table(db, comment::Entity).await?;
    info!("Database schema is up to date.");
    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(backend.build(&table)).await?;

    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(backend.build(&index)).await?;
    }
    Ok(())
}
