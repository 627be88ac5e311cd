use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{Task, TaskInput},
    utils::sql,
};

pub async fn create_task(input: TaskInput) -> Result<Task, sqlx::Error> {
    let task = sqlx::query_as::<_, Task>(&sql(r#"
        INSERT INTO tasks (title, description)
        VALUES (?, ?)
        RETURNING id, title, description, created_at
    "#))
    .bind(input.title)
    .bind(input.description)
    .fetch_one(&get_pool())
    .await?;

    Ok(task)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<Task>, sqlx::Error> {
    let task = sqlx::query_as::<_, Task>(&sql(r#"
        SELECT id, title, description, created_at
        FROM tasks
        WHERE id = ?
    "#))
    .bind(id)
    .fetch_optional(&get_pool())
    .await?;

    Ok(task)
}

pub async fn find_all() -> Result<Vec<Task>, sqlx::Error> {
    let tasks = sqlx::query_as::<_, Task>(&sql(r#"
        SELECT id, title, description, created_at
        FROM tasks
        ORDER BY created_at
    "#))
    .fetch_all(&get_pool())
    .await?;

    Ok(tasks)
}
