//! Window row operations.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::error::{DatabaseError, Result};
use crate::models::WindowRecord;

const COLUMNS: &str = "id, chat_id, user_id, kind, message_id, current_tab_index, \
                       saved_tab_indexes, input_required";

/// Insert a window and write the assigned id back into `window`.
pub async fn create_window(conn: &mut SqliteConnection, window: &mut WindowRecord) -> Result<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO windows (chat_id, user_id, kind, message_id, current_tab_index,
                             saved_tab_indexes, input_required)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(window.chat_id)
    .bind(window.user_id)
    .bind(&window.kind)
    .bind(window.message_id)
    .bind(window.current_tab_index)
    .bind(&window.saved_tab_indexes)
    .bind(window.input_required)
    .execute(&mut *conn)
    .await?;

    window.id = result.last_insert_rowid();
    Ok(())
}

/// Get a window by ID within a chat.
pub async fn get_window(
    conn: &mut SqliteConnection,
    id: i64,
    chat_id: i64,
) -> Result<Option<WindowRecord>> {
    let window = sqlx::query_as::<_, WindowRecord>(&format!(
        "SELECT {COLUMNS} FROM windows WHERE id = ? AND chat_id = ?"
    ))
    .bind(id)
    .bind(chat_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(window)
}

/// Find the newest window in a chat that waits for text input from one of
/// `user_ids`.
pub async fn find_input_window(
    conn: &mut SqliteConnection,
    chat_id: i64,
    user_ids: &[i64],
) -> Result<Option<WindowRecord>> {
    if user_ids.is_empty() {
        return Ok(None);
    }

    let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM windows WHERE chat_id = "));
    query.push_bind(chat_id);
    query.push(" AND input_required = 1 AND user_id IN (");
    let mut separated = query.separated(", ");
    for user_id in user_ids {
        separated.push_bind(*user_id);
    }
    separated.push_unseparated(") ORDER BY id DESC LIMIT 1");

    let window = query
        .build_query_as::<WindowRecord>()
        .fetch_optional(&mut *conn)
        .await?;

    Ok(window)
}

/// Update an existing window.
pub async fn update_window(conn: &mut SqliteConnection, window: &WindowRecord) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE windows
        SET user_id = ?, message_id = ?, current_tab_index = ?,
            saved_tab_indexes = ?, input_required = ?
        WHERE id = ?
        "#,
    )
    .bind(window.user_id)
    .bind(window.message_id)
    .bind(window.current_tab_index)
    .bind(&window.saved_tab_indexes)
    .bind(window.input_required)
    .bind(window.id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Window",
            id: window.id.to_string(),
        });
    }

    Ok(())
}

/// Delete a window. Tabs, texts and buttons go with it.
pub async fn delete_window(conn: &mut SqliteConnection, id: i64) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM windows
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Count windows in a chat.
pub async fn count_windows(conn: &mut SqliteConnection, chat_id: i64) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM windows WHERE chat_id = ?
        "#,
    )
    .bind(chat_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count)
}
