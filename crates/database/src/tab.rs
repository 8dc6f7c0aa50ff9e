//! Tab row operations.

use sqlx::SqliteConnection;

use crate::error::{DatabaseError, Result};
use crate::models::TabRecord;

/// Insert a tab and write the assigned id back into `tab`.
pub async fn create_tab(conn: &mut SqliteConnection, tab: &mut TabRecord) -> Result<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO tabs (window_id, kind, index_in_window, input_processing_enabled,
                          current_input_field_name, delete_user_input_message,
                          resend_window_message,
                          delete_previous_window_message_before_resending, data)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(tab.window_id)
    .bind(&tab.kind)
    .bind(tab.index_in_window)
    .bind(tab.input_processing_enabled)
    .bind(&tab.current_input_field_name)
    .bind(tab.delete_user_input_message)
    .bind(tab.resend_window_message)
    .bind(tab.delete_previous_window_message_before_resending)
    .bind(&tab.data)
    .execute(&mut *conn)
    .await?;

    tab.id = result.last_insert_rowid();
    Ok(())
}

/// Get the tab at a position inside a window.
pub async fn get_tab(
    conn: &mut SqliteConnection,
    window_id: i64,
    index_in_window: i64,
) -> Result<Option<TabRecord>> {
    let tab = sqlx::query_as::<_, TabRecord>(
        r#"
        SELECT id, window_id, kind, index_in_window, input_processing_enabled,
               current_input_field_name, delete_user_input_message, resend_window_message,
               delete_previous_window_message_before_resending, data
        FROM tabs
        WHERE window_id = ? AND index_in_window = ?
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .bind(window_id)
    .bind(index_in_window)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(tab)
}

/// Update an existing tab.
pub async fn update_tab(conn: &mut SqliteConnection, tab: &TabRecord) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE tabs
        SET input_processing_enabled = ?, current_input_field_name = ?,
            delete_user_input_message = ?, resend_window_message = ?,
            delete_previous_window_message_before_resending = ?, data = ?
        WHERE id = ?
        "#,
    )
    .bind(tab.input_processing_enabled)
    .bind(&tab.current_input_field_name)
    .bind(tab.delete_user_input_message)
    .bind(tab.resend_window_message)
    .bind(tab.delete_previous_window_message_before_resending)
    .bind(&tab.data)
    .bind(tab.id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Tab",
            id: tab.id.to_string(),
        });
    }

    Ok(())
}

/// Delete a tab by ID.
pub async fn delete_tab(conn: &mut SqliteConnection, id: i64) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM tabs
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Count the tabs of a window.
pub async fn count_tabs(conn: &mut SqliteConnection, window_id: i64) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM tabs WHERE window_id = ?
        "#,
    )
    .bind(window_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count)
}
