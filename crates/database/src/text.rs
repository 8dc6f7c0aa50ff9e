//! Text row operations.

use sqlx::SqliteConnection;

use crate::error::{DatabaseError, Result};
use crate::models::TextRecord;

/// Insert a text and write the assigned id back into `text`.
pub async fn create_text(conn: &mut SqliteConnection, text: &mut TextRecord) -> Result<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO texts (window_id, tab_index, tab_id, header, one_time_header, body,
                           input_field_text)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(text.window_id)
    .bind(text.tab_index)
    .bind(text.tab_id)
    .bind(&text.header)
    .bind(text.one_time_header)
    .bind(&text.body)
    .bind(&text.input_field_text)
    .execute(&mut *conn)
    .await?;

    text.id = result.last_insert_rowid();
    Ok(())
}

/// Get the text owned by a tab.
pub async fn get_text(
    conn: &mut SqliteConnection,
    window_id: i64,
    tab_index: i64,
    tab_id: i64,
) -> Result<Option<TextRecord>> {
    let text = sqlx::query_as::<_, TextRecord>(
        r#"
        SELECT id, window_id, tab_index, tab_id, header, one_time_header, body, input_field_text
        FROM texts
        WHERE window_id = ? AND tab_index = ? AND tab_id = ?
        "#,
    )
    .bind(window_id)
    .bind(tab_index)
    .bind(tab_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(text)
}

/// Update an existing text.
pub async fn update_text(conn: &mut SqliteConnection, text: &TextRecord) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE texts
        SET header = ?, one_time_header = ?, body = ?, input_field_text = ?
        WHERE id = ?
        "#,
    )
    .bind(&text.header)
    .bind(text.one_time_header)
    .bind(&text.body)
    .bind(&text.input_field_text)
    .bind(text.id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Text",
            id: text.id.to_string(),
        });
    }

    Ok(())
}

/// Delete a text by ID.
pub async fn delete_text(conn: &mut SqliteConnection, id: i64) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM texts
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
