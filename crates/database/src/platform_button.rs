//! Bridge rows for suspended tab keyboards.
//!
//! Written when a tab is suspended, consumed in full when it is resumed.

use sqlx::SqliteConnection;

use crate::error::Result;
use crate::models::PlatformButtonRecord;

/// Insert a bridge row and write the assigned id back into `button`.
pub async fn create_platform_button(
    conn: &mut SqliteConnection,
    button: &mut PlatformButtonRecord,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO platform_buttons (window_id, tab_index, text, token, url, last_in_row)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(button.window_id)
    .bind(button.tab_index)
    .bind(&button.text)
    .bind(&button.token)
    .bind(&button.url)
    .bind(button.last_in_row)
    .execute(&mut *conn)
    .await?;

    button.id = result.last_insert_rowid();
    Ok(())
}

/// Bridge rows of a suspended tab, in insertion order.
pub async fn list_platform_buttons(
    conn: &mut SqliteConnection,
    window_id: i64,
    tab_index: i64,
) -> Result<Vec<PlatformButtonRecord>> {
    let buttons = sqlx::query_as::<_, PlatformButtonRecord>(
        r#"
        SELECT id, window_id, tab_index, text, token, url, last_in_row
        FROM platform_buttons
        WHERE window_id = ? AND tab_index = ?
        ORDER BY id
        "#,
    )
    .bind(window_id)
    .bind(tab_index)
    .fetch_all(&mut *conn)
    .await?;

    Ok(buttons)
}

/// Delete every bridge row of a suspended tab.
pub async fn delete_platform_buttons(
    conn: &mut SqliteConnection,
    window_id: i64,
    tab_index: i64,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM platform_buttons
        WHERE window_id = ? AND tab_index = ?
        "#,
    )
    .bind(window_id)
    .bind(tab_index)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
