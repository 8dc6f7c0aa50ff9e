//! Button row operations.
//!
//! Each button kind has its own table; [`ButtonTable`] selects it.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::error::{DatabaseError, Result};
use crate::models::{ButtonRecord, ButtonTable};

const COLUMNS: &str = "id, window_id, token, name, callback_name, arg, text, is_checked, \
                       checked_prefix, unchecked_prefix, selection_group";

/// Insert a button and write the assigned id back into `button`.
pub async fn create_button(
    conn: &mut SqliteConnection,
    table: ButtonTable,
    button: &mut ButtonRecord,
) -> Result<()> {
    let result = sqlx::query(&format!(
        "INSERT INTO {} (window_id, token, name, callback_name, arg, text, is_checked, \
         checked_prefix, unchecked_prefix, selection_group) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        table.name()
    ))
    .bind(button.window_id)
    .bind(&button.token)
    .bind(&button.name)
    .bind(&button.callback_name)
    .bind(&button.arg)
    .bind(&button.text)
    .bind(button.is_checked)
    .bind(&button.checked_prefix)
    .bind(&button.unchecked_prefix)
    .bind(&button.selection_group)
    .execute(&mut *conn)
    .await?;

    button.id = result.last_insert_rowid();
    Ok(())
}

/// Update an existing button. The token never changes.
pub async fn update_button(
    conn: &mut SqliteConnection,
    table: ButtonTable,
    button: &ButtonRecord,
) -> Result<()> {
    let result = sqlx::query(&format!(
        "UPDATE {} SET name = ?, callback_name = ?, arg = ?, text = ?, is_checked = ?, \
         checked_prefix = ?, unchecked_prefix = ?, selection_group = ? WHERE id = ?",
        table.name()
    ))
    .bind(&button.name)
    .bind(&button.callback_name)
    .bind(&button.arg)
    .bind(&button.text)
    .bind(button.is_checked)
    .bind(&button.checked_prefix)
    .bind(&button.unchecked_prefix)
    .bind(&button.selection_group)
    .bind(button.id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Button",
            id: button.id.to_string(),
        });
    }

    Ok(())
}

/// Delete a button by ID.
pub async fn delete_button(conn: &mut SqliteConnection, table: ButtonTable, id: i64) -> Result<()> {
    sqlx::query(&format!("DELETE FROM {} WHERE id = ?", table.name()))
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Fetch the buttons of a window whose tokens are in `tokens`.
///
/// Tokens that do not exist are silently absent from the result; callers
/// compare counts to detect them.
pub async fn get_buttons_by_tokens(
    conn: &mut SqliteConnection,
    table: ButtonTable,
    window_id: i64,
    tokens: &[Vec<u8>],
) -> Result<Vec<ButtonRecord>> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {COLUMNS} FROM {} WHERE window_id = ",
        table.name()
    ));
    query.push_bind(window_id);
    query.push(" AND token IN (");
    let mut separated = query.separated(", ");
    for token in tokens {
        separated.push_bind(token.clone());
    }
    separated.push_unseparated(")");

    let buttons = query
        .build_query_as::<ButtonRecord>()
        .fetch_all(&mut *conn)
        .await?;

    Ok(buttons)
}

/// Count the buttons of a window in one table.
pub async fn count_buttons(
    conn: &mut SqliteConnection,
    table: ButtonTable,
    window_id: i64,
) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM {} WHERE window_id = ?",
        table.name()
    ))
    .bind(window_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count)
}
