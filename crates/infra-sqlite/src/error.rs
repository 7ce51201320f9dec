// sqlx::Error -> AppError mapping

use frontdesk_core::error::AppError;

/// Convert sqlx::Error to AppError::Database, keeping the SQLite result code
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            // SQLite result codes: https://www.sqlite.org/rescode.html
            Some(code) => {
                let code = code.as_ref();
                let kind = match code {
                    "2067" | "1555" => "Unique constraint violation",
                    "275" => "Check constraint violation",
                    "787" | "3850" => "Foreign key constraint violation",
                    "5" | "517" => "Database locked (SQLITE_BUSY)",
                    "13" => "Database full",
                    _ => "Database error",
                };
                AppError::Database(format!("{} [{}]: {}", kind, code, db_err.message()))
            }
            None => AppError::Database(format!("Database error: {}", db_err.message())),
        },
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => AppError::Database(format!("Column not found: {}", col)),
        sqlx::Error::PoolTimedOut => {
            AppError::Database("Timed out waiting for a database connection".to_string())
        }
        // Connection, pool, protocol errors
        _ => AppError::Database(err.to_string()),
    }
}
