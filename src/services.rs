use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::models::User;
use crate::validation::ValidationErrorResponse;

/// Storage operations on the `users` table.
///
/// Name uniqueness is enforced twice: a pre-flight lookup that produces a
/// field-level error, and the `UNIQUE` constraint on the column. The
/// constraint catches writers that race past the lookup and maps to the
/// same error.
#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All users ascending by id, optionally narrowed to names containing
    /// `filter` (case-insensitive). An empty filter matches everyone.
    pub async fn list(&self, filter: Option<&str>) -> Result<Vec<User>, ApiError> {
        let users = match filter.filter(|needle| !needle.is_empty()) {
            Some(needle) => {
                sqlx::query_as::<_, User>(
                    "SELECT id, name, email FROM users \
                     WHERE instr(lower(name), lower(?)) > 0 ORDER BY id",
                )
                .bind(needle)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, User>("SELECT id, name, email FROM users ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(users)
    }

    pub async fn get(&self, id: i64) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("The user does not exist".into()))
    }

    pub async fn create(&self, name: String, email: String) -> Result<User, ApiError> {
        self.ensure_name_free(&name, None).await?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email) VALUES (?, ?) RETURNING id, name, email",
        )
        .bind(&name)
        .bind(&email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    /// Full overwrite of both fields. The row is resolved before the name
    /// check, so an absent id is `NotFound` rather than a name error.
    /// Resubmitting the row's own name is fine; claiming another row's name
    /// is not.
    pub async fn update(&self, id: i64, name: String, email: String) -> Result<User, ApiError> {
        self.get(id).await?;
        self.ensure_name_free(&name, Some(id)).await?;

        sqlx::query_as::<_, User>(
            "UPDATE users SET name = ?, email = ? WHERE id = ? RETURNING id, name, email",
        )
        .bind(&name)
        .bind(&email)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?
        .ok_or_else(|| ApiError::NotFound("The user does not exist".into()))
    }

    /// Returns the number of rows removed (always 1 on success).
    pub async fn delete(&self, id: i64) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "user delete failed");
                ApiError::Internal("The user could not be deleted".into())
            })?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("The user does not exist".into()));
        }

        Ok(result.rows_affected())
    }

    async fn ensure_name_free(&self, name: &str, exclude: Option<i64>) -> Result<(), ApiError> {
        let taken: Option<(i64,)> = match exclude {
            Some(id) => {
                sqlx::query_as("SELECT id FROM users WHERE name = ? AND id != ?")
                    .bind(name)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT id FROM users WHERE name = ?")
                    .bind(name)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };

        if taken.is_some() {
            return Err(ApiError::Validation(duplicate_name()));
        }
        Ok(())
    }
}

fn duplicate_name() -> ValidationErrorResponse {
    ValidationErrorResponse::single("name", "A user with this name already exists", "unique")
}

fn map_unique_violation(err: sqlx::Error) -> ApiError {
    let unique = err
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);
    if unique {
        ApiError::Validation(duplicate_name())
    } else {
        err.into()
    }
}

/// Create the `users` table if it is not there yet.
///
/// `AUTOINCREMENT` keeps ids monotonic: an id freed by a delete is never
/// handed out again.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}
