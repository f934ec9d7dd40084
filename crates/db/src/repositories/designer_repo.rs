//! Repository for the `designers` table.

use atelier_core::types::DbId;
use atelier_core::workload;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::designer::{CreateDesigner, Designer, UpdateDesigner};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, user_id, display_name, current_load, max_capacity, status, \
    leave_from, leave_to, total_projects, average_completion_hours, rating, \
    created_at, updated_at";

/// Provides CRUD and workload-tracking operations for designers.
pub struct DesignerRepo;

impl DesignerRepo {
    /// Onboard a new designer, returning the created row.
    ///
    /// If `max_capacity` is `None` in the input, defaults to 3.
    pub async fn create(pool: &PgPool, input: &CreateDesigner) -> Result<Designer, sqlx::Error> {
        let query = format!(
            "INSERT INTO designers (user_id, display_name, max_capacity)
             VALUES ($1, $2, COALESCE($3, 3))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Designer>(&query)
            .bind(input.user_id)
            .bind(&input.display_name)
            .bind(input.max_capacity)
            .fetch_one(pool)
            .await
    }

    /// Find a designer by its internal ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Designer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM designers WHERE id = $1");
        sqlx::query_as::<_, Designer>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a designer by the owning user ID.
    pub async fn find_by_user_id<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<Option<Designer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM designers WHERE user_id = $1");
        sqlx::query_as::<_, Designer>(&query)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// Find a designer and take a row lock for the rest of the transaction.
    ///
    /// The capacity check is a read followed by an increment; locking the
    /// row first means a concurrent assignment to the same designer blocks
    /// until this transaction commits, so `current_load` can never exceed
    /// `max_capacity`.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Designer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM designers WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Designer>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List all designers, heaviest load first (admin workload view).
    pub async fn list(pool: &PgPool) -> Result<Vec<Designer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM designers ORDER BY current_load DESC, id ASC");
        sqlx::query_as::<_, Designer>(&query).fetch_all(pool).await
    }

    /// Update a designer's availability envelope. Only non-`None` fields
    /// in `input` are applied. Returns `None` if no row exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDesigner,
    ) -> Result<Option<Designer>, sqlx::Error> {
        let query = format!(
            "UPDATE designers SET
                display_name = COALESCE($2, display_name),
                max_capacity = COALESCE($3, max_capacity),
                status = COALESCE($4, status),
                leave_from = COALESCE($5, leave_from),
                leave_to = COALESCE($6, leave_to)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Designer>(&query)
            .bind(id)
            .bind(&input.display_name)
            .bind(input.max_capacity)
            .bind(&input.status)
            .bind(input.leave_from)
            .bind(input.leave_to)
            .fetch_optional(pool)
            .await
    }

    /// Increment the designer's active-project count by one.
    pub async fn increment_load(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Designer, sqlx::Error> {
        let query = format!(
            "UPDATE designers SET current_load = current_load + 1
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Designer>(&query)
            .bind(id)
            .fetch_one(conn)
            .await
    }

    /// Decrement the designer's active-project count by one, floored at 0.
    ///
    /// A decrement at zero load means load tracking and project state have
    /// drifted; it is logged as a data-integrity warning and treated as a
    /// no-op rather than failing the caller's operation.
    pub async fn decrement_load(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Designer, sqlx::Error> {
        let (load,): (i32,) =
            sqlx::query_as("SELECT current_load FROM designers WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_one(&mut *conn)
                .await?;
        if load == 0 {
            tracing::warn!(
                designer_id = id,
                "decrement_load called at zero load; designer load tracking has drifted"
            );
        }
        let query = format!(
            "UPDATE designers SET current_load = GREATEST(current_load - 1, 0)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Designer>(&query)
            .bind(id)
            .fetch_one(conn)
            .await
    }

    /// Fold a completed project into the designer's long-run statistics:
    /// `total_projects` up one, load down one, and the running mean of
    /// completion time updated when `actual_hours` is recorded.
    pub async fn record_completion(
        conn: &mut PgConnection,
        id: DbId,
        actual_hours: Option<f64>,
    ) -> Result<Designer, sqlx::Error> {
        let current = Self::find_by_id_for_update(&mut *conn, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        if current.current_load == 0 {
            tracing::warn!(
                designer_id = id,
                "completion recorded at zero load; designer load tracking has drifted"
            );
        }

        // old_count is total_projects before the increment.
        let new_average = match actual_hours {
            Some(hours) => Some(workload::next_average(
                current.average_completion_hours,
                current.total_projects,
                hours,
            )),
            None => current.average_completion_hours,
        };

        let query = format!(
            "UPDATE designers SET
                total_projects = total_projects + 1,
                current_load = GREATEST(current_load - 1, 0),
                average_completion_hours = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Designer>(&query)
            .bind(id)
            .bind(new_average)
            .fetch_one(conn)
            .await
    }
}
