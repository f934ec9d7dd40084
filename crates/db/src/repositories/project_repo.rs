//! Repository for the `projects` table.
//!
//! Status is never written directly: every status-changing update names
//! the expected current status in its `WHERE` clause, so a transition the
//! workflow validator approved cannot be applied over a row that changed
//! underneath it (the update simply matches zero rows and the caller
//! reports the conflict).

use atelier_core::types::{DbId, Timestamp};
use atelier_core::workflow::ProjectStatus;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::project::{CreateProject, Project, UpdateProjectProgress};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, client_id, assigned_designer_id, assigned_by_id, name, description, \
    status, priority, estimated_hours, actual_hours, completion_rate, \
    delivery_link, assigned_at, delivered_at, reviewed_at, created_at, updated_at";

/// Provides CRUD and workflow-transition operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project in `PENDING`, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        client_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (client_id, name, description, priority)
             VALUES ($1, $2, $3, COALESCE($4, 'medium'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(client_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.priority)
            .fetch_one(executor)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a project and take a row lock for the rest of the transaction.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List a client's projects, most recent first.
    pub async fn list_by_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE client_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// List projects awaiting assignment, oldest first (admin intake queue).
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE status = 'PENDING' ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// List a designer's currently assigned projects, most recent first.
    pub async fn list_by_designer(
        pool: &PgPool,
        designer_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE assigned_designer_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(designer_id)
            .fetch_all(pool)
            .await
    }

    /// Count projects a client created at or after `since` (credit usage).
    pub async fn count_created_since<'e>(
        executor: impl PgExecutor<'e>,
        client_id: DbId,
        since: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM projects WHERE client_id = $1 AND created_at >= $2",
        )
        .bind(client_id)
        .bind(since)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }

    /// Update progress fields (completion percentage, recorded hours) on a
    /// non-terminal project. Only non-`None` fields are applied.
    pub async fn update_progress(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProjectProgress,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                completion_rate = COALESCE($2, completion_rate),
                actual_hours = COALESCE($3, actual_hours)
             WHERE id = $1 AND status NOT IN ('COMPLETED', 'CANCELLED')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(input.completion_rate)
            .bind(input.actual_hours)
            .fetch_optional(pool)
            .await
    }

    /// Apply a validated status transition. Returns `None` if the row is no
    /// longer in `from`, in which case nothing was written.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: DbId,
        from: ProjectStatus,
        to: ProjectStatus,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET status = $3
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(conn)
            .await
    }

    /// First assignment: set the assignee, stamp, and move PENDING -> ASSIGNED
    /// in one statement. Returns `None` if the project is no longer an
    /// unassigned PENDING row.
    pub async fn assign(
        conn: &mut PgConnection,
        id: DbId,
        designer_id: DbId,
        assigned_by: DbId,
        estimated_hours: Option<f64>,
        at: Timestamp,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                assigned_designer_id = $2,
                assigned_by_id = $3,
                estimated_hours = COALESCE($4, estimated_hours),
                assigned_at = $5,
                status = 'ASSIGNED'
             WHERE id = $1 AND status = 'PENDING' AND assigned_designer_id IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(designer_id)
            .bind(assigned_by)
            .bind(estimated_hours)
            .bind(at)
            .fetch_optional(conn)
            .await
    }

    /// Reassignment: move the project to a new designer. Status is
    /// unchanged; the `WHERE` clause pins the expected current assignee.
    pub async fn transfer(
        conn: &mut PgConnection,
        id: DbId,
        from_designer_id: DbId,
        to_designer_id: DbId,
        at: Timestamp,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                assigned_designer_id = $3,
                assigned_at = $4
             WHERE id = $1 AND assigned_designer_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(from_designer_id)
            .bind(to_designer_id)
            .bind(at)
            .fetch_optional(conn)
            .await
    }

    /// Delivery: move to REVIEW and store the delivery link and timestamp.
    /// `from` is the validated pre-delivery status (ASSIGNED or IN_PROGRESS).
    pub async fn mark_delivered(
        conn: &mut PgConnection,
        id: DbId,
        from: ProjectStatus,
        delivery_link: &str,
        at: Timestamp,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                status = 'REVIEW',
                delivery_link = $3,
                delivered_at = $4
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(delivery_link)
            .bind(at)
            .fetch_optional(conn)
            .await
    }

    /// Acceptance: move REVIEW -> COMPLETED and stamp the review time.
    /// The `WHERE` clause also requires a stored delivery link, so an
    /// empty delivery can never be approved even under a race.
    pub async fn mark_approved(
        conn: &mut PgConnection,
        id: DbId,
        at: Timestamp,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                status = 'COMPLETED',
                reviewed_at = $2
             WHERE id = $1 AND status = 'REVIEW' AND delivery_link IS NOT NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(at)
            .fetch_optional(conn)
            .await
    }

    /// Permanently delete a project. Only used as the compensating action
    /// when credit deduction fails after intake. Returns `true` if a row
    /// was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
