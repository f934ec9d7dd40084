//! Repository for the `project_assignments` history table.
//!
//! Rows are append-only: created on assignment/reassignment, closed when
//! superseded, never otherwise mutated. A partial unique index
//! (`uq_project_assignments_active`) backs the one-active-per-project
//! invariant at the schema level.

use atelier_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::assignment::ProjectAssignment;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, project_id, previous_designer_id, new_designer_id, reason, status, \
    assigned_at, reassigned_at, created_at";

/// Provides operations over assignment history records.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Open a new active assignment record.
    ///
    /// `previous_designer_id` is `None` for a first assignment.
    pub async fn create(
        conn: &mut PgConnection,
        project_id: DbId,
        previous_designer_id: Option<DbId>,
        new_designer_id: DbId,
        reason: Option<&str>,
        at: Timestamp,
    ) -> Result<ProjectAssignment, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_assignments
                (project_id, previous_designer_id, new_designer_id, reason, assigned_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectAssignment>(&query)
            .bind(project_id)
            .bind(previous_designer_id)
            .bind(new_designer_id)
            .bind(reason)
            .bind(at)
            .fetch_one(conn)
            .await
    }

    /// Find the single active record for a project, if any.
    pub async fn find_active_by_project<'e>(
        executor: impl PgExecutor<'e>,
        project_id: DbId,
    ) -> Result<Option<ProjectAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_assignments
             WHERE project_id = $1 AND status = 'active'"
        );
        sqlx::query_as::<_, ProjectAssignment>(&query)
            .bind(project_id)
            .fetch_optional(executor)
            .await
    }

    /// Close an active record: mark completed and stamp `reassigned_at`.
    /// Returns `None` if the record was not active.
    pub async fn close(
        conn: &mut PgConnection,
        id: DbId,
        at: Timestamp,
    ) -> Result<Option<ProjectAssignment>, sqlx::Error> {
        let query = format!(
            "UPDATE project_assignments SET status = 'completed', reassigned_at = $2
             WHERE id = $1 AND status = 'active'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectAssignment>(&query)
            .bind(id)
            .bind(at)
            .fetch_optional(conn)
            .await
    }

    /// Full assignment history for a project, oldest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_assignments
             WHERE project_id = $1
             ORDER BY assigned_at ASC, id ASC"
        );
        sqlx::query_as::<_, ProjectAssignment>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
