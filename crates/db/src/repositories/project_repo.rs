//! Repository for the `projects` table.

use portal_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, ProjectWithDepartment, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, department_id, created_by, created_at, updated_at";

/// Same columns qualified with the `p` alias, for joins.
const JOINED_COLUMNS: &str = "p.id, p.name, p.description, p.department_id, p.created_by, \
                              p.created_at, p.updated_at, d.name AS department_name";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, description, department_id, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.department_id)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Projects created by `created_by`, with their department name.
    pub async fn list_by_creator(
        pool: &PgPool,
        created_by: DbId,
    ) -> Result<Vec<ProjectWithDepartment>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM projects p
             JOIN departments d ON d.id = p.department_id
             WHERE p.created_by = $1
             ORDER BY d.name, p.name, p.id"
        );
        sqlx::query_as::<_, ProjectWithDepartment>(&query)
            .bind(created_by)
            .fetch_all(pool)
            .await
    }

    /// Projects of one department that were created by `created_by`.
    pub async fn list_by_department(
        pool: &PgPool,
        department_id: DbId,
        created_by: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE department_id = $1 AND created_by = $2
             ORDER BY name, id"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(department_id)
            .bind(created_by)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                department_id = COALESCE($4, department_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.department_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether any offer still references the project.
    pub async fn has_offers(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM offers WHERE project_id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Permanently delete a project by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
