//! Repository for the `departments` table.

use portal_core::types::DbId;
use sqlx::PgPool;

use crate::models::department::{CreateDepartment, Department, UpdateDepartment};

const COLUMNS: &str = "id, name, description, created_by, created_at, updated_at";

/// Provides CRUD operations for departments. Every listing is creator-scoped.
pub struct DepartmentRepo;

impl DepartmentRepo {
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateDepartment,
    ) -> Result<Department, sqlx::Error> {
        let query = format!(
            "INSERT INTO departments (name, description, created_by)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Department>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM departments WHERE id = $1");
        sqlx::query_as::<_, Department>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Departments created by `created_by`, ordered by name.
    pub async fn list_by_creator(
        pool: &PgPool,
        created_by: DbId,
    ) -> Result<Vec<Department>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM departments WHERE created_by = $1 ORDER BY name, id");
        sqlx::query_as::<_, Department>(&query)
            .bind(created_by)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDepartment,
    ) -> Result<Option<Department>, sqlx::Error> {
        let query = format!(
            "UPDATE departments SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Whether any project still references the department.
    pub async fn has_projects(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM projects WHERE department_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Delete a department by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
