//! Handlers for the `/departments` resource. Publisher only, creator-scoped.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use portal_core::error::CoreError;
use portal_core::ownership::ensure_owner;
use portal_core::types::DbId;
use portal_db::models::department::{CreateDepartment, Department, UpdateDepartment};
use portal_db::repositories::DepartmentRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::audit;
use crate::middleware::rbac::RequirePublisher;
use crate::state::AppState;

fn required_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Department name is required".into(),
        )));
    }
    Ok(name.to_string())
}

/// Load a department and check the caller created it.
async fn load_owned(state: &AppState, id: DbId, user_id: DbId) -> AppResult<Department> {
    let department = DepartmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Department",
            id,
        }))?;
    ensure_owner("Department", department.created_by, user_id)?;
    Ok(department)
}

/// GET /departments
pub async fn list(
    RequirePublisher(user): RequirePublisher,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Department>>> {
    let departments = DepartmentRepo::list_by_creator(&state.pool, user.user_id).await?;
    Ok(Json(departments))
}

/// POST /departments
pub async fn create(
    RequirePublisher(user): RequirePublisher,
    State(state): State<AppState>,
    Json(input): Json<CreateDepartment>,
) -> AppResult<(StatusCode, Json<Department>)> {
    let input = CreateDepartment {
        name: required_name(&input.name)?,
        description: input.description,
    };
    let department = DepartmentRepo::create(&state.pool, user.user_id, &input).await?;

    audit(
        &state,
        &format!("{} created department \"{}\"", user.name, department.name),
    )
    .await;

    Ok((StatusCode::CREATED, Json(department)))
}

/// PUT /departments/{id}
pub async fn update(
    RequirePublisher(user): RequirePublisher,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDepartment>,
) -> AppResult<Json<Department>> {
    load_owned(&state, id, user.user_id).await?;

    let input = UpdateDepartment {
        name: input.name.as_deref().map(required_name).transpose()?,
        description: input.description,
    };
    let department = DepartmentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Department",
            id,
        }))?;

    audit(
        &state,
        &format!("{} updated department \"{}\"", user.name, department.name),
    )
    .await;

    Ok(Json(department))
}

/// DELETE /departments/{id}
pub async fn delete(
    RequirePublisher(user): RequirePublisher,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let department = load_owned(&state, id, user.user_id).await?;

    if DepartmentRepo::has_projects(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::HasDependents(
            "Cannot delete department with existing projects".into(),
        )));
    }
    DepartmentRepo::delete(&state.pool, id).await?;

    audit(
        &state,
        &format!("{} deleted department \"{}\"", user.name, department.name),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
