//! Handlers for the `/projects` resource. Publisher only, creator-scoped.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use portal_core::error::CoreError;
use portal_core::ownership::ensure_owner;
use portal_core::types::DbId;
use portal_db::models::project::{CreateProject, Project, ProjectWithDepartment, UpdateProject};
use portal_db::repositories::{DepartmentRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::audit;
use crate::middleware::rbac::RequirePublisher;
use crate::state::AppState;

fn required_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Project name is required".into(),
        )));
    }
    Ok(name.to_string())
}

async fn ensure_department_owned(state: &AppState, id: DbId, user_id: DbId) -> AppResult<()> {
    let department = DepartmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Department",
            id,
        }))?;
    ensure_owner("Department", department.created_by, user_id)?;
    Ok(())
}

async fn load_owned(state: &AppState, id: DbId, user_id: DbId) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    ensure_owner("Project", project.created_by, user_id)?;
    Ok(project)
}

/// GET /projects
pub async fn list(
    RequirePublisher(user): RequirePublisher,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProjectWithDepartment>>> {
    Ok(Json(
        ProjectRepo::list_by_creator(&state.pool, user.user_id).await?,
    ))
}

/// GET /projects/department/{department_id}
pub async fn list_by_department(
    RequirePublisher(user): RequirePublisher,
    State(state): State<AppState>,
    Path(department_id): Path<DbId>,
) -> AppResult<Json<Vec<Project>>> {
    ensure_department_owned(&state, department_id, user.user_id).await?;
    let projects =
        ProjectRepo::list_by_department(&state.pool, department_id, user.user_id).await?;
    Ok(Json(projects))
}

/// POST /projects
pub async fn create(
    RequirePublisher(user): RequirePublisher,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let name = required_name(&input.name)?;
    ensure_department_owned(&state, input.department_id, user.user_id).await?;

    let project = ProjectRepo::create(
        &state.pool,
        user.user_id,
        &CreateProject { name, ..input },
    )
    .await?;

    audit(
        &state,
        &format!("{} created project \"{}\"", user.name, project.name),
    )
    .await;

    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /projects/{id}
///
/// Moving a project requires owning the target department too.
pub async fn update(
    RequirePublisher(user): RequirePublisher,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    load_owned(&state, id, user.user_id).await?;
    if let Some(department_id) = input.department_id {
        ensure_department_owned(&state, department_id, user.user_id).await?;
    }

    let input = UpdateProject {
        name: input.name.as_deref().map(required_name).transpose()?,
        ..input
    };
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    audit(
        &state,
        &format!("{} updated project \"{}\"", user.name, project.name),
    )
    .await;

    Ok(Json(project))
}

/// DELETE /projects/{id}
pub async fn delete(
    RequirePublisher(user): RequirePublisher,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let project = load_owned(&state, id, user.user_id).await?;

    if ProjectRepo::has_offers(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::HasDependents(
            "Cannot delete project with existing offers".into(),
        )));
    }
    ProjectRepo::delete(&state.pool, id).await?;

    audit(
        &state,
        &format!("{} deleted project \"{}\"", user.name, project.name),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
