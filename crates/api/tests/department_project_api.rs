//! Creator-scoped departments and projects.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, TestApp};
use sqlx::PgPool;

const TODAY: &str = "2025-01-05";

async fn create_department(app: &TestApp, token: &str, name: &str) -> i64 {
    let response = app
        .json(
            Method::POST,
            "/departments",
            Some(token),
            serde_json::json!({ "name": name }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_departments_are_listed_per_creator(pool: PgPool) {
    let app = TestApp::new(pool, TODAY);
    let (_, awa) = app.seed_user("Awa", "awa@portal.test", "comite_ajout").await;
    let (_, ibou) = app.seed_user("Ibou", "ibou@portal.test", "comite_ajout").await;

    create_department(&app, &awa, "Finance").await;
    create_department(&app, &awa, "Audit").await;
    create_department(&app, &ibou, "Logistics").await;

    let json = body_json(app.get("/departments", Some(&awa)).await).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Audit", "Finance"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_department_validation_and_conflict(pool: PgPool) {
    let app = TestApp::new(pool, TODAY);
    let (_, awa) = app.seed_user("Awa", "awa@portal.test", "comite_ajout").await;

    let blank = app
        .json(Method::POST, "/departments", Some(&awa), serde_json::json!({ "name": "  " }))
        .await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    create_department(&app, &awa, "Finance").await;
    let duplicate = app
        .json(Method::POST, "/departments", Some(&awa), serde_json::json!({ "name": "Finance" }))
        .await;
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(duplicate).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_other_publisher_cannot_touch_department(pool: PgPool) {
    let app = TestApp::new(pool, TODAY);
    let (_, awa) = app.seed_user("Awa", "awa@portal.test", "comite_ajout").await;
    let (_, ibou) = app.seed_user("Ibou", "ibou@portal.test", "comite_ajout").await;
    let id = create_department(&app, &awa, "Finance").await;

    let update = app
        .json(
            Method::PUT,
            &format!("/departments/{id}"),
            Some(&ibou),
            serde_json::json!({ "name": "Hijacked" }),
        )
        .await;
    assert_eq!(update.status(), StatusCode::FORBIDDEN);

    let delete = app.delete(&format!("/departments/{id}"), &ibou).await;
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);

    let update = app
        .json(
            Method::PUT,
            &format!("/departments/{id}"),
            Some(&awa),
            serde_json::json!({ "name": "Finance & Budget" }),
        )
        .await;
    assert_eq!(update.status(), StatusCode::OK);
    assert_eq!(body_json(update).await["name"], "Finance & Budget");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_department_with_projects_cannot_be_deleted(pool: PgPool) {
    let app = TestApp::new(pool, TODAY);
    let (_, awa) = app.seed_user("Awa", "awa@portal.test", "comite_ajout").await;
    let department_id = create_department(&app, &awa, "Finance").await;

    let response = app
        .json(
            Method::POST,
            "/projects",
            Some(&awa),
            serde_json::json!({ "name": "Payroll", "department_id": department_id }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let project_id = body_json(response).await["id"].as_i64().unwrap();

    let blocked = app.delete(&format!("/departments/{department_id}"), &awa).await;
    assert_eq!(blocked.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(blocked).await["code"], "HAS_DEPENDENTS");

    assert_eq!(
        app.delete(&format!("/projects/{project_id}"), &awa).await.status(),
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        app.delete(&format!("/departments/{department_id}"), &awa).await.status(),
        StatusCode::NO_CONTENT
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_project_requires_owned_department(pool: PgPool) {
    let app = TestApp::new(pool, TODAY);
    let (_, awa) = app.seed_user("Awa", "awa@portal.test", "comite_ajout").await;
    let (_, ibou) = app.seed_user("Ibou", "ibou@portal.test", "comite_ajout").await;
    let awa_department = create_department(&app, &awa, "Finance").await;
    let ibou_department = create_department(&app, &ibou, "Logistics").await;

    let response = app
        .json(
            Method::POST,
            "/projects",
            Some(&ibou),
            serde_json::json!({ "name": "Sneaky", "department_id": awa_department }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .json(
            Method::POST,
            "/projects",
            Some(&awa),
            serde_json::json!({ "name": "Payroll", "department_id": awa_department }),
        )
        .await;
    let project_id = body_json(response).await["id"].as_i64().unwrap();

    // Moving a project into someone else's department is refused.
    let response = app
        .json(
            Method::PUT,
            &format!("/projects/{project_id}"),
            Some(&awa),
            serde_json::json!({ "department_id": ibou_department }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .get(&format!("/projects/department/{awa_department}"), Some(&ibou))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .get(&format!("/projects/department/{awa_department}"), Some(&awa))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let listed = body_json(app.get("/projects", Some(&awa)).await).await;
    assert_eq!(listed[0]["name"], "Payroll");
    assert_eq!(listed[0]["department_name"], "Finance");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_project_with_offers_cannot_be_deleted(pool: PgPool) {
    let app = TestApp::new(pool, TODAY);
    let (_, awa) = app.seed_user("Awa", "awa@portal.test", "comite_ajout").await;
    let project_id = app.create_project(&awa, "Payroll").await;
    app.create_offer(&awa, project_id, "candidature", "Accountant", "2025-02-01")
        .await;

    let response = app.delete(&format!("/projects/{project_id}"), &awa).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "HAS_DEPENDENTS");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_mutations_are_audited(pool: PgPool) {
    let app = TestApp::new(pool, TODAY);
    let (_, admin) = app.seed_user("Root", "root@portal.test", "admin").await;
    let (_, awa) = app.seed_user("Awa", "awa@portal.test", "comite_ajout").await;
    create_department(&app, &awa, "Finance").await;

    let logs = body_json(app.get("/logs", Some(&admin)).await).await;
    assert_eq!(logs[0]["message"], "Awa created department \"Finance\"");
}
