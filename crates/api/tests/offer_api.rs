//! Offer publication: multipart create/update, TDR storage, public reads.

mod common;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use common::{body_bytes, body_json, offer_form, MultipartBody, TestApp, PDF_BYTES};
use sqlx::PgPool;

const TODAY: &str = "2025-01-05";

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_offer_with_tdr(pool: PgPool) {
    let app = TestApp::new(pool, TODAY);
    let (user_id, awa) = app.seed_user("Awa", "awa@portal.test", "comite_ajout").await;
    let project_id = app.create_project(&awa, "Payroll").await;

    let form = offer_form(project_id, "consultation", "Data Analyst", "2025-01-10")
        .text(
            "notification_emails",
            r#"["a@x.com", "not-an-email", "b@x.com"]"#,
        )
        .file("tdr", "terms.pdf", "application/pdf", PDF_BYTES);
    let response = app.multipart(Method::POST, "/offers", Some(&awa), form).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["type"], "consultation");
    assert_eq!(json["created_by"], user_id);
    assert_eq!(json["tdr_filename"], "terms.pdf");
    assert!(json.get("tdr_filepath").is_none());
    assert_eq!(json["notification_emails"], serde_json::json!(["a@x.com", "b@x.com"]));
    assert_eq!(json["two_day_notified"], false);

    let id = json["id"].as_i64().unwrap();
    let response = app.get(&format!("/offers/{id}/tdr"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/pdf");
    assert!(response.headers()[CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .starts_with("inline"));
    assert_eq!(body_bytes(response).await, PDF_BYTES);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_offer_validation(pool: PgPool) {
    let app = TestApp::new(pool, TODAY);
    let (_, awa) = app.seed_user("Awa", "awa@portal.test", "comite_ajout").await;
    let project_id = app.create_project(&awa, "Payroll").await;

    let missing_title = MultipartBody::new()
        .text("type", "candidature")
        .text("country", "Senegal")
        .text("project_id", &project_id.to_string())
        .text("reference", "REF-1")
        .text("deadline", "2025-01-10");
    let response = app
        .multipart(Method::POST, "/offers", Some(&awa), missing_title)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "title is required");

    let bad_type = offer_form(project_id, "internship", "Intern", "2025-01-10");
    let response = app.multipart(Method::POST, "/offers", Some(&awa), bad_type).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bad_date = offer_form(project_id, "candidature", "Intern", "10/01/2025");
    let response = app.multipart(Method::POST, "/offers", Some(&awa), bad_date).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let not_pdf = offer_form(project_id, "candidature", "Intern", "2025-01-10").file(
        "tdr",
        "terms.docx",
        "application/msword",
        b"doc",
    );
    let response = app.multipart(Method::POST, "/offers", Some(&awa), not_pdf).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "TDR must be a PDF file");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_offer_requires_owned_project(pool: PgPool) {
    let app = TestApp::new(pool, TODAY);
    let (_, awa) = app.seed_user("Awa", "awa@portal.test", "comite_ajout").await;
    let (_, ibou) = app.seed_user("Ibou", "ibou@portal.test", "comite_ajout").await;
    let (_, reviewer) = app.seed_user("Moussa", "moussa@portal.test", "comite_ouverture").await;
    let project_id = app.create_project(&awa, "Payroll").await;

    let form = offer_form(project_id, "candidature", "Accountant", "2025-01-10");
    let response = app.multipart(Method::POST, "/offers", Some(&ibou), form).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let form = offer_form(project_id, "candidature", "Accountant", "2025-01-10");
    let response = app.multipart(Method::POST, "/offers", Some(&reviewer), form).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_public_listing_and_detail(pool: PgPool) {
    let app = TestApp::new(pool, TODAY);
    let (_, awa) = app.seed_user("Awa", "awa@portal.test", "comite_ajout").await;
    let project_id = app.create_project(&awa, "Payroll").await;
    let old = app
        .create_offer(&awa, project_id, "candidature", "Old Offer", "2025-01-02")
        .await;
    let new = app
        .create_offer(&awa, project_id, "candidature", "New Offer", "2025-01-20")
        .await;

    let response = app.get("/offers", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    let listing = listing.as_array().unwrap();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0]["id"], new);
    assert_eq!(listing[0]["status"], "active");
    assert_eq!(listing[0]["project_name"], "Payroll");
    assert_eq!(listing[0]["department_name"], "Payroll department");
    assert!(listing[0]["tdr_url"].is_null());
    assert_eq!(listing[1]["id"], old);
    assert_eq!(listing[1]["status"], "expired");

    let detail = body_json(app.get(&format!("/offers/{new}"), None).await).await;
    assert_eq!(detail["title"], "New Offer");
    assert_eq!(detail["project_id"], project_id);
    assert_eq!(detail["notification_emails"], serde_json::json!(["a@x.com"]));

    assert_eq!(
        app.get("/offers/999999", None).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.get(&format!("/offers/{new}/tdr"), None).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_offer_replaces_tdr(pool: PgPool) {
    let app = TestApp::new(pool, TODAY);
    let (_, awa) = app.seed_user("Awa", "awa@portal.test", "comite_ajout").await;
    let project_id = app.create_project(&awa, "Payroll").await;

    let form = offer_form(project_id, "candidature", "Accountant", "2025-01-10")
        .file("tdr", "v1.pdf", "application/pdf", PDF_BYTES);
    let created = body_json(app.multipart(Method::POST, "/offers", Some(&awa), form).await).await;
    let id = created["id"].as_i64().unwrap();

    let old_path: (String,) = sqlx::query_as("SELECT tdr_filepath FROM offers WHERE id = $1")
        .bind(id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(std::path::Path::new(&old_path.0).exists());

    let form = MultipartBody::new()
        .text("title", "Senior Accountant")
        .text("deadline", "2025-01-31")
        .file("tdr", "v2.pdf", "application/pdf", b"%PDF-1.4 v2");
    let response = app
        .multipart(Method::PUT, &format!("/offers/{id}"), Some(&awa), form)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Senior Accountant");
    assert_eq!(json["deadline"], "2025-01-31");
    assert_eq!(json["tdr_filename"], "v2.pdf");
    // Untouched fields keep their values.
    assert_eq!(json["country"], "Senegal");

    assert!(!std::path::Path::new(&old_path.0).exists());
    let tdr = body_bytes(app.get(&format!("/offers/{id}/tdr"), None).await).await;
    assert_eq!(tdr, b"%PDF-1.4 v2");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_other_publisher_cannot_edit_or_delete_offer(pool: PgPool) {
    let app = TestApp::new(pool, TODAY);
    let (_, awa) = app.seed_user("Awa", "awa@portal.test", "comite_ajout").await;
    let (_, ibou) = app.seed_user("Ibou", "ibou@portal.test", "comite_ajout").await;
    let project_id = app.create_project(&awa, "Payroll").await;
    let id = app
        .create_offer(&awa, project_id, "candidature", "Accountant", "2025-01-10")
        .await;

    let form = MultipartBody::new().text("title", "Mine now");
    let response = app
        .multipart(Method::PUT, &format!("/offers/{id}"), Some(&ibou), form)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.delete(&format!("/offers/{id}"), &ibou).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_offer_removes_files(pool: PgPool) {
    let app = TestApp::new(pool, TODAY);
    let (_, awa) = app.seed_user("Awa", "awa@portal.test", "comite_ajout").await;
    let project_id = app.create_project(&awa, "Payroll").await;

    let form = offer_form(project_id, "candidature", "Accountant", "2025-01-10")
        .file("tdr", "terms.pdf", "application/pdf", PDF_BYTES);
    let id = body_json(app.multipart(Method::POST, "/offers", Some(&awa), form).await).await["id"]
        .as_i64()
        .unwrap();

    let form = common::application_form(id, "Jane Doe", "jane@x.com");
    let response = app.multipart(Method::POST, "/apply", None, form).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let paths: Vec<(String,)> = sqlx::query_as(
        "SELECT tdr_filepath FROM offers WHERE id = $1
         UNION ALL
         SELECT cv_filepath FROM applications WHERE offer_id = $1",
    )
    .bind(id)
    .fetch_all(&app.pool)
    .await
    .unwrap();
    assert_eq!(paths.len(), 2);

    let response = app.delete(&format!("/offers/{id}"), &awa).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for (path,) in paths {
        assert!(!std::path::Path::new(&path).exists(), "{path} should be removed");
    }
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM applications WHERE offer_id = $1")
        .bind(id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0);
    assert_eq!(
        app.get(&format!("/offers/{id}"), None).await.status(),
        StatusCode::NOT_FOUND
    );
}
