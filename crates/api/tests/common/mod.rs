//! Shared helpers for the HTTP-level integration tests.
//!
//! Requests are sent straight to the router with `tower::ServiceExt::oneshot`,
//! without a TCP listener. Each [`TestApp`] owns a temporary directory for
//! uploads and archives, a pinned clock and a mailer that records every send.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use portal_core::clock::FixedClock;
use portal_core::types::DbId;
use portal_db::models::user::CreateUser;
use portal_db::repositories::UserRepo;
use portal_events::{EmailError, Mailer};
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use portal_api::auth::jwt::{generate_access_token, JwtConfig, TokenSubject};
use portal_api::auth::password::hash_password;
use portal_api::config::ServerConfig;
use portal_api::router::build_app_router;
use portal_api::state::AppState;
use portal_api::storage::FileStore;

pub const TEST_PASSWORD: &str = "test_password_123";

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: html_body.to_string(),
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` rooted at `dir`.
pub fn test_config(dir: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 10 * 1024 * 1024,
        files_dir: dir.path().join("files"),
        archives_dir: dir.path().join("archives"),
        expiration_sweep_enabled: false,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    pub mailer: Arc<RecordingMailer>,
    pub config: ServerConfig,
    pub dir: TempDir,
}

impl TestApp {
    /// Full application router with "today" pinned to `today` (`YYYY-MM-DD`).
    pub fn new(pool: PgPool, today: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let mailer = Arc::new(RecordingMailer::default());

        let state = AppState {
            pool: pool.clone(),
            config: Arc::new(config.clone()),
            mailer: mailer.clone(),
            clock: Arc::new(FixedClock::new(date(today))),
            files: Arc::new(FileStore::new(&config.files_dir, &config.archives_dir)),
        };
        let router = build_app_router(state, &config);

        Self {
            router,
            pool,
            mailer,
            config,
            dir,
        }
    }

    /// Insert a user directly and mint a token for them.
    pub async fn seed_user(&self, name: &str, email: &str, role: &str) -> (DbId, String) {
        let user = UserRepo::create(
            &self.pool,
            &CreateUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: hash_password(TEST_PASSWORD).unwrap(),
                role: role.to_string(),
            },
        )
        .await
        .unwrap();

        let token = generate_access_token(
            TokenSubject {
                user_id: user.id,
                name: &user.name,
                email: &user.email,
                role: &user.role,
            },
            &self.config.jwt,
        )
        .unwrap();
        (user.id, token)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Response<Body> {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn multipart(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        form: MultipartBody,
    ) -> Response<Body> {
        let (content_type, body) = form.finish();
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, content_type);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    // -- Fixtures built through the API ------------------------------------

    /// Department + project owned by the token's user. Returns the project id.
    pub async fn create_project(&self, token: &str, name: &str) -> DbId {
        let response = self
            .json(
                Method::POST,
                "/departments",
                Some(token),
                serde_json::json!({ "name": format!("{name} department") }),
            )
            .await;
        assert_eq!(response.status(), 201);
        let department_id = body_json(response).await["id"].as_i64().unwrap();

        let response = self
            .json(
                Method::POST,
                "/projects",
                Some(token),
                serde_json::json!({ "name": name, "department_id": department_id }),
            )
            .await;
        assert_eq!(response.status(), 201);
        body_json(response).await["id"].as_i64().unwrap()
    }

    pub async fn create_offer(
        &self,
        token: &str,
        project_id: DbId,
        offer_type: &str,
        title: &str,
        deadline: &str,
    ) -> DbId {
        let form = offer_form(project_id, offer_type, title, deadline);
        let response = self.multipart(Method::POST, "/offers", Some(token), form).await;
        assert_eq!(response.status(), 201);
        body_json(response).await["id"].as_i64().unwrap()
    }
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n% test document\n%%EOF\n";

/// Minimal `multipart/form-data` encoder.
#[derive(Default)]
pub struct MultipartBody {
    parts: Vec<u8>,
}

const BOUNDARY: &str = "----portal-test-boundary";

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.parts.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.parts.extend_from_slice(bytes);
        self.parts.extend_from_slice(b"\r\n");
        self
    }

    pub fn pdf(self, name: &str) -> Self {
        let file_name = format!("{name}.pdf");
        self.file(name, &file_name, "application/pdf", PDF_BYTES)
    }

    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.parts
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (
            format!("multipart/form-data; boundary={BOUNDARY}"),
            self.parts,
        )
    }
}

pub fn offer_form(project_id: DbId, offer_type: &str, title: &str, deadline: &str) -> MultipartBody {
    MultipartBody::new()
        .text("type", offer_type)
        .text("title", title)
        .text("description", "Offer description")
        .text("country", "Senegal")
        .text("project_id", &project_id.to_string())
        .text("reference", &format!("REF-{title}"))
        .text("deadline", deadline)
        .text("notification_emails", r#"["a@x.com"]"#)
}

pub const BASE_DOCUMENTS: [&str; 4] = ["cv", "diplome", "id_card", "cover_letter"];

pub const TENDER_DOCUMENTS: [&str; 6] = [
    "declaration_sur_honneur",
    "fiche_de_referencement",
    "extrait_registre",
    "note_methodologique",
    "liste_references",
    "offre_financiere",
];

/// Applicant fields plus the four base documents.
pub fn application_form(offer_id: DbId, full_name: &str, email: &str) -> MultipartBody {
    let mut form = MultipartBody::new()
        .text("offer_id", &offer_id.to_string())
        .text("full_name", full_name)
        .text("email", email)
        .text("tel_number", "+221 77 000 00 00")
        .text("applicant_country", "Senegal");
    for slot in BASE_DOCUMENTS {
        form = form.pdf(slot);
    }
    form
}
