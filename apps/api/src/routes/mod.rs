pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_body_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/me", get(auth::handle_me))
        // Resumes
        .route(
            "/api/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route(
            "/api/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        .route("/api/resumes/:id/upload", post(resumes::handle_upload))
        .route("/api/resumes/:id/preview", get(resumes::handle_preview_resume))
        .route("/api/resumes/:id/export", post(resumes::handle_export_resume))
        // Unsaved drafts
        .route("/api/preview", post(resumes::handle_preview_draft))
        .route("/api/export", post(resumes::handle_export_draft))
        .layer(body_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::auth::store::memory::MemoryUserStore;
    use crate::config::test_config;
    use crate::export::raster::encode_png;
    use crate::export::ExportGate;
    use crate::resumes::store::memory::MemoryResumeStore;
    use crate::storage::memory::MemoryFileStore;

    struct TestApp {
        router: Router,
        files: Arc<MemoryFileStore>,
        exports: Arc<ExportGate>,
    }

    impl TestApp {
        fn new() -> Self {
            let files = Arc::new(MemoryFileStore::default());
            let state = AppState::new(
                test_config(),
                Arc::new(MemoryResumeStore::default()),
                Arc::new(MemoryUserStore::default()),
                files.clone(),
            );
            let exports = state.exports.clone();
            Self {
                router: build_router(state),
                files,
                exports,
            }
        }

        async fn send(&self, request: Request<Body>) -> Response {
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn json(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            let response = self.send(request).await;
            let status = response.status();
            let bytes = read_body(response).await;
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, value)
        }

        async fn register(&self, email: &str) -> String {
            let (status, body) = self
                .json(
                    Method::POST,
                    "/api/auth/register",
                    None,
                    Some(json!({"email": email, "password": "hunter2hunter2", "full_name": "Ada"})),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "{body}");
            body["access_token"].as_str().unwrap().to_string()
        }

        async fn create_resume(&self, token: &str, body: Value) -> Value {
            let (status, record) = self
                .json(Method::POST, "/api/resumes", Some(token), Some(body))
                .await;
            assert_eq!(status, StatusCode::OK, "{record}");
            record
        }
    }

    async fn read_body(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    fn sample_resume() -> Value {
        json!({
            "title": "Backend CV",
            "template": "classic",
            "data": {
                "personal_info": {"full_name": "Ada Lovelace", "email": "ada@example.com"},
                "work_experience": [
                    {"id": "w1", "company": "Analytical Engines", "position": "Engineer", "current": true}
                ],
                "education": [],
                "skills": ["Rust", "", "SQL"],
                "certifications": ["AWS SA"]
            }
        })
    }

    fn snapshot_request(uri: &str, token: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "image/png")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new();
        let (status, body) = app.json(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_register_login_me() {
        let app = TestApp::new();
        app.register("ada@example.com").await;

        let (status, body) = app
            .json(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({"email": "ADA@example.com", "password": "hunter2hunter2"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "bearer");
        assert!(body["user"].get("password_hash").is_none());
        let token = body["access_token"].as_str().unwrap();

        let (status, me) = app.json(Method::GET, "/api/auth/me", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["email"], "ada@example.com");
        assert_eq!(me["full_name"], "Ada");
    }

    #[tokio::test]
    async fn test_register_rejections() {
        let app = TestApp::new();
        app.register("ada@example.com").await;

        let (status, body) = app
            .json(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({"email": "ada@example.com", "password": "another-password"})),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["message"], "Email already registered");

        let (status, _) = app
            .json(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({"email": "grace@example.com", "password": "short"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .json(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({"email": "not-an-email", "password": "long-enough"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bad_login_is_unauthorized() {
        let app = TestApp::new();
        app.register("ada@example.com").await;

        for (email, password) in [("ada@example.com", "wrong-password"), ("nobody@example.com", "x")] {
            let (status, body) = app
                .json(
                    Method::POST,
                    "/api/auth/login",
                    None,
                    Some(json!({"email": email, "password": password})),
                )
                .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        }
    }

    #[tokio::test]
    async fn test_resume_routes_require_token() {
        let app = TestApp::new();
        let (status, _) = app.json(Method::GET, "/api/resumes", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app
            .json(Method::GET, "/api/resumes", Some("garbage"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_then_fetch_returns_same_content() {
        let app = TestApp::new();
        let token = app.register("ada@example.com").await;
        let created = app.create_resume(&token, sample_resume()).await;
        let id = created["id"].as_str().unwrap();

        let (status, fetched) = app
            .json(Method::GET, &format!("/api/resumes/{id}"), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
        assert_eq!(fetched["title"], "Backend CV");
        assert_eq!(fetched["template"], "classic");
        assert_eq!(fetched["data"]["skills"], json!(["Rust", "", "SQL"]));
        assert_eq!(fetched["data"]["certifications"], json!(["AWS SA"]));
        assert_eq!(fetched["data"]["work_experience"][0]["id"], "w1");
    }

    #[tokio::test]
    async fn test_create_with_defaults() {
        let app = TestApp::new();
        let token = app.register("ada@example.com").await;
        let created = app.create_resume(&token, json!({})).await;
        assert_eq!(created["title"], "My Resume");
        assert_eq!(created["template"], "modern");
        assert_eq!(created["data"]["work_experience"], json!([]));
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let app = TestApp::new();
        let token = app.register("ada@example.com").await;
        let created = app.create_resume(&token, sample_resume()).await;
        let uri = format!("/api/resumes/{}", created["id"].as_str().unwrap());

        let (status, updated) = app
            .json(Method::PUT, &uri, Some(&token), Some(json!({"template": "minimal"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["template"], "minimal");
        assert_eq!(updated["title"], "Backend CV");
        assert_eq!(updated["data"], created["data"]);

        let (_, fetched) = app.json(Method::GET, &uri, Some(&token), None).await;
        assert_eq!(fetched["template"], "minimal");
    }

    #[tokio::test]
    async fn test_delete_removes_from_list() {
        let app = TestApp::new();
        let token = app.register("ada@example.com").await;
        let keep = app.create_resume(&token, json!({"title": "Keep"})).await;
        let gone = app.create_resume(&token, json!({"title": "Gone"})).await;
        let gone_uri = format!("/api/resumes/{}", gone["id"].as_str().unwrap());

        let (status, _) = app.json(Method::DELETE, &gone_uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, list) = app.json(Method::GET, "/api/resumes", Some(&token), None).await;
        let ids: Vec<&str> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec![keep["id"].as_str().unwrap()]);

        let (status, _) = app.json(Method::GET, &gone_uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.json(Method::DELETE, &gone_uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_is_most_recent_first() {
        let app = TestApp::new();
        let token = app.register("ada@example.com").await;
        let older = app.create_resume(&token, json!({"title": "Older"})).await;
        app.create_resume(&token, json!({"title": "Newer"})).await;

        let uri = format!("/api/resumes/{}", older["id"].as_str().unwrap());
        app.json(Method::PUT, &uri, Some(&token), Some(json!({"title": "Touched"})))
            .await;

        let (_, list) = app.json(Method::GET, "/api/resumes", Some(&token), None).await;
        let titles: Vec<&str> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Touched", "Newer"]);
        assert!(list[0].get("data").is_none());
    }

    #[tokio::test]
    async fn test_resumes_are_private_to_owner() {
        let app = TestApp::new();
        let ada = app.register("ada@example.com").await;
        let grace = app.register("grace@example.com").await;
        let created = app.create_resume(&ada, sample_resume()).await;
        let uri = format!("/api/resumes/{}", created["id"].as_str().unwrap());

        let (status, _) = app.json(Method::GET, &uri, Some(&grace), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.json(Method::DELETE, &uri, Some(&grace), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (_, list) = app.json(Method::GET, "/api/resumes", Some(&grace), None).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_preview_stored_resume() {
        let app = TestApp::new();
        let token = app.register("ada@example.com").await;
        let created = app.create_resume(&token, sample_resume()).await;

        let request = Request::builder()
            .uri(format!("/api/resumes/{}/preview", created["id"].as_str().unwrap()))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));

        let html = String::from_utf8(read_body(response).await).unwrap();
        assert!(html.contains("<title>Backend CV</title>"));
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("data-section=\"experience\""));
        assert!(html.contains("data-capture-scale=\"2\""));
    }

    #[tokio::test]
    async fn test_preview_draft() {
        let app = TestApp::new();
        let token = app.register("ada@example.com").await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/preview")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"template": "minimal", "data": {}}).to_string()))
            .unwrap();
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = String::from_utf8(read_body(response).await).unwrap();
        assert!(html.contains("Your Name"));
        assert!(!html.contains("data-section="));
    }

    #[tokio::test]
    async fn test_export_draft_returns_pdf_download() {
        let app = TestApp::new();
        let token = app.register("ada@example.com").await;

        let response = app
            .send(snapshot_request("/api/export", &token, encode_png(60, 80)))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("filename=\"My Resume.pdf\""));

        let pdf = read_body(response).await;
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_export_stored_resume_uses_title() {
        let app = TestApp::new();
        let token = app.register("ada@example.com").await;
        let created = app.create_resume(&token, sample_resume()).await;
        let uri = format!("/api/resumes/{}/export", created["id"].as_str().unwrap());

        let response = app.send(snapshot_request(&uri, &token, encode_png(40, 40))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("filename=\"Backend CV.pdf\""));
    }

    #[tokio::test]
    async fn test_export_rejects_non_image() {
        let app = TestApp::new();
        let token = app.register("ada@example.com").await;
        let response = app
            .send(snapshot_request("/api/export?title=CV", &token, b"<html></html>".to_vec()))
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = serde_json::from_slice(&read_body(response).await).unwrap();
        assert_eq!(body["error"]["code"], "EXPORT_ERROR");
    }

    #[tokio::test]
    async fn test_create_rekeys_duplicate_entry_ids() {
        let app = TestApp::new();
        let token = app.register("ada@example.com").await;
        let mut resume = sample_resume();
        resume["data"]["work_experience"] = json!([
            {"id": "dup", "company": "A", "position": "Engineer"},
            {"id": "dup", "company": "B", "position": "Engineer"}
        ]);

        let created = app.create_resume(&token, resume).await;
        let work = created["data"]["work_experience"].as_array().unwrap();
        assert_eq!(work[0]["id"], "dup");
        assert_ne!(work[1]["id"], "dup");
        assert_eq!(work[1]["company"], "B");
    }

    #[tokio::test]
    async fn test_export_refused_while_another_is_running() {
        let app = TestApp::new();
        let token = app.register("ada@example.com").await;
        let (_, me) = app.json(Method::GET, "/api/auth/me", Some(&token), None).await;
        let user_id: Uuid = me["id"].as_str().unwrap().parse().unwrap();

        let running = app.exports.try_begin(user_id).unwrap();
        let response = app
            .send(snapshot_request("/api/export", &token, encode_png(20, 20)))
            .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        drop(running);
        let response = app
            .send(snapshot_request("/api/export", &token, encode_png(20, 20)))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!app.exports.is_running(user_id));
    }

    #[tokio::test]
    async fn test_upload_attaches_file() {
        let app = TestApp::new();
        let token = app.register("ada@example.com").await;
        let created = app.create_resume(&token, sample_resume()).await;
        let id = created["id"].as_str().unwrap();

        let boundary = "lyncat-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"old-cv.PDF\"\r\n\
             Content-Type: application/pdf\r\n\r\n\
             %PDF-1.4 fake\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/resumes/{id}/upload"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: Value = serde_json::from_slice(&read_body(response).await).unwrap();
        assert_eq!(json["message"], "File uploaded successfully");
        let key = json["filename"].as_str().unwrap().to_string();
        assert!(key.starts_with(&format!("uploads/{id}/")));
        assert!(key.ends_with(".pdf"));

        let objects = app.files.objects.read().await;
        let (stored, content_type) = &objects[&key];
        assert_eq!(&stored[..], b"%PDF-1.4 fake");
        assert_eq!(content_type.as_deref(), Some("application/pdf"));
        drop(objects);

        let (_, fetched) = app
            .json(Method::GET, &format!("/api/resumes/{id}"), Some(&token), None)
            .await;
        assert_eq!(fetched["uploaded_file"], key.as_str());
    }
}
