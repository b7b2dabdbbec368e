//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;
use crate::static_files;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/config", get(handlers::config::get_config))
        .route("/api/page", get(handlers::page::get_page))
        .route("/api/preview", post(handlers::page::post_preview))
        .route(
            "/api/save-markdown",
            post(handlers::save::save_markdown).fallback(handlers::save::method_not_allowed),
        )
        .route("/api/chat", post(handlers::chat::post_chat));

    let [csp, content_type_options, frame_options] = security::header_layers();

    Router::new()
        .route("/", get(handlers::index::get_index))
        .merge(api_routes)
        .merge(static_files::static_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(csp)
                .layer(content_type_options)
                .layer(frame_options),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use fx_chat::{ChatBackend, ChatError, ChatMessage};
    use fx_config::SiteConfig;
    use fx_site::{ContentStore, Site};
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    struct EchoChat;

    impl ChatBackend for EchoChat {
        fn complete(&self, history: &[ChatMessage], message: &str) -> Result<String, ChatError> {
            Ok(format!("{} turns, you said {message}", history.len()))
        }
    }

    struct FailingChat;

    impl ChatBackend for FailingChat {
        fn complete(&self, _: &[ChatMessage], _: &str) -> Result<String, ChatError> {
            Err(ChatError::Transport("connection refused".to_owned()))
        }
    }

    fn router_for(path: PathBuf, chat: Option<Box<dyn ChatBackend>>) -> Router {
        let site = Site::new(ContentStore::new(path), "mermaid", None).unwrap();
        create_router(Arc::new(AppState {
            site,
            site_info: SiteConfig::default(),
            chat,
            verbose: false,
        }))
    }

    fn setup(content: &str) -> (tempfile::TempDir, PathBuf, Router) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.md");
        std::fs::write(&path, content).unwrap();
        let router = router_for(path.clone(), None);
        (dir, path, router)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_save_writes_document_verbatim() {
        let (_dir, path, router) = setup("# Old\n");
        let content = "---\ntitle: New\n---\n\n```mermaid\nA->B\n```\n";
        let body = serde_json::json!({ "content": content }).to_string();

        let response = router
            .oneshot(post_json("/api/save-markdown", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"message": "Content saved successfully"})
        );
        assert_eq!(std::fs::read_to_string(path).unwrap(), content);
    }

    #[tokio::test]
    async fn test_save_without_content_is_bad_request() {
        let (_dir, path, router) = setup("# Old\n");

        let response = router
            .oneshot(post_json("/api/save-markdown", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"message": "Content is required"})
        );
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Old\n");
    }

    #[tokio::test]
    async fn test_save_with_empty_content_is_bad_request() {
        let (_dir, _path, router) = setup("# Old\n");

        let response = router
            .oneshot(post_json("/api/save-markdown", r#"{"content":""}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_save_with_malformed_json_is_bad_request() {
        let (_dir, _path, router) = setup("# Old\n");

        let response = router
            .oneshot(post_json("/api/save-markdown", "{\"content\":"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn test_save_rejects_other_methods() {
        let (_dir, _path, router) = setup("# Old\n");

        let response = router.oneshot(get("/api/save-markdown")).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"message": "Method not allowed"})
        );
    }

    #[tokio::test]
    async fn test_save_write_failure_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let router = router_for(dir.path().join("missing/content.md"), None);

        let response = router
            .oneshot(post_json("/api/save-markdown", r#"{"content":"x"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"message": "Failed to save content"})
        );
    }

    #[tokio::test]
    async fn test_saved_page_is_served() {
        let (_dir, _path, router) = setup("# Old\n");

        let response = router
            .clone()
            .oneshot(post_json("/api/save-markdown", r##"{"content":"# New\n"}"##))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router.oneshot(get("/api/page")).await.unwrap();
        let json = json_body(response).await;
        assert_eq!(json["meta"]["title"], "New");
    }

    #[tokio::test]
    async fn test_page_response_and_etag() {
        let (_dir, _path, router) =
            setup("---\ntitle: Algo\nowner: desk\n---\n# Title\n\n```mermaid\nA->B\n```\n\nEnd.");

        let response = router.clone().oneshot(get("/api/page")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let etag = response.headers()[header::ETAG].clone();
        assert!(response.headers().contains_key(header::LAST_MODIFIED));

        let json = json_body(response).await;
        assert_eq!(json["meta"]["title"], "Algo");
        assert_eq!(json["meta"]["vars"]["owner"], "desk");
        assert_eq!(json["fragments"][1]["type"], "diagram");
        assert_eq!(json["fragments"][1]["id"], "diagram-0");
        assert!(
            json["content"]
                .as_str()
                .unwrap()
                .contains("<pre>A-&gt;B</pre>")
        );

        let request = Request::builder()
            .uri("/api/page")
            .header(header::IF_NONE_MATCH, etag)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_page_for_missing_document_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let router = router_for(dir.path().join("content.md"), None);

        let response = router.oneshot(get("/api/page")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preview_does_not_save() {
        let (_dir, path, router) = setup("# Old\n");

        let response = router
            .oneshot(post_json("/api/preview", r##"{"content":"# Draft\n"}"##))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["content"], "<h1 id=\"draft\">Draft</h1>\n");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Old\n");
    }

    #[tokio::test]
    async fn test_index_embeds_editor_source() {
        let (_dir, _path, router) = setup("# Welcome\n");

        let response = router.oneshot(get("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("<h1 id=\"welcome\">Welcome</h1>"));
        assert!(html.contains("># Welcome\n</textarea>"));
        assert!(!html.contains("id=\"chat\""));
    }

    #[tokio::test]
    async fn test_config_reports_chat_state() {
        let dir = tempfile::tempdir().unwrap();
        let router = router_for(dir.path().join("content.md"), Some(Box::new(EchoChat)));

        let response = router.oneshot(get("/api/config")).await.unwrap();

        let json = json_body(response).await;
        assert_eq!(json["chatEnabled"], true);
        assert_eq!(json["greeting"], fx_chat::GREETING);
    }

    #[tokio::test]
    async fn test_chat_reply() {
        let dir = tempfile::tempdir().unwrap();
        let router = router_for(dir.path().join("content.md"), Some(Box::new(EchoChat)));
        let body = r#"{"message":" hi ","history":[{"role":"user","content":"a"},{"role":"model","content":"b"}]}"#;

        let response = router.oneshot(post_json("/api/chat", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"reply": "2 turns, you said hi"})
        );
    }

    #[tokio::test]
    async fn test_chat_empty_message_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let router = router_for(dir.path().join("content.md"), Some(Box::new(EchoChat)));

        let response = router
            .oneshot(post_json("/api/chat", r#"{"message":"   "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"message": "Message is required"})
        );
    }

    #[tokio::test]
    async fn test_chat_failure_answers_with_apology() {
        for chat in [None, Some(Box::new(FailingChat) as Box<dyn ChatBackend>)] {
            let dir = tempfile::tempdir().unwrap();
            let router = router_for(dir.path().join("content.md"), chat);

            let response = router
                .oneshot(post_json("/api/chat", r#"{"message":"hello"}"#))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(json_body(response).await["reply"], fx_chat::APOLOGY);
        }
    }

    #[tokio::test]
    async fn test_security_headers_on_every_response() {
        let (_dir, _path, router) = setup("# Doc\n");

        for request in [get("/"), get("/api/config"), get("/api/save-markdown")] {
            let response = router.clone().oneshot(request).await.unwrap();
            let headers = response.headers();
            assert!(headers.contains_key("content-security-policy"));
            assert_eq!(headers["x-content-type-options"], "nosniff");
            assert_eq!(headers["x-frame-options"], "DENY");
        }
    }

    #[tokio::test]
    async fn test_assets_are_served() {
        let (_dir, _path, router) = setup("");

        let response = router.clone().oneshot(get("/assets/style.css")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");

        let response = router.oneshot(get("/assets/missing.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
