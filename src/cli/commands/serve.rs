//! Web form for drafting and rendering presentations.
//!
//! Serves a single page with a prompt box and a `.qmd` editor, the JSON
//! endpoints it posts to, and the rendered presentations as static files.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::ChalktalkError;
use crate::orchestrator::{default_title, Orchestrator};
use crate::workspace::relative_media_path;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::error;

const FORM_PAGE: &str = include_str!("../../../assets/form.html");

/// Base name of decks rendered from the form.
const FORM_DECK_NAME: &str = "presentation";

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the web form server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let state = Arc::new(AppState { orchestrator });

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Chalktalk Web Form");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Form", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("Generate", "POST /generate");
    Output::kv("Render", "POST /render");
    Output::kv("Presentations", "GET  /presentations/...");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let presentations = ServeDir::new(state.orchestrator.settings().output_dir());

    Router::new()
        .route("/", get(form))
        .route("/health", get(health))
        .route("/generate", post(generate))
        .route("/render", post(render))
        .nest_service("/presentations", presentations)
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct GenerateRequest {
    prompt: String,
    #[serde(default = "default_num_slides")]
    num_slides: u32,
}

fn default_num_slides() -> u32 {
    10
}

#[derive(Serialize)]
struct GenerateResponse {
    content: String,
}

#[derive(Deserialize)]
struct RenderRequest {
    content: String,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Serialize)]
struct RenderResponse {
    link: String,
    fragments_found: usize,
    fragments_voiced: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(e: ChalktalkError) -> Response {
    let status = match e {
        ChalktalkError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => {
            error!("Request failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(ErrorResponse { error: e.to_string() })).into_response()
}

/// URL under `/presentations` for a file inside the output directory.
fn presentation_link(final_html: &Path, output_dir: &Path) -> String {
    format!("/presentations/{}", relative_media_path(final_html, output_dir))
}

// === Handlers ===

async fn form() -> Html<&'static str> {
    Html(FORM_PAGE)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Response {
    if !(1..=20).contains(&req.num_slides) {
        return error_response(ChalktalkError::InvalidInput(
            "Number of slides must be between 1 and 20".to_string(),
        ));
    }

    let title = default_title(&req.prompt, state.orchestrator.settings().llm.title_max_chars);

    match state
        .orchestrator
        .generate_qmd(&req.prompt, &title, req.num_slides)
        .await
    {
        Ok(content) => Json(GenerateResponse { content }).into_response(),
        Err(e) => error_response(e),
    }
}

async fn render(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenderRequest>,
) -> Response {
    if req.content.trim().is_empty() {
        return error_response(ChalktalkError::InvalidInput(
            "Presentation content is empty".to_string(),
        ));
    }

    let title = req
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| FORM_DECK_NAME.to_string());

    match state
        .orchestrator
        .render_presentation(&req.content, &title, FORM_DECK_NAME)
        .await
    {
        Ok(result) => Json(RenderResponse {
            link: presentation_link(&result.final_html, &state.orchestrator.settings().output_dir()),
            fragments_found: result.fragments_found,
            fragments_voiced: result.fragments_voiced,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slides::SlideDrafter;
    use crate::speech::testing::FakeSynth;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::util::ServiceExt;

    struct EchoDrafter;

    #[async_trait]
    impl SlideDrafter for EchoDrafter {
        async fn draft(&self, topic: &str, title: &str, num_slides: u32) -> crate::Result<String> {
            Ok(format!("## {title}\n\n{topic} in {num_slides}"))
        }
    }

    fn app(output_dir: &Path) -> Router {
        let mut settings = Settings::default();
        settings.general.output_dir = output_dir.display().to_string();

        let orchestrator = Orchestrator::with_components(
            settings,
            Arc::new(EchoDrafter),
            Arc::new(FakeSynth::default()),
        );
        router(Arc::new(AppState { orchestrator }))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_form_page() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app(dir.path()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("Generate Presentation"));
        assert!(page.contains("Render Presentation"));
    }

    #[tokio::test]
    async fn test_generate() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path())
            .oneshot(post_json("/generate", serde_json::json!({"prompt": "Closures", "num_slides": 3})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let content = body["content"].as_str().unwrap();
        assert!(content.starts_with("---\n"));
        assert!(content.ends_with("## Closures\n\nClosures in 3"));
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path())
            .oneshot(post_json("/generate", serde_json::json!({"prompt": "   "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_generate_rejects_slide_count() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path())
            .oneshot(post_json("/generate", serde_json::json!({"prompt": "x", "num_slides": 21})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_render_rejects_empty_content() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path())
            .oneshot(post_json("/render", serde_json::json!({"content": ""})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_presentations_are_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("deck")).unwrap();
        std::fs::write(dir.path().join("deck/presentation_final.html"), "<html></html>").unwrap();

        let request = Request::builder()
            .uri("/presentations/deck/presentation_final.html")
            .body(Body::empty())
            .unwrap();
        let response = app(dir.path()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_presentation_link() {
        let link = presentation_link(
            Path::new("out/deck_1/presentation_final.html"),
            Path::new("out"),
        );
        assert_eq!(link, "/presentations/deck_1/presentation_final.html");
    }
}
