//! Medicine info server - upload a medicine photo, OCR it, ask Gemini about it.

mod audit;
mod config;
mod error;
mod gemini;
mod ocr;
mod prompt;
mod upload;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use audit::{AuditLog, AuditRecord};
use config::AppConfig;
use error::ApiError;
use gemini::{GeminiClient, TextGenerator};
use ocr::{TesseractExtractor, TextExtractor};
use prompt::PromptPolicy;

/// Application state shared across handlers.
///
/// The extractor and generator sit behind traits so tests can swap in
/// deterministic stubs. No per-request state lives here.
#[derive(Clone)]
struct AppState {
    extractor: Arc<dyn TextExtractor>,
    generator: Arc<dyn TextGenerator>,
    upload_dir: PathBuf,
    prompt_policy: PromptPolicy,
    generation_timeout: Duration,
    audit: Option<Arc<AuditLog>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medicine_info_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let state = AppState {
        extractor: Arc::new(TesseractExtractor::new()),
        generator: Arc::new(GeminiClient::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        )),
        upload_dir: config.upload_dir.clone(),
        prompt_policy: config.prompt_policy,
        generation_timeout: config.generation_timeout,
        audit: config.audit_log.clone().map(|p| Arc::new(AuditLog::new(p))),
    };
    info!(
        "Gemini model: {}, prompt policy: {:?}",
        config.gemini_model, config.prompt_policy
    );

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Server running on http://localhost:{}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/process-image", post(process_image))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Liveness check.
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({"message": "Hello, the server is live!"}))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessImageResponse {
    message: String,
    extracted_text: String,
    medicine_info: MedicineInfo,
}

#[derive(Debug, Serialize)]
struct MedicineInfo {
    title: String,
    details: String,
}

/// Upload pipeline: intake, OCR, prompt build, generation, assembly.
///
/// Strictly sequential; each stage's failure short-circuits the rest. The
/// temp file is removed on every exit path, with the `TempUpload` drop guard
/// backstopping anything not handled explicitly.
async fn process_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessImageResponse>, ApiError> {
    let mut upload = upload::receive_image(&mut multipart, &state.upload_dir).await?;

    let extracted_text = match state.extractor.extract(upload.path()).await {
        Ok(text) => text,
        Err(e) => {
            upload.remove();
            return Err(ApiError::Ocr(e));
        }
    };

    if extracted_text.is_empty() {
        upload.remove();
        return Err(ApiError::EmptyText);
    }
    info!("Extracted {} chars of text", extracted_text.len());

    let prompt = state.prompt_policy.build(&extracted_text);

    let generation = tokio::time::timeout(
        state.generation_timeout,
        state.generator.generate(&prompt),
    )
    .await;

    let gemini_response = match generation {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            upload.remove();
            return Err(ApiError::Generation(e));
        }
        Err(_) => {
            upload.remove();
            return Err(ApiError::Generation(anyhow::anyhow!(
                "Generation timed out after {:?}",
                state.generation_timeout
            )));
        }
    };

    let image_path = upload.path().display().to_string();
    upload.remove();

    let details = gemini_response.first_text();
    let title = prompt::refine_text(&extracted_text);

    // Off the functional path: the audit trail is write-only and best-effort.
    if let Some(audit) = &state.audit {
        audit.append(&AuditRecord::new(
            image_path,
            extracted_text.clone(),
            gemini_response,
        ));
    }

    Ok(Json(ProcessImageResponse {
        message: "Successfully processed the image and retrieved information.".to_string(),
        extracted_text,
        medicine_info: MedicineInfo { title, details },
    }))
}

// ============================================================================
// Tests
// ============================================================================
