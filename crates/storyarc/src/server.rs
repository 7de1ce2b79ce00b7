//! HTTP surface for story actions.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use storyarc_core::ActLabel;
use storyarc_error::{StoryError, StoryErrorKind, ValidationError, ValidationErrorKind};
use storyarc_interface::StoryDriver;
use storyarc_narrative::{ActOutcome, SessionSnapshot, StoryController};
use tracing::{error, info, warn};

/// Request body for `analyze_script`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptBody {
    /// Script to analyze
    pub script: String,
}

/// Request body for `process_feedback`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackBody {
    /// Feedback on the analysis
    pub feedback: String,
}

/// Request body for `update_word_count`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WordCountBody {
    /// Setup target
    pub setup: usize,
    /// Development target
    pub development: usize,
    /// Twist target
    pub twist: usize,
    /// Resolution target
    pub resolution: usize,
}

/// Request body for `update_instruction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionBody {
    /// Steering instruction
    pub instruction: String,
}

/// Plain text reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextReply {
    /// Reply text
    pub text: String,
}

/// Reply for act actions.
#[derive(Debug, Clone, Serialize)]
pub struct ActReply {
    #[serde(flatten)]
    outcome: ActOutcome,
    count_label: String,
}

impl From<ActOutcome> for ActReply {
    fn from(outcome: ActOutcome) -> Self {
        let count_label = outcome.count_label();
        Self {
            outcome,
            count_label,
        }
    }
}

/// A [`StoryError`] rendered as an HTTP response.
#[derive(Debug, derive_more::From)]
pub struct ApiError(StoryError);

impl ApiError {
    /// Status code for the error's kind.
    pub fn status_code(&self) -> StatusCode {
        match self.0.kind() {
            StoryErrorKind::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StoryErrorKind::Prerequisite(_) => StatusCode::CONFLICT,
            StoryErrorKind::Service(_) => StatusCode::BAD_GATEWAY,
            StoryErrorKind::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self.0.kind() {
            StoryErrorKind::Validation(e) => e.kind.to_string(),
            StoryErrorKind::Prerequisite(e) => e.kind.to_string(),
            StoryErrorKind::Service(e) => e.kind.to_string(),
            StoryErrorKind::Config(e) => e.message.clone(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(StoryError::from(ValidationError::new(
            ValidationErrorKind::InvalidBody {
                reason: rejection.body_text(),
            },
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.0, "Action failed");
        } else {
            warn!(status = status.as_u16(), error = %self.0, "Action refused");
        }
        let body = json!({
            "error": self.message(),
            "status": self.0.status_label(),
        });
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;
type Shared<D> = State<Arc<StoryController<D>>>;
type Body<T> = Result<Json<T>, JsonRejection>;

/// Router exposing every controller action under `/api`.
pub fn router<D: StoryDriver + 'static>(controller: Arc<StoryController<D>>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/analyze_script", post(analyze_script::<D>))
        .route("/api/process_feedback", post(process_feedback::<D>))
        .route("/api/create_intro", post(create_intro::<D>))
        .route("/api/create_development", post(create_development::<D>))
        .route("/api/create_turn", post(create_turn::<D>))
        .route("/api/create_conclusion", post(create_conclusion::<D>))
        .route("/api/update_word_count", post(update_word_count::<D>))
        .route("/api/update_instruction", post(update_instruction::<D>))
        .route("/api/session", get(session::<D>))
        .route("/api/reset", post(reset::<D>))
        .with_state(controller)
}

/// Bind `address` and serve `controller` until the process stops.
pub async fn serve<D: StoryDriver + 'static>(
    controller: StoryController<D>,
    address: &str,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!(address = %listener.local_addr()?, "Serving story actions");
    axum::serve(listener, router(Arc::new(controller))).await
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

async fn analyze_script<D: StoryDriver + 'static>(
    State(controller): Shared<D>,
    payload: Body<ScriptBody>,
) -> ApiResult<TextReply> {
    let Json(body) = payload?;
    let text = controller.analyze_script(&body.script).await?;
    Ok(Json(TextReply { text }))
}

async fn process_feedback<D: StoryDriver + 'static>(
    State(controller): Shared<D>,
    payload: Body<FeedbackBody>,
) -> ApiResult<TextReply> {
    let Json(body) = payload?;
    let text = controller.process_feedback(&body.feedback).await?;
    Ok(Json(TextReply { text }))
}

async fn act<D: StoryDriver + 'static>(
    controller: &StoryController<D>,
    label: ActLabel,
) -> ApiResult<ActReply> {
    let outcome = controller.create_act(label).await?;
    Ok(Json(outcome.into()))
}

async fn create_intro<D: StoryDriver + 'static>(State(controller): Shared<D>) -> ApiResult<ActReply> {
    act(&controller, ActLabel::Setup).await
}

async fn create_development<D: StoryDriver + 'static>(
    State(controller): Shared<D>,
) -> ApiResult<ActReply> {
    act(&controller, ActLabel::Development).await
}

async fn create_turn<D: StoryDriver + 'static>(State(controller): Shared<D>) -> ApiResult<ActReply> {
    act(&controller, ActLabel::Twist).await
}

async fn create_conclusion<D: StoryDriver + 'static>(
    State(controller): Shared<D>,
) -> ApiResult<ActReply> {
    act(&controller, ActLabel::Resolution).await
}

async fn update_word_count<D: StoryDriver + 'static>(
    State(controller): Shared<D>,
    payload: Body<WordCountBody>,
) -> ApiResult<TextReply> {
    let Json(body) = payload?;
    let text = controller
        .update_word_count(body.setup, body.development, body.twist, body.resolution)
        .await?;
    Ok(Json(TextReply { text }))
}

async fn update_instruction<D: StoryDriver + 'static>(
    State(controller): Shared<D>,
    payload: Body<InstructionBody>,
) -> ApiResult<TextReply> {
    let Json(body) = payload?;
    let text = controller.update_instruction(&body.instruction).await;
    Ok(Json(TextReply { text }))
}

async fn session<D: StoryDriver + 'static>(State(controller): Shared<D>) -> Json<SessionSnapshot> {
    Json(controller.snapshot().await)
}

async fn reset<D: StoryDriver + 'static>(State(controller): Shared<D>) -> Json<SessionSnapshot> {
    Json(controller.reset().await)
}
