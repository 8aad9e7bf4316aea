use super::handler::{RequestError, RequestHandler, RequestState};
use super::views;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Deserialize)]
pub struct DateForm {
    #[serde(default)]
    pub date: String,
}

pub fn build_router(handler: Arc<RequestHandler>) -> Router {
    Router::new()
        .route("/", get(show_form).post(submit_date))
        .route("/health", get(health))
        .with_state(handler)
}

async fn show_form() -> Html<String> {
    Html(views::render(&RequestState::AwaitingInput))
}

async fn submit_date(
    State(handler): State<Arc<RequestHandler>>,
    Form(form): Form<DateForm>,
) -> Response {
    debug!("Prediction requested for {:?}", form.date);

    // Model loading and inference are blocking file/CPU work
    let state = match tokio::task::spawn_blocking(move || handler.handle_submission(&form.date))
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(kind = "task_join_error", "Prediction task failed: {}", e);
            RequestState::Error(RequestError::internal("task_join_error"))
        }
    };

    let status = match &state {
        RequestState::Error(err) if err.user_error => StatusCode::BAD_REQUEST,
        RequestState::Error(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::OK,
    };

    (status, Html(views::render(&state))).into_response()
}

async fn health() -> &'static str {
    "ok"
}
