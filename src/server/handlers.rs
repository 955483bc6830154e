use crate::client::render::ScoreTier;
use crate::core::checker::TEXT_REQUIRED;
use crate::domain::model::{CheckRequest, CheckResult};
use crate::domain::ports::TextGenerator;
use crate::server::AppState;
use crate::utils::error::{GrammateError, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use std::sync::LazyLock;

const INDEX_TEMPLATE: &str = include_str!("../../assets/index.html");

// Score colors are filled in from `ScoreTier` so the page and the terminal
// client share one palette.
static INDEX_HTML: LazyLock<String> = LazyLock::new(|| render_index(INDEX_TEMPLATE));

fn render_index(template: &str) -> String {
    template
        .replace("{{SCORE_HIGH_COLOR}}", ScoreTier::High.color_hex())
        .replace("{{SCORE_MEDIUM_COLOR}}", ScoreTier::Medium.color_hex())
        .replace("{{SCORE_LOW_COLOR}}", ScoreTier::Low.color_hex())
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML.as_str())
}

/// `POST /api/check-grammar`. A body that is not a JSON object with a string
/// `text` is answered the same way as a missing `text`.
pub async fn check_grammar<G: TextGenerator + 'static>(
    State(state): State<AppState<G>>,
    payload: std::result::Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<CheckResult>> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!("Rejected request body: {}", rejection.body_text());
            return Err(GrammateError::validation(TEXT_REQUIRED));
        }
    };

    let result = state.checker.check(request).await?;
    Ok(Json(result))
}
