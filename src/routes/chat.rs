use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use uuid::Uuid;

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    state::SharedState,
};

#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(%rejection, "rejected chat body");
        AppError::BadRequest("Invalid request body".to_string())
    })?;

    let prompt = request
        .validate(state.config.max_message_chars, &state.config.system_prompt)
        .inspect_err(|err| tracing::info!(%err, "chat request failed validation"))?;

    tracing::info!(chars = prompt.message.chars().count(), "forwarding chat message");

    let completion = state.upstream.complete(&prompt).await.map_err(|err| {
        tracing::error!(%err, endpoint = state.upstream.endpoint(), "upstream call failed");
        AppError::from(err)
    })?;

    tracing::info!(
        reply_chars = completion.text.chars().count(),
        has_reasoning = completion.reasoning.is_some(),
        "upstream reply relayed"
    );

    Ok(Json(ChatResponse::reply(completion.text, completion.reasoning)))
}
