//! Deck options endpoints
//!
//! Bodies are read as raw bytes so the channel does not depend on the
//! request's content type.

use axum::{body::Bytes, extract::State, Json};

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// POST /_anki/deckConfigsForUpdate
pub async fn configs_for_update(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DeckConfigsForUpdate>> {
    let request: DeckConfigsForUpdateIn = serde_json::from_slice(&body)?;
    let snapshot = state.db.deck_configs_for_update(request.deck_id).await?;
    Ok(Json(snapshot))
}

/// POST /_anki/updateDeckConfigs
pub async fn update(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<UpdateDeckConfigsOut>> {
    let input: UpdateDeckConfigsIn = serde_json::from_slice(&body)?;
    let out = state.db.update_deck_configs(input).await?;
    Ok(Json(out))
}
