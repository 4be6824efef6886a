//! Deck endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// GET /api/decks
pub async fn list(State(state): State<AppState>) -> Json<DeckListResponse> {
    let decks = state.db.get_all_decks().await;
    Json(DeckListResponse { decks })
}

/// POST /api/decks
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddDeckRequest>,
) -> Result<Json<Deck>> {
    let deck = state.db.add_deck(&request.name).await?;
    Ok(Json(deck))
}

/// PUT /api/decks/:id/name
pub async fn rename(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
    Json(request): Json<RenameDeckRequest>,
) -> Result<Json<Deck>> {
    let deck = state.db.rename_deck(deck_id, &request.name).await?;
    Ok(Json(deck))
}

/// POST /api/decks/reparent
pub async fn reparent(
    State(state): State<AppState>,
    Json(request): Json<ReparentDecksRequest>,
) -> Result<Json<OpChangesWithCount>> {
    let count = state
        .db
        .reparent_decks(&request.deck_ids, request.new_parent)
        .await?;
    Ok(Json(OpChangesWithCount { count }))
}

/// POST /api/decks/remove
pub async fn remove(
    State(state): State<AppState>,
    Json(request): Json<RemoveDecksRequest>,
) -> Result<Json<OpChangesWithCount>> {
    let count = state.db.remove_decks(&request.deck_ids).await?;
    Ok(Json(OpChangesWithCount { count }))
}

/// GET /api/decks/current
pub async fn current(State(state): State<AppState>) -> Result<Json<Deck>> {
    Ok(Json(state.db.current_deck().await?))
}

/// PUT /api/decks/current
pub async fn set_current(
    State(state): State<AppState>,
    Json(request): Json<SetCurrentDeckRequest>,
) -> Result<Json<Deck>> {
    let deck = state.db.set_current_deck(request.deck_id).await?;
    Ok(Json(deck))
}
