//! Status endpoint
//!
//! Liveness plus a one-line summary of the current game, so a renderer can
//! poll this instead of fetching the whole snapshot.

use std::sync::Arc;

use axum::{extract::State, Json};
use falconhunter_core::{Color, GameState};
use serde::Serialize;

use crate::state::ServerState;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub state: GameState,
    pub turn: Color,
}

pub async fn status_handler(State(state): State<Arc<ServerState>>) -> Json<StatusResponse> {
    let game = state.read();
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        state: game.game_state(),
        turn: game.turn(),
    })
}
