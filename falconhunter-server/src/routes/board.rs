//! Square lookup endpoint

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use falconhunter_core::{Color, Occupant, PieceKind, Square};
use serde::Serialize;
use serde_json::{json, Value};

use crate::state::ServerState;

#[derive(Serialize)]
pub struct SquareInfo {
    pub square: Square,
    pub code: char,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<PieceKind>,
}

/// Get the occupant of one square
pub async fn get_square(
    State(state): State<Arc<ServerState>>,
    Path(token): Path<String>,
) -> Result<Json<SquareInfo>, (StatusCode, Json<Value>)> {
    let square = Square::parse(&token).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        )
    })?;

    let game = state.read();
    let occupant = game.board().get(square).copied().unwrap_or(Occupant::Empty);

    Ok(Json(SquareInfo {
        square,
        code: occupant.code(),
        color: occupant.color(),
        kind: occupant.piece().map(|p| p.kind),
    }))
}
