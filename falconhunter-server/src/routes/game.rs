//! Game API endpoints
//!
//! Refused commands are not HTTP errors: they answer 200 with `ok: false`,
//! the reason, and the unchanged game.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use falconhunter_core::{Color, Game, RuleError, Setup, Snapshot};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::state::ServerState;

/// Outcome of a move, drop or forfeit
#[derive(Serialize)]
pub struct CommandResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub game: Snapshot,
}

impl CommandResponse {
    fn from_result<T>(result: Result<T, RuleError>, game: &Game) -> Self {
        Self {
            ok: result.is_ok(),
            error: result.err().map(|e| e.to_string()),
            game: game.snapshot(),
        }
    }
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
}

#[derive(Deserialize)]
pub struct FairyRequest {
    /// `F`, `H` (White) or `f`, `h` (Black)
    pub piece: char,
    pub square: String,
}

#[derive(Deserialize)]
pub struct ForfeitRequest {
    pub loser: Color,
}

/// Get the current game
pub async fn get_game(State(state): State<Arc<ServerState>>) -> Json<Snapshot> {
    Json(state.read().snapshot())
}

/// Start a new game, from the standard position or a posted setup
///
/// An empty body means the standard opening. A body that is not a valid
/// setup is refused with 400 and the current game is kept.
pub async fn new_game(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<Json<Snapshot>, (StatusCode, Json<Value>)> {
    let setup = parse_setup(&body).map_err(bad_request)?;
    let game = setup.to_game().map_err(bad_request)?;

    tracing::info!("New game: {}", setup.name);

    let mut current = state.write();
    *current = game;
    Ok(Json(current.snapshot()))
}

fn parse_setup(body: &[u8]) -> Result<Setup, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Setup::default());
    }
    serde_json::from_slice(body)
}

fn bad_request(err: impl std::fmt::Display) -> (StatusCode, Json<Value>) {
    tracing::debug!("Rejected new game: {}", err);
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": err.to_string() })),
    )
}

/// Move a piece
pub async fn make_move(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<MoveRequest>,
) -> Json<CommandResponse> {
    let mut game = state.write();
    let result = game.try_move(&req.from, &req.to);
    Json(CommandResponse::from_result(result, &game))
}

/// Drop a fairy piece
pub async fn enter_fairy_piece(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<FairyRequest>,
) -> Json<CommandResponse> {
    let mut game = state.write();
    let result = game.try_enter_fairy_piece(req.piece, &req.square);
    Json(CommandResponse::from_result(result, &game))
}

/// Force a loss, e.g. when an external clock runs out
pub async fn forfeit(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<ForfeitRequest>,
) -> Json<CommandResponse> {
    let mut game = state.write();
    let result = game.try_forfeit(req.loser);
    Json(CommandResponse::from_result(result, &game))
}
