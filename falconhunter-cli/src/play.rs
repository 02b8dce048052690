//! Play command - interactive game on the terminal
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_game(), play_loop()
//! - Level 3: parse_command(), execute()
//! - Level 4: formatting utilities

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use falconhunter_core::{Color, Game, GameState, Setup};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Starting position JSON file (standard opening if omitted)
    #[arg(long, value_name = "FILE")]
    pub setup: Option<PathBuf>,

    /// Print the game as JSON after every command instead of a diagram
    #[arg(long)]
    pub json: bool,
}

const HELP: &str = "\
Commands:
  move <from> <to>     move a piece, e.g. `move e2 e4` (or just `e2 e4`)
  drop <piece> <sq>    drop a Falcon/Hunter: F, H (White) or f, h (Black)
  board                show the board
  state                show game state, turn and capture credit
  forfeit              resign for the side to move
  help                 show this help
  quit                 leave the game";

/// One parsed line of input
#[derive(Clone, Debug, PartialEq, Eq)]
enum Command {
    Move { from: String, to: String },
    Drop { piece: char, square: String },
    Board,
    State,
    Forfeit,
    Help,
    Quit,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs) -> Result<()> {
    let game = load_game(&args)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    play_loop(game, stdin.lock(), stdout.lock(), args.json)?;

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Build the starting game from the optional setup file
fn load_game(args: &PlayArgs) -> Result<Game> {
    let setup = match &args.setup {
        Some(path) => Setup::load(path)?,
        None => Setup::default(),
    };

    tracing::info!("Starting game from setup '{}'", setup.name);

    setup
        .to_game()
        .with_context(|| format!("Invalid setup '{}'", setup.name))
}

/// Read commands until `quit` or end of input; returns the final game
fn play_loop<R: BufRead, W: Write>(mut game: Game, input: R, mut output: W, json: bool) -> Result<Game> {
    writeln!(output, "{}", render(&game, json)?)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "error: {}", err)?;
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }

        let reply = execute(&mut game, &command, json)?;
        writeln!(output, "{}", reply)?;
    }

    Ok(game)
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn parse_command(line: &str) -> Result<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();

    let command = match words.as_slice() {
        ["move", from, to] => Command::Move { from: from.to_string(), to: to.to_string() },
        ["drop", piece, square] => {
            let mut chars = piece.chars();
            match (chars.next(), chars.next()) {
                (Some(piece), None) => Command::Drop { piece, square: square.to_string() },
                _ => anyhow::bail!("piece must be a single letter, got {:?}", piece),
            }
        }
        ["board"] => Command::Board,
        ["state"] => Command::State,
        ["forfeit"] => Command::Forfeit,
        ["help"] => Command::Help,
        ["quit"] | ["exit"] => Command::Quit,
        [from, to] if from.len() == 2 && to.len() == 2 => {
            Command::Move { from: from.to_string(), to: to.to_string() }
        }
        _ => anyhow::bail!("unknown command {:?} (try `help`)", line.trim()),
    };

    Ok(command)
}

/// Apply one command and produce the text to show
fn execute(game: &mut Game, command: &Command, json: bool) -> Result<String> {
    let reply = match command {
        Command::Move { from, to } => match game.try_move(from, to) {
            Ok(outcome) => {
                let mut reply = render(game, json)?;
                if let Some(captured) = outcome.captured {
                    reply.push_str(&format!("\ncaptured {} {}", captured.color, captured.kind.name()));
                }
                reply
            }
            Err(err) => format!("rejected: {}", err),
        },
        Command::Drop { piece, square } => match game.try_enter_fairy_piece(*piece, square) {
            Ok(_) => render(game, json)?,
            Err(err) => format!("rejected: {}", err),
        },
        Command::Forfeit => {
            let loser = game.turn();
            match game.try_forfeit(loser) {
                Ok(_) => render(game, json)?,
                Err(err) => format!("rejected: {}", err),
            }
        }
        Command::Board => render(game, json)?,
        Command::State => status_line(game),
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    };

    Ok(reply)
}

// ============================================================================
// LEVEL 4 - FORMATTING
// ============================================================================

fn render(game: &Game, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string(&game.snapshot())?);
    }
    Ok(format!("{}{}", game.board(), status_line(game)))
}

fn status_line(game: &Game) -> String {
    match game.game_state() {
        GameState::InProgress => format!(
            "{} to move | lost: White {}, Black {}",
            game.turn(),
            game.lost(Color::White),
            game.lost(Color::Black)
        ),
        state => format!("game over: {}", state),
    }
}

// ============================================================================
// TESTS
// ============================================================================
