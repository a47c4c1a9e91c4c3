//! Interactive console host.
//!
//! Reads commands from stdin, forwards them to a [`SessionHandle`] and
//! prints every [`GameEvent`] as an instruction line.

use anyhow::{Context, Result};
use derive_more::Display;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument, warn};
use wordclaim::{
    load_word_pool, spawn, EngineConfig, GameEvent, GameSession, HandleError, ScriptedSpeech,
    SessionHandle, SpeechCapability, Status, TranscriptSpeech, VerificationGateway,
};
use wordclaim_rules::Position;

use crate::cli::SpeechMode;

const HELP: &str = "\
Commands:
  start                 begin the game
  pick <row> <col>      select a cell (0-9 each)
  pick <index>          select a cell (0-99)
  say [text]            submit; text stands in for what was spoken
  reset                 back to the start screen
  shuffle               reshuffle the words (before or after a game)
  board                 show the board
  help                  show this help
  quit                  leave";

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Start the game.
    Start,
    /// Select a cell.
    Pick(Position),
    /// Submit, with the typed transcript if any.
    Say(Option<String>),
    /// Reset the session.
    Reset,
    /// Shuffle the pool.
    Shuffle,
    /// Print the board.
    Board,
    /// Print help.
    Help,
    /// Leave.
    Quit,
}

/// A console line that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    /// Unknown command word.
    #[display("Unknown command '{_0}' (try 'help')")]
    Unknown(String),
    /// `pick` arguments were missing or off the board.
    #[display("Usage: pick <row> <col> or pick <index>")]
    BadPick,
}

impl std::error::Error for ParseError {}

/// Parses one console line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, ParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "start" => ConsoleCommand::Start,
        "pick" => ConsoleCommand::Pick(parse_position(rest).ok_or(ParseError::BadPick)?),
        "say" => ConsoleCommand::Say((!rest.is_empty()).then(|| rest.to_string())),
        "reset" => ConsoleCommand::Reset,
        "shuffle" | "randomize" => ConsoleCommand::Shuffle,
        "board" => ConsoleCommand::Board,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_position(args: &str) -> Option<Position> {
    let numbers = args
        .split_whitespace()
        .map(str::parse::<usize>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    match numbers.as_slice() {
        [index] => Position::from_index(*index),
        [row, col] => Position::new(*row, *col),
        _ => None,
    }
}

/// Runs an interactive game until `quit` or end of input.
#[instrument(skip_all, fields(words = %words.display(), ?speech))]
pub async fn play(words: &Path, config_path: &Path, speech: SpeechMode) -> Result<()> {
    let config = if config_path.exists() {
        EngineConfig::from_file(config_path)?
    } else {
        debug!(path = %config_path.display(), "No config file, using defaults");
        EngineConfig::default()
    };

    let pool = load_word_pool(words)?;
    if !pool.is_playable() {
        warn!(words = pool.len(), "Word pool cannot fill a board; start will be refused");
    }

    let transcript = Arc::new(TranscriptSpeech::new());
    let capability: Arc<dyn SpeechCapability> = match speech {
        SpeechMode::Console => transcript.clone(),
        SpeechMode::Unsupported => Arc::new(ScriptedSpeech::unsupported()),
    };
    let gateway = VerificationGateway::new(capability, &config);
    let (handle, mut events, join) = spawn(GameSession::new(pool, &config), gateway);

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            print_event(&event);
        }
    });

    println!("{HELP}");
    println!("{}", GameEvent::Reset);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Board => print_board(&handle).await?,
            ConsoleCommand::Say(text) => {
                transcript.set(text).await;
                handle.submit().await?;
            }
            ConsoleCommand::Reset => {
                let status = handle.snapshot().await?.status;
                if matches!(status, Status::InProgress | Status::Starting { .. }) {
                    println!("A game is in progress. Reset? [y/N]");
                    let answer = lines.next_line().await.context("Failed to read stdin")?;
                    if !answer.is_some_and(|a| a.trim().eq_ignore_ascii_case("y")) {
                        continue;
                    }
                }
                handle.reset().await?;
            }
            ConsoleCommand::Start => report(handle.start().await)?,
            ConsoleCommand::Pick(pos) => report(handle.select(pos).await)?,
            ConsoleCommand::Shuffle => report(handle.randomize().await)?,
        }
    }

    info!("Leaving game");
    handle.shutdown();
    drop(handle);
    join.await.context("Session runner panicked")?;
    printer.await.context("Event printer panicked")?;
    Ok(())
}

/// Loads a pool and reports whether it can fill a board.
#[instrument(skip_all, fields(words = %words.display()))]
pub fn check(words: &Path) -> Result<()> {
    let pool = load_word_pool(words)?;
    if pool.is_playable() {
        println!("{} words: playable", pool.len());
        Ok(())
    } else {
        anyhow::bail!("{} words: need at least 100", pool.len())
    }
}

/// Prints refusals; only a stopped runner is fatal.
fn report(result: Result<(), HandleError>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(HandleError::Closed) => Err(HandleError::Closed.into()),
        Err(e) => {
            println!("{e}");
            Ok(())
        }
    }
}

async fn print_board(handle: &SessionHandle) -> Result<()> {
    let snapshot = handle.snapshot().await?;
    match &snapshot.board {
        Some(board) => print!("{}", board.display()),
        None => println!("No board: the word pool is too small"),
    }
    println!(
        "{} | {} to act | failed cells this turn: {}",
        snapshot.status, snapshot.current_player, snapshot.failed_cells_this_turn
    );
    Ok(())
}

fn print_event(event: &GameEvent) {
    match event {
        GameEvent::AttemptTick { .. } | GameEvent::CountdownTick { .. } => {
            println!("  {event}");
        }
        GameEvent::GameWon { line, .. } => {
            let cells = line
                .positions()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            println!("{event} {cells}");
        }
        _ => println!("{event}"),
    }
    let cues = event.cues();
    if !cues.is_empty() {
        debug!(?cues, "Cues");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pick_forms() {
        assert_eq!(
            parse_command("pick 3 4").unwrap(),
            Some(ConsoleCommand::Pick(Position::new(3, 4).unwrap()))
        );
        assert_eq!(
            parse_command("  PICK 42 ").unwrap(),
            Some(ConsoleCommand::Pick(Position::from_index(42).unwrap()))
        );
        assert_eq!(parse_command("pick 10 0"), Err(ParseError::BadPick));
        assert_eq!(parse_command("pick"), Err(ParseError::BadPick));
    }

    #[test]
    fn test_parse_say() {
        assert_eq!(
            parse_command("say 苹果").unwrap(),
            Some(ConsoleCommand::Say(Some("苹果".to_string())))
        );
        assert_eq!(parse_command("say").unwrap(), Some(ConsoleCommand::Say(None)));
    }

    #[test]
    fn test_parse_blank_and_unknown() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(
            parse_command("jump"),
            Err(ParseError::Unknown("jump".to_string()))
        );
    }
}
