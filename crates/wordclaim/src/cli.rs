//! Command-line interface for wordclaim.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Wordclaim - two-player spoken word-claiming board game
#[derive(Parser, Debug)]
#[command(name = "wordclaim")]
#[command(about = "Claim cells by saying their words; five in a line wins", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play an interactive game on the console
    Play {
        /// Word pool file (JSON or one word per line)
        #[arg(short, long)]
        words: PathBuf,

        /// Engine config file; defaults apply when it does not exist
        #[arg(short, long, default_value = "wordclaim.toml")]
        config: PathBuf,

        /// How utterances are captured
        #[arg(long, value_enum, default_value_t = SpeechMode::Console)]
        speech: SpeechMode,
    },

    /// Load a word pool and report whether it can fill a board
    Check {
        /// Word pool file (JSON or one word per line)
        #[arg(short, long)]
        words: PathBuf,
    },
}

/// Speech capability used by the console host.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechMode {
    /// Typed text after `say` stands in for the transcription
    Console,
    /// No speech capability; every submit is reported unsupported
    Unsupported,
}
