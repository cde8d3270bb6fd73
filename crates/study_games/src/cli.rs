//! Command-line interface for study_games.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use study_games_engine::{FeedbackMode, GameMode};

/// Study Games - fill-in-the-blank, hangman and matching cards in the terminal
#[derive(Parser, Debug)]
#[command(name = "study_games")]
#[command(about = "Study games over a course's term/definition pairs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// List the chapters of a course
    Chapters {
        /// Course JSON file
        #[arg(short, long)]
        course: PathBuf,
    },

    /// Play one chapter
    Play {
        /// Course JSON file
        #[arg(short, long)]
        course: PathBuf,

        /// Chapter id
        #[arg(long)]
        chapter: String,

        /// Game to play (fill-blank, hangman, matching)
        #[arg(short, long, default_value = "fill-blank")]
        mode: GameMode,

        /// Settings file
        #[arg(long, default_value = "study_games.toml")]
        settings: PathBuf,

        /// Feedback mode (immediate, on-submit)
        #[arg(long)]
        feedback: Option<FeedbackMode>,

        /// Number of card pairs (matching)
        #[arg(long)]
        pairs: Option<usize>,

        /// Wrong guesses allowed (hangman)
        #[arg(long)]
        max_wrong: Option<u32>,

        /// Seed for reproducible shuffles
        #[arg(long)]
        seed: Option<u64>,

        /// Never ring the bell
        #[arg(short, long)]
        quiet: bool,
    },
}
