//! Study Games - terminal front end.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use study_games::cli::{Cli, CliCommand};
use study_games::console::{self, HELP};
use study_games::{CourseFile, DriverOutput, Input, SessionDriver, Settings};
use study_games_engine::{FeedbackMode, GameMode, SessionController};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        CliCommand::Chapters { course } => list_chapters(course),
        CliCommand::Play {
            course,
            chapter,
            mode,
            settings,
            feedback,
            pairs,
            max_wrong,
            seed,
            quiet,
        } => {
            let mut settings = Settings::from_file(settings)?;
            if quiet {
                settings = settings.with_sound(false);
            }
            settings.apply_overrides(feedback, pairs, max_wrong);
            play(course, chapter, mode, settings, seed).await
        }
    }
}

/// Prints every selectable chapter of a course.
#[instrument]
fn list_chapters(course: std::path::PathBuf) -> Result<()> {
    let file = CourseFile::load(&course)?;
    for chapter in file.course().selectable() {
        println!("{:>6}  {}", chapter.chapter_id(), chapter.label());
    }
    Ok(())
}

/// Plays one chapter until the player quits.
#[instrument(skip(settings))]
async fn play(
    course: std::path::PathBuf,
    chapter_id: String,
    mode: GameMode,
    settings: Settings,
    seed: Option<u64>,
) -> Result<()> {
    let file = CourseFile::load(&course)?;
    let chapter = file.chapter(&chapter_id)?;

    let config = settings.session().clone();
    let mut session = match seed {
        Some(seed) => SessionController::with_seed(mode, config, seed),
        None => SessionController::new(mode, config),
    };
    let entries = session.load_chapter(chapter)?;
    info!(entries, chapter = %chapter.label(), "Ready to play");

    println!("{} - {}", mode, chapter.label());
    if mode == GameMode::FillBlank && session.feedback_mode() == FeedbackMode::OnSubmit {
        println!("feedback is shown on submit");
    }
    println!("{}", HELP);

    let (output_tx, mut output_rx) = mpsc::unbounded_channel();
    let (driver, input_tx) = SessionDriver::new(session, settings.tick_period(), output_tx);
    let driver_task = tokio::spawn(driver.run());

    input_tx.send(Input::Show)?;
    let reader_tx = input_tx.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    break;
                }
            };
            match console::parse_line(&line) {
                Ok(Some(Input::Quit)) => break,
                Ok(Some(input)) => {
                    if reader_tx.send(input).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(e) => println!("? {}", e),
            }
        }
        reader_tx.send(Input::Quit).ok();
    });

    let sound = *settings.sound_enabled();
    while let Some(output) = output_rx.recv().await {
        let redraw = matches!(output, DriverOutput::Status(_));
        if let Some(text) = console::render(&output, sound) {
            println!("{}", text);
        }
        if redraw {
            // The driver may already be gone after a quit.
            input_tx.send(Input::Show).ok();
        }
    }

    let session = driver_task.await??;
    info!(state = %session.state(), score = %session.score(), "Session closed");
    Ok(())
}
