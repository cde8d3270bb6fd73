//! Drives one session from a single input channel.
//!
//! Commands, render requests and clock ticks all arrive on the same
//! channel, so they are processed strictly in arrival order and each runs
//! to completion before the next. While the engine clock runs, a ticker
//! task feeds `Tick`s into that channel; it is aborted as soon as the clock
//! stops.

use std::time::Duration;
use study_games_engine::{
    ClockToken, Command, CommandStatus, EngineError, SessionController, SessionEvent,
    SessionSnapshot,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::{debug, info, instrument, warn};

/// Something for the driver to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Run a session command.
    Command(Command),
    /// Send a snapshot of the session.
    Show,
    /// One clock period elapsed.
    Tick(ClockToken),
    /// Stop driving.
    Quit,
}

/// What the driver reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverOutput {
    /// An engine event, in the order it was queued.
    Event(SessionEvent),
    /// The result of a command.
    Status(CommandStatus),
    /// A command was refused.
    Error(EngineError),
    /// A requested snapshot.
    Snapshot(Box<SessionSnapshot>),
}

/// Owns a session and feeds it inputs one at a time.
pub struct SessionDriver {
    session: SessionController,
    tick_period: Duration,
    input_rx: mpsc::UnboundedReceiver<Input>,
    ticker_tx: mpsc::WeakUnboundedSender<Input>,
    output_tx: mpsc::UnboundedSender<DriverOutput>,
    ticker: Option<(ClockToken, JoinHandle<()>)>,
}

impl SessionDriver {
    /// Creates a driver and the sender its inputs go to.
    ///
    /// The driver stops when [`Input::Quit`] arrives or every sender is
    /// dropped.
    pub fn new(
        session: SessionController,
        tick_period: Duration,
        output_tx: mpsc::UnboundedSender<DriverOutput>,
    ) -> (Self, mpsc::UnboundedSender<Input>) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let driver = Self {
            session,
            tick_period,
            input_rx,
            ticker_tx: input_tx.downgrade(),
            output_tx,
            ticker: None,
        };
        (driver, input_tx)
    }

    /// Processes inputs until told to quit. Returns the session.
    #[instrument(skip(self), fields(mode = %self.session.mode()))]
    pub async fn run(mut self) -> anyhow::Result<SessionController> {
        info!("Session driver started");
        self.flush()?;

        while let Some(input) = self.input_rx.recv().await {
            match input {
                Input::Quit => {
                    debug!("Quit requested");
                    break;
                }
                Input::Show => {
                    let snapshot = Box::new(self.session.snapshot());
                    self.output_tx.send(DriverOutput::Snapshot(snapshot))?;
                }
                Input::Tick(token) => {
                    self.session.tick(token);
                }
                Input::Command(command) => {
                    debug!(command = command.name(), "Executing command");
                    match self.session.execute(command) {
                        Ok(status) => self.output_tx.send(DriverOutput::Status(status))?,
                        Err(e) => {
                            warn!(command = command.name(), error = %e, "Command refused");
                            self.output_tx.send(DriverOutput::Error(e))?;
                        }
                    }
                }
            }
            self.flush()?;
            self.sync_ticker();
        }

        self.stop_ticker();
        info!(state = %self.session.state(), "Session driver stopped");
        Ok(self.session)
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        for event in self.session.drain_events() {
            self.output_tx.send(DriverOutput::Event(event))?;
        }
        Ok(())
    }

    /// Keeps exactly one ticker alive for the running clock, or none.
    fn sync_ticker(&mut self) {
        let token = self.session.clock_token();
        if self.ticker.as_ref().map(|(t, _)| *t) == token {
            return;
        }
        self.stop_ticker();
        if let Some(token) = token {
            let handle = self.spawn_ticker(token);
            self.ticker = Some((token, handle));
        }
    }

    fn stop_ticker(&mut self) {
        if let Some((token, handle)) = self.ticker.take() {
            debug!(?token, "Stopping ticker");
            handle.abort();
        }
    }

    fn spawn_ticker(&self, token: ClockToken) -> JoinHandle<()> {
        debug!(?token, period_ms = self.tick_period.as_millis() as u64, "Starting ticker");
        let ticker_tx = self.ticker_tx.clone();
        let period = self.tick_period;
        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                let Some(tx) = ticker_tx.upgrade() else {
                    break;
                };
                if tx.send(Input::Tick(token)).is_err() {
                    break;
                }
            }
        })
    }
}
