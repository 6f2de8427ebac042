//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::training::Transition;
use crate::{
    Result,
    nim::{GameOutcome, Side},
    ports::{DisplaySink, Observer},
    q_learning::QTable,
};

/// Window used when smoothing the win-rate curve
pub const GRAPH_SMOOTHING: usize = 5;

/// One move within a recorded game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepObservation {
    /// Step number within game
    pub step_num: usize,
    pub side: Side,
    pub removed: u32,
    pub sticks_left: i64,
    /// Reward assigned, for agent moves that were learned from
    pub reward: Option<f64>,
}

/// Complete observation of a training game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Game number
    pub game_num: usize,
    pub initial_sticks: i64,
    /// Final outcome
    pub outcome: GameOutcome,
    /// Steps in the game
    pub steps: Vec<StepObservation>,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    losses: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            losses: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_games: usize) -> Result<()> {
        let pb = ProgressBar::new(total_games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games (W:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        self.wins = 0;
        self.losses = 0;
        Ok(())
    }

    fn on_game_end(&mut self, game_num: usize, outcome: GameOutcome) -> Result<()> {
        match outcome {
            GameOutcome::Win => self.wins += 1,
            GameOutcome::Loss => self.losses += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(game_num as u64 + 1);
            pb.set_message(format!("{} L:{}", self.wins, self.losses));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("{} L:{}", self.wins, self.losses));
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
///
/// Keeps the full win/loss history so the smoothed win-rate curve can be
/// computed after the run.
pub struct MetricsObserver {
    history: Vec<GameOutcome>,
    move_counts: Vec<usize>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            move_counts: Vec::new(),
        }
    }

    pub fn total_games(&self) -> usize {
        self.history.len()
    }

    pub fn wins(&self) -> usize {
        self.history
            .iter()
            .filter(|&&outcome| outcome == GameOutcome::Win)
            .count()
    }

    pub fn losses(&self) -> usize {
        self.total_games() - self.wins()
    }

    /// Get current win rate
    pub fn win_rate(&self) -> f64 {
        if self.history.is_empty() {
            0.0
        } else {
            self.wins() as f64 / self.total_games() as f64
        }
    }

    /// Get average game length in moves (both sides)
    pub fn avg_game_length(&self) -> f64 {
        if self.move_counts.is_empty() {
            0.0
        } else {
            self.move_counts.iter().sum::<usize>() as f64 / self.move_counts.len() as f64
        }
    }

    /// Trailing-window win rate, one point per game from `window` onwards.
    ///
    /// The point for game `x` averages games `x - window ..= x`.
    pub fn rolling_win_rate(&self, window: usize) -> Vec<(usize, f64)> {
        (window..self.history.len())
            .map(|x| {
                let slice = &self.history[x.saturating_sub(window)..=x];
                let wins = slice
                    .iter()
                    .filter(|&&outcome| outcome == GameOutcome::Win)
                    .count();
                (x, wins as f64 / slice.len() as f64)
            })
            .collect()
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_games: self.total_games(),
            wins: self.wins(),
            losses: self.losses(),
            win_rate: self.win_rate(),
            avg_game_length: self.avg_game_length(),
            rolling_win_rate: self.rolling_win_rate(GRAPH_SMOOTHING),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_games: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub avg_game_length: f64,
    /// `(game index, smoothed win rate)` points
    pub rolling_win_rate: Vec<(usize, f64)>,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_game_start(&mut self, _game_num: usize, _sticks: i64) -> Result<()> {
        self.move_counts.push(0);
        Ok(())
    }

    fn on_move(
        &mut self,
        _game_num: usize,
        _side: Side,
        _removed: u32,
        _sticks_left: i64,
    ) -> Result<()> {
        if let Some(last) = self.move_counts.last_mut() {
            *last += 1;
        }
        Ok(())
    }

    fn on_game_end(&mut self, _game_num: usize, outcome: GameOutcome) -> Result<()> {
        self.history.push(outcome);
        Ok(())
    }
}

/// Transcript observer - Narrates games to a display sink
///
/// Produces the move-by-move commentary of a verbose run and, optionally,
/// dumps the Q-table after every update.
pub struct TranscriptObserver<D: DisplaySink> {
    display: D,
    print_q_values: bool,
}

impl<D: DisplaySink> TranscriptObserver<D> {
    pub fn new(display: D) -> Self {
        Self {
            display,
            print_q_values: false,
        }
    }

    /// Also show the full Q-table after every learning step.
    pub fn with_q_values(mut self, print_q_values: bool) -> Self {
        self.print_q_values = print_q_values;
        self
    }
}

impl<D: DisplaySink> Observer for TranscriptObserver<D> {
    fn on_game_start(&mut self, _game_num: usize, sticks: i64) -> Result<()> {
        self.display
            .show(&format!("Starting game with sticks {sticks}"))?;
        self.display.show(&format!("Sticks left: {sticks}"))
    }

    fn on_move(
        &mut self,
        _game_num: usize,
        side: Side,
        removed: u32,
        sticks_left: i64,
    ) -> Result<()> {
        let mover = match side {
            Side::Agent => "Q",
            Side::Opponent => "Opponent",
        };
        self.display
            .show(&format!("{mover} chose to remove {removed}"))?;
        if sticks_left > 0 {
            self.display.show(&format!("Sticks left: {sticks_left}"))?;
        }
        Ok(())
    }

    fn on_learn(
        &mut self,
        _game_num: usize,
        _transition: &Transition,
        q_table: Option<&QTable>,
    ) -> Result<()> {
        if !self.print_q_values {
            return Ok(());
        }
        if let Some(table) = q_table {
            self.display.show(&table.to_string())?;
        }
        Ok(())
    }

    fn on_game_end(&mut self, _game_num: usize, outcome: GameOutcome) -> Result<()> {
        let verdict = match outcome {
            GameOutcome::Win => "Q-Learner won.",
            GameOutcome::Loss => "Opponent won.",
        };
        self.display.show(verdict)?;
        self.display.show("----------------------------")
    }
}

/// JSONL observer - Exports observations to JSON Lines format
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current: Option<Observation>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| crate::Error::Io {
            operation: format!("create observation file {}", path.display()),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            current: None,
        })
    }
}

impl Observer for JsonlObserver {
    fn on_game_start(&mut self, game_num: usize, sticks: i64) -> Result<()> {
        self.current = Some(Observation {
            game_num,
            initial_sticks: sticks,
            outcome: GameOutcome::Loss,
            steps: Vec::new(),
        });
        Ok(())
    }

    fn on_move(
        &mut self,
        _game_num: usize,
        side: Side,
        removed: u32,
        sticks_left: i64,
    ) -> Result<()> {
        if let Some(observation) = &mut self.current {
            observation.steps.push(StepObservation {
                step_num: observation.steps.len(),
                side,
                removed,
                sticks_left,
                reward: None,
            });
        }
        Ok(())
    }

    fn on_learn(
        &mut self,
        _game_num: usize,
        transition: &Transition,
        _q_table: Option<&QTable>,
    ) -> Result<()> {
        // Attach the reward to the agent's most recent move
        if let Some(step) = self
            .current
            .as_mut()
            .and_then(|observation| {
                observation
                    .steps
                    .iter_mut()
                    .rfind(|step| step.side == Side::Agent)
            })
        {
            step.reward = Some(transition.reward);
        }
        Ok(())
    }

    fn on_game_end(&mut self, _game_num: usize, outcome: GameOutcome) -> Result<()> {
        if let Some(mut observation) = self.current.take() {
            observation.outcome = outcome;

            // Write as JSONL (one JSON object per line)
            serde_json::to_writer(&mut self.writer, &observation)?;
            writeln!(&mut self.writer)?;
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Shared observer - lets the caller read an observer back after the
/// pipeline that owns it has finished
///
/// ```
/// use qnim::pipeline::{MetricsObserver, SharedObserver, TrainingConfig, TrainingPipeline};
///
/// let metrics = SharedObserver::new(MetricsObserver::new());
/// let pipeline = TrainingPipeline::new(TrainingConfig::default())
///     .with_observer(Box::new(metrics.clone()));
/// # drop(pipeline);
/// assert_eq!(metrics.lock().total_games(), 0);
/// ```
pub struct SharedObserver<O: Observer> {
    inner: Arc<Mutex<O>>,
}

impl<O: Observer> SharedObserver<O> {
    pub fn new(observer: O) -> Self {
        Self {
            inner: Arc::new(Mutex::new(observer)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, O> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<O: Observer> Clone for SharedObserver<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O: Observer> Observer for SharedObserver<O> {
    fn on_training_start(&mut self, total_games: usize) -> Result<()> {
        self.lock().on_training_start(total_games)
    }

    fn on_game_start(&mut self, game_num: usize, sticks: i64) -> Result<()> {
        self.lock().on_game_start(game_num, sticks)
    }

    fn on_move(
        &mut self,
        game_num: usize,
        side: Side,
        removed: u32,
        sticks_left: i64,
    ) -> Result<()> {
        self.lock().on_move(game_num, side, removed, sticks_left)
    }

    fn on_learn(
        &mut self,
        game_num: usize,
        transition: &Transition,
        q_table: Option<&QTable>,
    ) -> Result<()> {
        self.lock().on_learn(game_num, transition, q_table)
    }

    fn on_game_end(&mut self, game_num: usize, outcome: GameOutcome) -> Result<()> {
        self.lock().on_game_end(game_num, outcome)
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.lock().on_training_end()
    }
}
