//! Train command - Train the Q-learner against a scripted opponent

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    adapters::LogDisplay,
    app::{ExperimentConfig, RewardScheme},
    cli::output::{print_kv, print_policy, print_result, print_section, print_subsection},
    nim::ActionSpace,
    pipeline::{
        JsonlObserver, Learner, MetricsObserver, MetricsSummary, OptimalOpponent,
        ProgressObserver, RandomOpponent, SharedObserver, TrainingConfig, TrainingPipeline,
        TrainingResult, TranscriptObserver,
    },
    q_learning::QLearner,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: TrainingResult,
    validation: Option<TrainingResult>,
    opponent: String,
    validation_opponent: String,
    avg_game_length: f64,
    rolling_win_rate: Vec<(usize, f64)>,
    metadata: SummaryMetadata,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    initial_sticks: u32,
    max_removable: u32,
    rewards: RewardScheme,
    seed: Option<u64>,
}

/// Opponent types available on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OpponentKind {
    /// Removes a uniformly random legal amount
    Random,
    /// Plays the misère strategy perfectly
    Optimal,
}

impl OpponentKind {
    pub fn label(&self) -> &'static str {
        match self {
            OpponentKind::Random => "random",
            OpponentKind::Optimal => "optimal",
        }
    }

    fn build(self, block: &str, action_space: &ActionSpace) -> Box<dyn Learner> {
        match self {
            OpponentKind::Random => Box::new(RandomOpponent::new(
                format!("Random-{block}"),
                action_space.clone(),
            )),
            OpponentKind::Optimal => Box::new(OptimalOpponent::new(
                format!("Optimal-{block}"),
                action_space.clone(),
            )),
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train the Q-learner", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Opponent to train against
    #[arg(long, short = 'o', value_enum, default_value = "random")]
    pub opponent: OpponentKind,

    /// Number of training games (default 100)
    #[arg(long, short = 'g')]
    pub games: Option<usize>,

    /// Counters at the start of each game (default 10)
    #[arg(long)]
    pub sticks: Option<u32>,

    /// Largest number of counters removable per turn (default 3)
    #[arg(long)]
    pub max_remove: Option<u32>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Reward schedule (e.g. win=0,loss=-1,step=0)
    #[arg(long)]
    pub reward: Option<String>,

    /// JSON experiment config; command-line flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of greedy games played after training, without learning
    #[arg(long)]
    pub validation_games: Option<usize>,

    /// Opponent for validation games (defaults to the training opponent)
    #[arg(long, value_enum)]
    pub validation_opponent: Option<OpponentKind>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for JSONL game observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Narrate every move through the log
    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    /// Show the Q-table after every learning step (implies --verbose)
    #[arg(long, default_value_t = false)]
    pub print_q_values: bool,

    /// Print the learned greedy move for every counter count
    #[arg(long, default_value_t = false)]
    pub show_policy: bool,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl TrainArgs {
    /// Whether the run wants move-by-move output in the log
    pub fn wants_transcript(&self) -> bool {
        self.verbose || self.print_q_values
    }

    /// Whether to draw the progress bar; it would fight the transcript
    /// for the terminal, so logging the moves turns it off
    pub fn shows_progress(&self) -> bool {
        !self.no_progress && !self.wants_transcript()
    }
}

/// Parse reward schedule from string (e.g., "win=0,loss=-1,step=0")
fn parse_reward_schedule(s: &str, base: RewardScheme) -> Result<RewardScheme> {
    let mut rewards = base;

    for part in s.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut iter = trimmed.splitn(2, '=');
        let key = iter
            .next()
            .ok_or_else(|| anyhow!("Invalid reward entry: '{trimmed}'"))?;
        let value_str = iter
            .next()
            .ok_or_else(|| anyhow!("Invalid reward entry '{trimmed}'. Expected key=value"))?;
        let value: f64 = value_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid numeric reward '{value_str}' in '{trimmed}'"))?;
        match key.trim().to_ascii_lowercase().as_str() {
            "win" => rewards.win = value,
            "loss" => rewards.loss = value,
            "step" => rewards.step = value,
            other => {
                return Err(anyhow!(
                    "Unknown reward key '{other}'. Expected win, loss, or step"
                ));
            }
        }
    }

    Ok(rewards)
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

/// Merge the config file (if any) with command-line overrides
fn resolve_experiment(args: &TrainArgs) -> Result<ExperimentConfig> {
    let mut experiment = match &args.config {
        Some(path) => ExperimentConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ExperimentConfig::default(),
    };

    if let Some(games) = args.games {
        experiment.games = games;
    }
    if let Some(sticks) = args.sticks {
        experiment.game.initial_sticks = sticks;
    }
    if let Some(max_remove) = args.max_remove {
        experiment.game.max_removable = max_remove;
    }
    if let Some(seed) = args.seed {
        experiment.seed = Some(seed);
    }
    if let Some(validation_games) = args.validation_games {
        experiment.validation_games = validation_games;
    }
    if let Some(reward) = &args.reward {
        experiment.rewards = parse_reward_schedule(reward, experiment.rewards)?;
    }

    experiment.game.validate()?;
    Ok(experiment)
}

fn write_summary(path: &Path, summary: &TrainingSummaryFile) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create summary file {}", path.display()))?;
    to_writer_pretty(file, summary).context("Failed to write training summary")?;
    Ok(())
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let experiment = resolve_experiment(&args)?;
    let action_space = experiment.game.action_space()?;
    let validation_opponent = args.validation_opponent.unwrap_or(args.opponent);

    let mut agent = QLearner::new(&experiment.game)?;
    let mut opponent = args.opponent.build("Training", &action_space);

    print_section("Q-Learner Training");
    print_kv("Opponent", args.opponent.label());
    print_kv("Games", &experiment.games.to_string());
    print_kv(
        "Sticks",
        &format!(
            "{} (remove 1-{})",
            experiment.game.initial_sticks, experiment.game.max_removable
        ),
    );
    if let Some(seed) = experiment.seed {
        print_kv("Seed", &seed.to_string());
    }

    let metrics = SharedObserver::new(MetricsObserver::new());
    let mut pipeline = TrainingPipeline::new(TrainingConfig::from(&experiment))
        .with_observer(Box::new(metrics.clone()));
    if args.shows_progress() {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if args.wants_transcript() {
        pipeline = pipeline.with_observer(Box::new(
            TranscriptObserver::new(LogDisplay::new()).with_q_values(args.print_q_values),
        ));
    }
    if let Some(path) = &args.observations {
        pipeline = pipeline.with_observer(Box::new(
            JsonlObserver::new(path)
                .with_context(|| format!("Failed to open observations {}", path.display()))?,
        ));
    }

    let training = pipeline.run(&mut agent, opponent.as_mut())?;
    let metrics_summary: MetricsSummary = metrics.lock().summary();

    print_subsection("Training Results");
    print_result(&training);
    print_kv(
        "Avg game length",
        &format!("{:.2} moves", metrics_summary.avg_game_length),
    );

    let validation = if experiment.validation_games > 0 {
        let mut validator = validation_opponent.build("Validation", &action_space);
        if let Some(seed) = experiment.seed {
            validator.set_rng_seed(seed.wrapping_add(2))?;
        }
        let mut validation_pipeline = TrainingPipeline::new(TrainingConfig::from(&experiment));
        if args.shows_progress() {
            validation_pipeline =
                validation_pipeline.with_observer(Box::new(ProgressObserver::new()));
        }
        let result = validation_pipeline.evaluate(
            &mut agent,
            validator.as_mut(),
            experiment.validation_games,
        )?;

        print_subsection(&format!(
            "Validation vs {} (no learning)",
            validation_opponent.label()
        ));
        print_result(&result);
        Some(result)
    } else {
        None
    };

    if args.show_policy {
        print_subsection("Learned Policy");
        print_policy(agent.q_table())?;
    }

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if path != *raw {
            log::info!("normalized summary path to {}", path.display());
        }
        let summary = TrainingSummaryFile {
            training,
            validation,
            opponent: args.opponent.label().to_string(),
            validation_opponent: validation_opponent.label().to_string(),
            avg_game_length: metrics_summary.avg_game_length,
            rolling_win_rate: metrics_summary.rolling_win_rate,
            metadata: SummaryMetadata {
                initial_sticks: experiment.game.initial_sticks,
                max_removable: experiment.game.max_removable,
                rewards: experiment.rewards,
                seed: experiment.seed,
            },
        };
        write_summary(&path, &summary)?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}
