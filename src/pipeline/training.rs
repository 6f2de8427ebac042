//! Training pipeline for the Q-learner
//!
//! One game goes: the agent moves, the opponent replies if anything is
//! left, and the agent learns from the transition. The side that takes
//! the last counter loses.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    app::{ExperimentConfig, GameConfig, RewardScheme},
    nim::{Game, GameOutcome, Side},
    ports::{Learner, Observer},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training games
    pub num_games: usize,

    /// Random seed
    pub seed: Option<u64>,

    /// Shape of the game being played
    pub game: GameConfig,

    /// Rewards handed to the agent
    pub rewards: RewardScheme,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_games: 100,
            seed: None,
            game: GameConfig::default(),
            rewards: RewardScheme::default(),
        }
    }
}

impl From<&ExperimentConfig> for TrainingConfig {
    fn from(config: &ExperimentConfig) -> Self {
        Self {
            num_games: config.games,
            seed: config.seed,
            game: config.game,
            rewards: config.rewards,
        }
    }
}

/// One learning step, as passed to [`Learner::learn`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: i64,
    pub action: u32,
    pub new_state: i64,
    pub reward: f64,
    pub is_over: bool,
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total games played
    pub total_games: usize,

    /// Games where the opponent took the last counter
    pub wins: usize,

    /// Games where the agent took the last counter
    pub losses: usize,

    /// Win rate
    pub win_rate: f64,

    /// Loss rate
    pub loss_rate: f64,
}

impl TrainingResult {
    /// Create a new training result
    pub fn new(total_games: usize, wins: usize, losses: usize) -> Self {
        let rate = |count: usize| {
            if total_games > 0 {
                count as f64 / total_games as f64
            } else {
                0.0
            }
        };

        Self {
            total_games,
            wins,
            losses,
            win_rate: rate(wins),
            loss_rate: rate(losses),
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Training pipeline for a single learner against an opponent
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run training with the given agent and opponent
    pub fn run(
        &mut self,
        agent: &mut dyn Learner,
        opponent: &mut dyn Learner,
    ) -> Result<TrainingResult> {
        self.seed_pair(agent, opponent)?;
        log::info!(
            "training {} against {} for {} games ({} sticks)",
            agent.name(),
            opponent.name(),
            self.config.num_games,
            self.config.game.initial_sticks
        );
        let result = self.play_series(agent, opponent, self.config.num_games, true)?;
        log::info!(
            "training finished: {} wins, {} losses ({:.1}% win rate)",
            result.wins,
            result.losses,
            result.win_rate * 100.0
        );
        Ok(result)
    }

    /// Play greedy games without updating the agent
    pub fn evaluate(
        &mut self,
        agent: &mut dyn Learner,
        opponent: &mut dyn Learner,
        games: usize,
    ) -> Result<TrainingResult> {
        log::info!(
            "evaluating {} against {} for {} games",
            agent.name(),
            opponent.name(),
            games
        );
        self.play_series(agent, opponent, games, false)
    }

    fn play_series(
        &mut self,
        agent: &mut dyn Learner,
        opponent: &mut dyn Learner,
        games: usize,
        learn: bool,
    ) -> Result<TrainingResult> {
        let mut game = Game::new(&self.config.game)?;
        let mut wins = 0;
        let mut losses = 0;

        // Notify observers of training start
        for observer in &mut self.observers {
            observer.on_training_start(games)?;
        }

        for game_num in 0..games {
            let outcome = self.play_game(game_num, &mut game, agent, opponent, learn)?;

            // Count from agent's perspective
            match outcome {
                GameOutcome::Win => wins += 1,
                GameOutcome::Loss => losses += 1,
            }

            // Notify observers of game end
            for observer in &mut self.observers {
                observer.on_game_end(game_num, outcome)?;
            }
        }

        // Notify observers of training end
        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(TrainingResult::new(games, wins, losses))
    }

    fn seed_pair(&self, agent: &mut dyn Learner, opponent: &mut dyn Learner) -> Result<()> {
        if let Some(seed) = self.config.seed {
            agent.set_rng_seed(seed)?;
            opponent.set_rng_seed(seed.wrapping_add(1))?;
        }
        Ok(())
    }

    fn notify_move(&mut self, game_num: usize, side: Side, removed: u32, game: &Game) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_move(game_num, side, removed, game.sticks())?;
        }
        Ok(())
    }

    fn play_game(
        &mut self,
        game_num: usize,
        game: &mut Game,
        agent: &mut dyn Learner,
        opponent: &mut dyn Learner,
        learn: bool,
    ) -> Result<GameOutcome> {
        game.reset();

        // Notify observers of game start
        for observer in &mut self.observers {
            observer.on_game_start(game_num, game.sticks())?;
        }

        let rewards = self.config.rewards;
        let mut state = game.state();

        let outcome = loop {
            let action = agent.select_move(state)?;
            game.remove(action);
            self.notify_move(game_num, Side::Agent, action, game)?;

            let (reward, finished) = if game.is_over() {
                (rewards.loss, Some(GameOutcome::for_last_mover(Side::Agent)))
            } else {
                let reply = opponent.select_move(game.state())?;
                game.remove(reply);
                self.notify_move(game_num, Side::Opponent, reply, game)?;

                if game.is_over() {
                    (rewards.win, Some(GameOutcome::for_last_mover(Side::Opponent)))
                } else {
                    (rewards.step, None)
                }
            };

            let new_state = game.state();
            if learn {
                let transition = Transition {
                    state,
                    action,
                    new_state,
                    reward,
                    is_over: game.is_over(),
                };
                agent.learn(state, action, new_state, reward, transition.is_over)?;
                for observer in &mut self.observers {
                    observer.on_learn(game_num, &transition, agent.value_table())?;
                }
            }
            state = new_state;

            if let Some(outcome) = finished {
                break outcome;
            }
        };

        log::debug!("game {game_num} finished: {outcome:?}");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        nim::ActionSpace,
        pipeline::opponents::{OptimalOpponent, RandomOpponent},
        q_learning::QLearner,
    };

    #[test]
    fn test_training_pipeline() {
        let config = TrainingConfig {
            num_games: 10,
            seed: Some(42),
            ..TrainingConfig::default()
        };

        let mut pipeline = TrainingPipeline::new(config);
        let mut agent = QLearner::default();
        let mut opponent = RandomOpponent::new("Opponent".to_string(), ActionSpace::default());

        let result = pipeline.run(&mut agent, &mut opponent).unwrap();

        assert_eq!(result.total_games, 10);
        assert_eq!(result.wins + result.losses, 10);
    }

    #[test]
    fn test_first_game_against_optimal_opponent() {
        // Untrained agent always removes 1; optimal replies keep it losing.
        let config = TrainingConfig {
            num_games: 1,
            ..TrainingConfig::default()
        };
        let mut pipeline = TrainingPipeline::new(config);
        let mut agent = QLearner::default();
        let mut opponent = OptimalOpponent::new("Optimal".to_string(), ActionSpace::default());

        let result = pipeline.run(&mut agent, &mut opponent).unwrap();
        assert_eq!(result.losses, 1);
        // 10 -> 9 (agent), 9 -> 8 (optimal takes 1 from a losing count),
        // 8 -> 7, 7 -> 5, 5 -> 4, 4 -> 1, 1 -> 0 (agent loses).
        assert_eq!(agent.value(0, 1).unwrap(), -1.0);
    }

    #[test]
    fn test_evaluate_does_not_learn() {
        let mut pipeline = TrainingPipeline::new(TrainingConfig::default());
        let mut agent = QLearner::default();
        let mut opponent = OptimalOpponent::new("Optimal".to_string(), ActionSpace::default());

        let result = pipeline.evaluate(&mut agent, &mut opponent, 5).unwrap();
        assert_eq!(result.total_games, 5);
        assert_eq!(agent, QLearner::default());
    }

    #[test]
    fn test_result_rates() {
        let result = TrainingResult::new(4, 3, 1);
        assert_eq!(result.win_rate, 0.75);
        assert_eq!(result.loss_rate, 0.25);

        let empty = TrainingResult::new(0, 0, 0);
        assert_eq!(empty.win_rate, 0.0);
    }

    #[test]
    fn test_result_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");

        let result = TrainingResult::new(3, 2, 1);
        result.save(&path).unwrap();

        let loaded = TrainingResult::load(&path).unwrap();
        assert_eq!(loaded, result);
        assert_eq!(loaded.wins, 2);
        assert!((loaded.loss_rate - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_load_missing_result_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            TrainingResult::load(dir.path().join("absent.json")),
            Err(crate::Error::Io { .. })
        ));
    }
}
