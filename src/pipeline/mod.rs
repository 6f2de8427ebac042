//! Training and evaluation pipeline abstractions
//!
//! This module provides:
//! - The episode loop that drives a learner against an opponent
//! - Scripted opponents (random and optimal)
//! - Observers that record or narrate what happens during training

pub mod observers;
pub mod opponents;
pub mod training;

pub use observers::{
    GRAPH_SMOOTHING, JsonlObserver, MetricsObserver, MetricsSummary, Observation,
    ProgressObserver, SharedObserver, StepObservation, TranscriptObserver,
};
pub use opponents::{OptimalOpponent, RandomOpponent};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult, Transition};

pub use crate::ports::{Learner, Observer};
