//! CLI infrastructure for the qnim trainer
//!
//! This module provides the command-line interface for training and
//! inspecting the Q-learner.

pub mod commands;
pub mod output;
