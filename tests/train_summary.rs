use clap::Parser;
use qnim::{
    ExperimentConfig, GameConfig,
    cli::commands::train::{TrainArgs, execute},
    pipeline::TrainingResult,
};
use tempfile::tempdir;

fn parse_args<I, T>(args: I) -> TrainArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    TrainArgs::parse_from(args)
}

#[test]
fn summary_without_extension_appends_json() {
    let tmp = tempdir().unwrap();
    let summary_stem = tmp.path().join("run_overview");

    let args = parse_args([
        "qnim-train",
        "--games",
        "12",
        "--opponent",
        "random",
        "--seed",
        "3",
        "--summary",
        summary_stem.to_str().unwrap(),
        "--no-progress",
    ]);

    execute(args).expect("training with summary should succeed");

    let expected_path = summary_stem.with_extension("json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["total_games"], 12);
    let training: TrainingResult = serde_json::from_value(parsed["training"].clone()).unwrap();
    assert_eq!(training.wins + training.losses, 12);
    assert_eq!(parsed["opponent"], "random");
    assert_eq!(parsed["metadata"]["initial_sticks"], 10);
    assert_eq!(parsed["rolling_win_rate"].as_array().unwrap().len(), 12 - 5);
    assert!(parsed["validation"].is_null());
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let summary_dir = tmp.path().join("summaries");
    let summary_arg = format!("{}/", summary_dir.display());

    let args = parse_args([
        "qnim-train",
        "--games",
        "3",
        "--summary",
        &summary_arg,
        "--no-progress",
    ]);

    execute(args).expect("training with directory summary should succeed");

    let expected_path = summary_dir.join("training_summary.json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["total_games"], 3);
}

#[test]
fn validation_games_are_reported() {
    let tmp = tempdir().unwrap();
    let summary = tmp.path().join("validated.json");

    let args = parse_args([
        "qnim-train",
        "--games",
        "20",
        "--validation-games",
        "4",
        "--validation-opponent",
        "optimal",
        "--summary",
        summary.to_str().unwrap(),
        "--no-progress",
    ]);

    execute(args).expect("training with validation should succeed");

    let contents = std::fs::read_to_string(&summary).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["validation"]["total_games"], 4);
    assert_eq!(parsed["validation_opponent"], "optimal");
}

#[test]
fn config_file_values_are_used_and_flags_override() {
    let tmp = tempdir().unwrap();
    let config_path = tmp.path().join("experiment.json");
    let summary = tmp.path().join("from_config.json");

    let config = ExperimentConfig {
        game: GameConfig::new().with_initial_sticks(15).with_max_removable(4),
        games: 8,
        seed: Some(21),
        ..ExperimentConfig::default()
    };
    config.save(&config_path).unwrap();

    let args = parse_args([
        "qnim-train",
        "--config",
        config_path.to_str().unwrap(),
        "--games",
        "6",
        "--reward",
        "loss=-2",
        "--summary",
        summary.to_str().unwrap(),
        "--no-progress",
    ]);

    execute(args).expect("training from config should succeed");

    let contents = std::fs::read_to_string(&summary).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["total_games"], 6);
    assert_eq!(parsed["metadata"]["initial_sticks"], 15);
    assert_eq!(parsed["metadata"]["max_removable"], 4);
    assert_eq!(parsed["metadata"]["seed"], 21);
    assert_eq!(parsed["metadata"]["rewards"]["loss"], -2.0);
}

#[test]
fn missing_config_file_is_an_error() {
    let tmp = tempdir().unwrap();
    let args = parse_args([
        "qnim-train",
        "--config",
        tmp.path().join("absent.json").to_str().unwrap(),
        "--no-progress",
    ]);
    assert!(execute(args).is_err());
}

#[test]
fn flags_override_invalid_config_values() {
    let tmp = tempdir().unwrap();
    let config_path = tmp.path().join("broken.json");
    std::fs::write(&config_path, r#"{ "game": { "max_removable": 0 } }"#).unwrap();
    let summary = tmp.path().join("fixed.json");

    let args = parse_args([
        "qnim-train",
        "--config",
        config_path.to_str().unwrap(),
        "--max-remove",
        "3",
        "--games",
        "2",
        "--summary",
        summary.to_str().unwrap(),
        "--no-progress",
    ]);

    execute(args).expect("command-line value should replace the bad config value");

    let contents = std::fs::read_to_string(&summary).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["metadata"]["max_removable"], 3);
}

#[test]
fn invalid_config_without_override_is_rejected() {
    let tmp = tempdir().unwrap();
    let config_path = tmp.path().join("broken.json");
    std::fs::write(&config_path, r#"{ "game": { "max_removable": 0 } }"#).unwrap();

    let args = parse_args([
        "qnim-train",
        "--config",
        config_path.to_str().unwrap(),
        "--no-progress",
    ]);
    assert!(execute(args).is_err());
}

#[test]
fn reporting_flags_run_together() {
    let tmp = tempdir().unwrap();
    let observations = tmp.path().join("games.jsonl");

    let args = parse_args([
        "qnim-train",
        "--games",
        "7",
        "--seed",
        "4",
        "--observations",
        observations.to_str().unwrap(),
        "--show-policy",
        "--verbose",
        "--print-q-values",
    ]);

    execute(args).expect("training with every reporting flag should succeed");

    let contents = std::fs::read_to_string(&observations).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 7);
    for line in lines {
        let game: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(!game["steps"].as_array().unwrap().is_empty());
    }
}
