//! Output formatting for CLI reports

use crate::{QTable, Result, pipeline::TrainingResult};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a rate in `[0, 1]` as a percentage
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print the headline numbers of a run
pub fn print_result(result: &TrainingResult) {
    print_kv("Games", &result.total_games.to_string());
    print_kv(
        "Wins",
        &format!("{} ({})", result.wins, format_rate(result.win_rate)),
    );
    print_kv(
        "Losses",
        &format!("{} ({})", result.losses, format_rate(result.loss_rate)),
    );
}

/// Print the greedy move for every counter count
pub fn print_policy(table: &QTable) -> Result<()> {
    for (state, action) in table.policy()?.into_iter().enumerate() {
        let sticks = state + 1;
        print_kv(&format!("{sticks} sticks"), &format!("remove {action}"));
    }
    Ok(())
}
