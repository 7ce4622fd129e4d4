//! Dry-run reporting

use colored::Colorize;

/// Format the actions a dry run skipped
pub fn describe_actions(actions: &[String]) -> Vec<String> {
    actions
        .iter()
        .enumerate()
        .map(|(i, action)| format!("{}. {}", i + 1, action))
        .collect()
}

/// Print the actions a dry run skipped as a numbered list
pub fn log_actions(actions: &[String]) {
    println!(
        "{}",
        "[DRY RUN] Would perform the following actions:"
            .cyan()
            .bold()
    );
    println!();

    for line in describe_actions(actions) {
        println!("  {}", line);
    }

    println!();
    println!("{}", "No changes were made (--dry-run mode)".yellow());
}
