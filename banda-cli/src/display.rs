//! Display Helpers
//!
//! Terminal output formatting and styling.

use banda_core::content::{Question, QuestionSource, SyncStatus};
use console::style;

/// Prints a success message.
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Prints an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Prints a warning message.
pub fn warning(msg: &str) {
    println!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Prints an info message.
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Displays a sync status block.
pub fn sync_status(status: &SyncStatus) {
    let state = if status.is_offline {
        style("offline").yellow()
    } else {
        style("online").green()
    };

    println!("  Version:   {}", style(&status.version).bold());
    println!("  State:     {}", state);
    println!(
        "  Last sync: {}",
        status.last_sync.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  Next sync: {}",
        status.next_sync.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

/// Describes where questions are served from.
pub fn source(source: QuestionSource) {
    match source {
        QuestionSource::Synced => info("Serving synced content"),
        QuestionSource::Bundled => info("Serving bundled questions (no synced content)"),
    }
}

/// Displays a question with its options, marking the correct one.
pub fn question(question: &Question, index: usize) {
    println!(
        "{} {} {}",
        style(format!("{}.", index + 1)).bold(),
        question.prompt,
        style(format!("[{}]", question.category)).dim()
    );

    for (i, option) in question.options.iter().enumerate() {
        let letter = (b'a' + (i % 26) as u8) as char;
        if i == question.correct_answer_index {
            println!("   {} {}", style(format!("{})", letter)).green(), style(&option.text).green());
        } else {
            println!("   {}) {}", letter, option.text);
        }
    }

    if !question.explanation.is_empty() {
        println!("   {}", style(&question.explanation).dim());
    }
    println!();
}
