//! Content Commands
//!
//! Sync, inspect and browse quiz content.

use std::sync::Arc;

use anyhow::Result;
use banda_core::content::{CallbackListener, SyncStatus};

use crate::config::CliConfig;
use crate::display;

/// Initializes content and prints the resulting status.
pub async fn sync(config: &CliConfig) -> Result<()> {
    let service = config.question_service()?;
    let status = service.initialize().await;

    report(&status);
    display::sync_status(&status);
    Ok(())
}

/// Runs a manual update.
///
/// Goes straight to the update check: an empty cache counts as outdated,
/// so a fresh install downloads here and reports it.
pub async fn update(config: &CliConfig) -> Result<()> {
    let service = config.question_service()?;

    if service.refresh_data().await {
        let version = service
            .sync_status()
            .await
            .map(|s| s.version)
            .unwrap_or_default();
        display::success(&format!("Content updated to v{}", version));
        return Ok(());
    }

    match service.sync_status().await {
        Some(status) if status.is_offline => {
            display::warning("Could not reach the content server, keeping local content");
        }
        _ => display::info("Content is already up to date"),
    }
    Ok(())
}

/// Shows the last recorded sync status without touching the network.
pub async fn status(config: &CliConfig) -> Result<()> {
    let cache = config.open_cache()?;

    match cache.get_sync_status().await.value() {
        Some(status) => display::sync_status(&status),
        None => {
            display::info("Content has never been synced");
            display::info("Run 'banda sync' to download it");
            return Ok(());
        }
    }

    let categories = cache.get_categories().await.value().map_or(0, |c| c.len());
    let quizzes = cache.get_quizzes().await.value().map_or(0, |q| q.len());
    println!("  Cached:    {} categories, {} quizzes", categories, quizzes);
    Ok(())
}

/// Prints questions, optionally restricted to one category.
pub async fn questions(config: &CliConfig, count: usize, category: Option<&str>) -> Result<()> {
    let service = config.question_service()?;

    let questions = match category {
        Some(category) => {
            let mut questions = service.get_questions_by_category(category).await;
            questions.truncate(count);
            questions
        }
        None => service.get_random_questions(count).await,
    };

    display::source(service.source().await);
    println!();

    if questions.is_empty() {
        display::warning("No questions found");
        return Ok(());
    }
    for (i, question) in questions.iter().enumerate() {
        display::question(question, i);
    }
    Ok(())
}

/// Lists the available categories.
pub async fn categories(config: &CliConfig) -> Result<()> {
    let service = config.question_service()?;

    for category in service.get_categories().await {
        println!("  {}", category);
    }
    Ok(())
}

/// Removes every cached record.
pub async fn clear(config: &CliConfig) -> Result<()> {
    let cache = config.open_cache()?;
    cache.clear_all().await?;

    display::success("Content cache cleared");
    Ok(())
}

/// Keeps the update schedule running and prints every status change.
pub async fn watch(config: &CliConfig) -> Result<()> {
    let service = config.question_service()?;
    let coordinator = Arc::clone(service.coordinator());

    coordinator.add_listener(Arc::new(CallbackListener::new(|status: &SyncStatus| {
        println!(
            "[{}] {} (next check {})",
            status.last_sync.format("%H:%M:%S"),
            status.summary(),
            status.next_sync.format("%Y-%m-%d %H:%M")
        );
    })));

    service.initialize().await;
    display::info("Watching for content updates, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    coordinator.dispose();
    println!();
    display::info("Stopped");
    Ok(())
}

fn report(status: &SyncStatus) {
    if status.is_offline {
        display::warning("Content server unreachable, using local content");
    } else {
        display::success(&format!("Content v{} is up to date", status.version));
    }
}
