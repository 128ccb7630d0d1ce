// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync Coordinator - orchestrates content updates
//!
//! The coordinator owns the update state machine:
//!
//! ```text
//! Uninitialized → Bootstrapping → Idle
//! Idle → CheckingForUpdate → Downloading → Idle (synced | offline)
//! ```
//!
//! It decides whether the remote content changed, downloads config,
//! categories and quizzes together, commits them to the local cache as one
//! update, re-checks on a timer and pushes every recorded `SyncStatus` to
//! the registered listeners. Sync operations never overlap: initialization,
//! scheduled checks and manual updates all go through one in-flight guard.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::cache::{CacheError, LocalCache};
use super::config::ContentConfig;
use super::events::{ListenerId, ListenerRegistry, SyncListener};
use super::fetcher::{ContentFetcher, FetchError};
use super::types::{AppConfig, SyncStatus, UNKNOWN_VERSION};

/// Where the coordinator currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// `initialize` has not run yet
    Uninitialized,
    /// First sync after startup in progress
    Bootstrapping,
    /// Comparing the remote config with the cached one
    CheckingForUpdate,
    /// Fetching and committing new content
    Downloading,
    /// Waiting for the next scheduled or manual check
    Idle {
        /// Whether the last attempt could not reach the remote
        offline: bool,
    },
    /// Timer and listeners released
    Disposed,
}

/// Result of comparing the remote config with the cached one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateDecision {
    /// Remote config could not be fetched; keep local content
    Unreachable,
    /// Cached content matches the remote version
    UpToDate,
    /// Remote content is newer, or nothing is cached yet
    Outdated,
}

/// Whether `remote` should replace `local`.
///
/// Either a different version string or a newer edit time triggers an
/// update on its own.
pub fn needs_update(local: &AppConfig, remote: &AppConfig) -> bool {
    remote.version != local.version || remote.last_updated_at > local.last_updated_at
}

/// Orchestrates version checks, downloads and the update schedule
pub struct SyncCoordinator {
    cache: Arc<LocalCache>,
    fetcher: Arc<dyn ContentFetcher>,
    default_interval: Duration,
    listeners: ListenerRegistry,
    phase: Mutex<SyncPhase>,
    timer: Mutex<Option<JoinHandle<()>>>,
    in_flight: tokio::sync::Mutex<()>,
}

struct CheckOutcome {
    updated: bool,
    status: SyncStatus,
}

impl SyncCoordinator {
    /// Create a coordinator.
    ///
    /// Returned in an `Arc` because the update timer holds a weak handle
    /// back to it.
    pub fn new(
        cache: Arc<LocalCache>,
        fetcher: Arc<dyn ContentFetcher>,
        config: &ContentConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            cache,
            fetcher,
            default_interval: config.default_update_interval,
            listeners: ListenerRegistry::new(),
            phase: Mutex::new(SyncPhase::Uninitialized),
            timer: Mutex::new(None),
            in_flight: tokio::sync::Mutex::new(()),
        })
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SyncPhase {
        self.phase
            .lock()
            .map(|p| *p)
            .unwrap_or(SyncPhase::Idle { offline: true })
    }

    /// Bring the cache up to date and start the update schedule.
    ///
    /// Downloads everything when nothing is cached, otherwise runs a normal
    /// update check. Never fails: any error ends in an offline status with
    /// version `"unknown"`, which is recorded, pushed to listeners and
    /// returned. The timer is armed on every path.
    pub async fn initialize(self: &Arc<Self>) -> SyncStatus {
        let status = {
            let _guard = self.in_flight.lock().await;
            self.set_phase(SyncPhase::Bootstrapping);

            match self.bootstrap().await {
                Ok(status) => status,
                Err(e) => {
                    error!("Error initializing content sync: {}", e);
                    let status =
                        SyncStatus::offline(UNKNOWN_VERSION, Utc::now(), self.default_interval);
                    if let Err(e) = self.record_status(&status).await {
                        error!("Error saving offline sync status: {}", e);
                    }
                    status
                }
            }
        };

        self.setup_auto_update().await;
        self.set_phase(SyncPhase::Idle {
            offline: status.is_offline,
        });
        status
    }

    async fn bootstrap(&self) -> Result<SyncStatus, SyncError> {
        if !self.cache.has_cached_data().await {
            info!("No cached content, downloading from remote");
            return self
                .download_all_locked()
                .await?
                .ok_or_else(|| SyncError::Unavailable("initial download failed".to_string()));
        }

        info!("Cached content found, checking for updates");
        Ok(self.run_check().await?.status)
    }

    /// Compare remote and cached config without downloading anything
    pub async fn check_for_update(&self) -> UpdateDecision {
        let (remote, local) = tokio::join!(self.fetcher.fetch_config(), self.cache.get_config());

        let remote = match remote {
            Ok(config) => config,
            Err(e) => {
                warn!("Could not fetch remote config: {}", e);
                return UpdateDecision::Unreachable;
            }
        };

        let Some(local) = local.value() else {
            info!("No local config found, need to download");
            return UpdateDecision::Outdated;
        };

        if needs_update(&local, &remote) {
            info!(
                "Update needed: remote v{} vs local v{}",
                remote.version, local.version
            );
            UpdateDecision::Outdated
        } else {
            UpdateDecision::UpToDate
        }
    }

    /// Whether a download should happen now
    pub async fn should_update(&self) -> bool {
        self.check_for_update().await == UpdateDecision::Outdated
    }

    /// Run the update check and download new content if needed.
    ///
    /// Returns whether new content was committed. Cache write failures are
    /// returned as errors and leave the previous content in place.
    pub async fn check_and_update(&self) -> Result<bool, SyncError> {
        let _guard = self.in_flight.lock().await;
        let result = self.run_check().await;
        self.settle(&result);
        result.map(|outcome| outcome.updated)
    }

    /// User-triggered update; errors are logged and reported as `false`
    pub async fn manual_update(&self) -> bool {
        info!("Manual update triggered");
        match self.check_and_update().await {
            Ok(updated) => updated,
            Err(e) => {
                warn!("Manual update failed: {}", e);
                false
            }
        }
    }

    /// Fetch all three documents and commit them, skipping the version check.
    ///
    /// Returns `Ok(false)` without writing anything if any document is
    /// unavailable.
    pub async fn download_all(&self) -> Result<bool, SyncError> {
        let _guard = self.in_flight.lock().await;
        let result = self.download_all_locked().await;
        match &result {
            Ok(Some(_)) => self.set_phase(SyncPhase::Idle { offline: false }),
            Ok(None) | Err(_) => self.set_phase(SyncPhase::Idle { offline: true }),
        }
        result.map(|status| status.is_some())
    }

    async fn run_check(&self) -> Result<CheckOutcome, SyncError> {
        self.set_phase(SyncPhase::CheckingForUpdate);

        match self.check_for_update().await {
            UpdateDecision::Outdated => {
                if let Some(status) = self.download_all_locked().await? {
                    info!("Content updated successfully");
                    return Ok(CheckOutcome {
                        updated: true,
                        status,
                    });
                }
                let status = self.offline_status().await;
                self.record_status(&status).await?;
                Ok(CheckOutcome {
                    updated: false,
                    status,
                })
            }
            UpdateDecision::UpToDate => {
                debug!("No update needed");
                let status = self.confirmed_status().await;
                self.record_status(&status).await?;
                Ok(CheckOutcome {
                    updated: false,
                    status,
                })
            }
            UpdateDecision::Unreachable => {
                let status = self.offline_status().await;
                self.record_status(&status).await?;
                Ok(CheckOutcome {
                    updated: false,
                    status,
                })
            }
        }
    }

    async fn download_all_locked(&self) -> Result<Option<SyncStatus>, SyncError> {
        self.set_phase(SyncPhase::Downloading);
        debug!("Downloading content from remote");

        let (config, categories, quizzes) = tokio::join!(
            self.fetcher.fetch_config(),
            self.fetcher.fetch_categories(),
            self.fetcher.fetch_quizzes(),
        );

        let (config, categories, quizzes) = match (config, categories, quizzes) {
            (Ok(config), Ok(categories), Ok(quizzes)) => (config, categories, quizzes),
            (config, categories, quizzes) => {
                log_fetch_failure("config", config.err());
                log_fetch_failure("categories", categories.err());
                log_fetch_failure("quizzes", quizzes.err());
                error!("Failed to download content, keeping cached copy");
                return Ok(None);
            }
        };

        let status = SyncStatus::online(&config.version, Utc::now(), config.update_interval());
        self.cache
            .save_content(&config, &categories, &quizzes, &status)
            .await?;
        self.listeners.notify(&status);

        info!(
            "Downloaded content v{}: {} categories, {} quizzes",
            config.version,
            categories.len(),
            quizzes.len()
        );
        Ok(Some(status))
    }

    /// Status when the remote could not deliver; keeps the cached version
    async fn offline_status(&self) -> SyncStatus {
        let version = self
            .cache
            .get_config()
            .await
            .value()
            .map(|config| config.version)
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string());
        let last_sync = self.last_sync_or_now().await;
        SyncStatus::offline(version, last_sync, self.cached_interval().await)
    }

    /// Status when the remote confirmed the cached content is current
    async fn confirmed_status(&self) -> SyncStatus {
        let version = self
            .cache
            .get_config()
            .await
            .value()
            .map(|config| config.version)
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string());
        let last_sync = self.last_sync_or_now().await;
        SyncStatus::online(version, last_sync, self.cached_interval().await)
    }

    async fn last_sync_or_now(&self) -> DateTime<Utc> {
        self.cache
            .get_last_sync()
            .await
            .unwrap_or_else(Utc::now)
    }

    async fn cached_interval(&self) -> Duration {
        self.cache
            .get_config()
            .await
            .value()
            .map(|config| config.update_interval())
            .unwrap_or(self.default_interval)
    }

    async fn record_status(&self, status: &SyncStatus) -> Result<(), SyncError> {
        self.cache.save_sync_status(status).await?;
        self.listeners.notify(status);
        Ok(())
    }

    /// (Re)arm the periodic update check.
    ///
    /// The period comes from the cached config, or the configured default
    /// when nothing is cached. Any previously armed timer is cancelled.
    pub async fn setup_auto_update(self: &Arc<Self>) -> Duration {
        let period = self.cached_interval().await.max(Duration::from_secs(1));
        if self.phase() == SyncPhase::Disposed {
            return period;
        }

        let handle = tokio::spawn(run_schedule(Arc::downgrade(self), period));
        match self.timer.lock() {
            Ok(mut slot) => {
                if let Some(previous) = slot.replace(handle) {
                    previous.abort();
                }
            }
            Err(_) => handle.abort(),
        }

        info!("Auto-update scheduled every {:?}", period);
        period
    }

    /// Whether an update timer is currently armed
    pub fn is_scheduled(&self) -> bool {
        self.timer
            .lock()
            .map(|slot| slot.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Register a status listener
    pub fn add_listener(&self, listener: Arc<dyn SyncListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    /// Unregister a status listener
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Last recorded sync status
    pub async fn sync_status(&self) -> Option<SyncStatus> {
        self.cache.get_sync_status().await.value()
    }

    /// Access to the cache the coordinator writes to
    pub fn cache(&self) -> &Arc<LocalCache> {
        &self.cache
    }

    /// Stop the timer and drop all listeners.
    ///
    /// A sync already in flight is left to finish on its own.
    pub fn dispose(&self) {
        self.cancel_timer();
        self.listeners.clear();
        self.set_phase(SyncPhase::Disposed);
    }

    fn cancel_timer(&self) {
        if let Ok(mut slot) = self.timer.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }

    fn settle(&self, result: &Result<CheckOutcome, SyncError>) {
        let offline = match result {
            Ok(outcome) => outcome.status.is_offline,
            Err(_) => true,
        };
        self.set_phase(SyncPhase::Idle { offline });
    }

    fn set_phase(&self, next: SyncPhase) {
        if let Ok(mut phase) = self.phase.lock() {
            if *phase != SyncPhase::Disposed {
                *phase = next;
            }
        }
    }
}

impl Drop for SyncCoordinator {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

async fn run_schedule(coordinator: Weak<SyncCoordinator>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(coordinator) = coordinator.upgrade() else {
            break;
        };
        debug!("Running scheduled update check");
        if let Err(e) = coordinator.check_and_update().await {
            warn!("Scheduled update check failed: {}", e);
        }
    }
}

fn log_fetch_failure(document: &str, error: Option<FetchError>) {
    if let Some(e) = error {
        warn!("Error fetching remote {}: {}", document, e);
    }
}

/// Errors that abort a sync operation
#[derive(Debug, Error)]
pub enum SyncError {
    /// Writing to the local cache failed
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Remote content could not be obtained
    #[error("Content unavailable: {0}")]
    Unavailable(String),
}
