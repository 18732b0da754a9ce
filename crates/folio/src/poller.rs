//! Interval polling of a widget data source.
//!
//! A [`Poller`] owns one background task. The task fires a fetch immediately,
//! then once per interval, and applies each completion to a shared
//! [`WidgetState`]. Overlapping fetches are not sequenced: whichever completes
//! last wins. Stopping (or dropping) the poller aborts in-flight fetches so no
//! update lands after teardown.

use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::{mpsc, watch, RwLock};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;

/// A read-only JSON resource that can be turned into a snapshot.
#[async_trait]
pub trait Source: Send + Sync + 'static {
    type Snapshot: Clone + Send + Sync + 'static;
    type Error: Display + Send + 'static;

    /// Short name used as a log prefix.
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Result<Self::Snapshot, Self::Error>;
}

/// Where a widget is in its data lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No fetch has completed yet.
    Loading,
    /// A snapshot exists (possibly stale after a later failure).
    Ready,
    /// Every fetch so far has failed and there is nothing to show.
    Unavailable,
}

/// Latest known data for one widget.
#[derive(Debug, Clone)]
pub struct WidgetState<T> {
    pub snapshot: Option<T>,
    pub phase: Phase,
    /// Message of the most recent failure, cleared on success.
    pub last_error: Option<String>,
    pub fetches: u64,
    pub failures: u64,
    pub updated_at: Option<Instant>,
}

impl<T> Default for WidgetState<T> {
    fn default() -> Self {
        Self {
            snapshot: None,
            phase: Phase::Loading,
            last_error: None,
            fetches: 0,
            failures: 0,
            updated_at: None,
        }
    }
}

/// What the presenter should draw.
#[derive(Debug, PartialEq)]
pub enum WidgetView<'a, T> {
    Loading,
    Unavailable,
    Ready(&'a T),
}

impl<T> WidgetState<T> {
    /// State after a single successful fetch.
    pub fn ready(snapshot: T) -> Self {
        Self {
            snapshot: Some(snapshot),
            phase: Phase::Ready,
            fetches: 1,
            updated_at: Some(Instant::now()),
            ..Self::default()
        }
    }

    /// Apply one fetch outcome.
    ///
    /// Success replaces the snapshot wholesale. Failure is logged and keeps
    /// whatever snapshot was there.
    pub fn apply<E: Display>(&mut self, source: &str, result: Result<T, E>) {
        self.fetches += 1;
        match result {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.phase = Phase::Ready;
                self.last_error = None;
                self.updated_at = Some(Instant::now());
                log::debug!("[{}] snapshot updated", source);
            }
            Err(e) => {
                self.failures += 1;
                log::warn!("[{}] fetch failed: {}", source, e);
                self.last_error = Some(e.to_string());
                if self.snapshot.is_none() {
                    self.phase = Phase::Unavailable;
                }
            }
        }
    }

    pub fn view(&self) -> WidgetView<'_, T> {
        match (&self.snapshot, self.phase) {
            (Some(snapshot), _) => WidgetView::Ready(snapshot),
            (None, Phase::Unavailable) => WidgetView::Unavailable,
            (None, _) => WidgetView::Loading,
        }
    }

    pub fn successes(&self) -> u64 {
        self.fetches - self.failures
    }

    /// True when a snapshot is shown but the latest fetch failed.
    pub fn is_stale(&self) -> bool {
        self.snapshot.is_some() && self.last_error.is_some()
    }
}

/// Owned polling timer for one source.
pub struct Poller<T> {
    state: Arc<RwLock<WidgetState<T>>>,
    refresh_tx: mpsc::UnboundedSender<()>,
    shutdown_tx: watch::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl<T: Clone + Send + Sync + 'static> Poller<T> {
    /// Start polling `source` every `interval`, beginning now.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start<S>(interval: Duration, source: S) -> Self
    where
        S: Source<Snapshot = T>,
    {
        let state = Arc::new(RwLock::new(WidgetState::default()));
        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();

        log::info!(
            "[{}] polling every {}s",
            source.name(),
            interval.as_secs_f64()
        );

        let handle = tokio::spawn(run_loop(
            Arc::new(source),
            interval,
            state.clone(),
            refresh_rx,
            shutdown_rx,
        ));

        Self {
            state,
            refresh_tx,
            shutdown_tx,
            handle: Some(handle),
        }
    }

    /// Copy of the current state (non-blocking for the writer beyond the clone).
    pub async fn state(&self) -> WidgetState<T> {
        self.state.read().await.clone()
    }

    /// Fire an extra fetch now, outside the regular schedule.
    pub fn refresh(&self) {
        let _ = self.refresh_tx.send(());
    }

    /// Stop the timer and wait for the loop to exit.
    pub async fn stop(mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                log::warn!("poller task ended abnormally: {}", e);
            }
        }
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn run_loop<S: Source>(
    source: Arc<S>,
    period: Duration,
    state: Arc<RwLock<WidgetState<S::Snapshot>>>,
    mut refresh_rx: mpsc::UnboundedReceiver<()>,
    mut shutdown: watch::Receiver<()>,
) {
    let name = source.name();
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => {
                log::debug!("[{}] poller stopping", name);
                break;
            }
            Some(joined) = in_flight.join_next() => {
                match joined {
                    Ok(result) => state.write().await.apply(name, result),
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => log::warn!("[{}] fetch task panicked: {}", name, e),
                }
            }
            _ = interval.tick() => {
                let source = source.clone();
                in_flight.spawn(async move { source.fetch().await });
            }
            Some(()) = refresh_rx.recv() => {
                log::debug!("[{}] manual refresh", name);
                let source = source.clone();
                in_flight.spawn(async move { source.fetch().await });
            }
        }
    }

    in_flight.abort_all();
}
