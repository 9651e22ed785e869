//! Job status polling.
//!
//! A `JobPoller` owns one background task that fetches a job on a fixed
//! cadence and publishes the latest view through a watch channel. Polling
//! stops the moment a terminal status is observed; transient fetch errors
//! never stop it, and never clear the last-known-good snapshot.
//!
//! Every fetch is tagged with the generation current at request time.
//! Retargeting the poller bumps the generation, so a late response for an
//! abandoned job id is discarded instead of applied (see DESIGN.md for the
//! stale-response policy).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::{ClientError, PipelineClient};
use crate::models::Job;

/// Observable poller state.
#[derive(Debug, Clone, Default)]
pub struct PollState {
    /// Last successfully fetched job snapshot. Replaced wholesale on each
    /// successful fetch; preserved across fetch errors.
    pub job: Option<Job>,
    /// Last error message, cleared by the next successful fetch.
    pub error: Option<String>,
    /// A fetch is currently in flight.
    pub loading: bool,
    /// The cadence is active (enabled, targeted, and no terminal status seen).
    pub polling: bool,
}

/// Target of the poll cadence. Job id and generation change together under
/// one lock so a fetch can never pair a stale id with a fresh generation.
struct Target {
    job_id: Option<String>,
    generation: u64,
}

struct Inner {
    client: PipelineClient,
    state: watch::Sender<PollState>,
    target: Mutex<Target>,
    /// Shared flag read through indirection on every tick, never a value
    /// captured at task start: the tick that fires after a terminal response
    /// must observe the latest write.
    terminal_seen: AtomicBool,
    enabled: AtomicBool,
    wake: Notify,
}

impl Inner {
    fn polling_now(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
            && !self.terminal_seen.load(Ordering::SeqCst)
            && self
                .target
                .lock()
                .expect("poller target lock poisoned")
                .job_id
                .is_some()
    }

    fn publish_polling_flag(&self) {
        let polling = self.polling_now();
        self.state.send_modify(|s| s.polling = polling);
    }

    /// Fold a fetch result into observable state, unless it is stale.
    fn apply(&self, generation: u64, result: Result<Job, ClientError>) {
        {
            let target = self.target.lock().expect("poller target lock poisoned");
            if target.generation != generation {
                // Late response for an abandoned target; drop it so the
                // state of the current job is never overwritten.
                return;
            }
        }

        // Set before publishing so a concurrent tick cannot start another
        // fetch between the state update and the flag write.
        if let Ok(job) = &result {
            if job.status.is_terminal() {
                self.terminal_seen.store(true, Ordering::SeqCst);
            }
        }

        let polling = self.polling_now();
        self.state.send_modify(|state| {
            state.loading = false;
            state.polling = polling;
            match result {
                Ok(job) => {
                    state.job = Some(job);
                    state.error = None;
                }
                Err(ClientError::NotFound) => {
                    state.error = Some("job not found".to_string());
                }
                Err(e) => {
                    state.error = Some(e.to_string());
                }
            }
        });
    }
}

/// Start one fetch unless the cadence is already over.
fn spawn_fetch(inner: &Arc<Inner>) {
    if inner.terminal_seen.load(Ordering::SeqCst) {
        return;
    }
    spawn_fetch_forced(inner);
}

/// Start one fetch regardless of the terminal flag (cancel reconcile).
fn spawn_fetch_forced(inner: &Arc<Inner>) {
    let (job_id, generation) = {
        let target = inner.target.lock().expect("poller target lock poisoned");
        match &target.job_id {
            Some(id) => (id.clone(), target.generation),
            None => return,
        }
    };

    inner.state.send_modify(|s| s.loading = true);

    let inner = inner.clone();
    tokio::spawn(async move {
        let result = inner.client.get_job(&job_id).await;
        inner.apply(generation, result);
    });
}

/// Polls one job on a fixed interval until a terminal status is observed.
pub struct JobPoller {
    inner: Arc<Inner>,
    task: JoinHandle<()>,
}

impl JobPoller {
    /// Spawn a poller. When `enabled`, the first fetch happens immediately
    /// rather than after the first interval elapses.
    pub fn spawn(
        client: PipelineClient,
        job_id: impl Into<String>,
        interval: Duration,
        enabled: bool,
    ) -> Self {
        let (state_tx, _) = watch::channel(PollState {
            polling: enabled,
            ..PollState::default()
        });

        let inner = Arc::new(Inner {
            client,
            state: state_tx,
            target: Mutex::new(Target {
                job_id: Some(job_id.into()),
                generation: 0,
            }),
            terminal_seen: AtomicBool::new(false),
            enabled: AtomicBool::new(enabled),
            wake: Notify::new(),
        });

        let task = tokio::spawn(run_loop(inner.clone(), interval));

        Self { inner, task }
    }

    /// Subscribe to state updates.
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.inner.state.subscribe()
    }

    /// Current state snapshot.
    pub fn state(&self) -> PollState {
        self.inner.state.borrow().clone()
    }

    /// Trigger one fetch outside the cadence. A no-op once a terminal status
    /// has been observed: no network call, no state change.
    pub fn refetch(&self) {
        if !self.inner.enabled.load(Ordering::SeqCst) {
            return;
        }
        spawn_fetch(&self.inner);
    }

    /// Request cancellation of the watched job, then refetch so local state
    /// reconciles with the authoritative server answer. Returns whether the
    /// cancel request itself succeeded; failures surface through the same
    /// error channel as polling failures and leave the snapshot intact.
    pub async fn cancel(&self) -> bool {
        let job_id = {
            let target = self.inner.target.lock().expect("poller target lock poisoned");
            match &target.job_id {
                Some(id) => id.clone(),
                None => return false,
            }
        };

        match self.inner.client.cancel_job(&job_id).await {
            Ok(response) => {
                tracing::debug!(job_id = %job_id, status = response.status.as_str(), "cancel requested");
                spawn_fetch_forced(&self.inner);
                true
            }
            Err(e) => {
                self.inner
                    .state
                    .send_modify(|state| state.error = Some(e.to_string()));
                false
            }
        }
    }

    /// Retarget the poller at a different job without tearing it down.
    /// Resets the terminal flag unconditionally: stale terminal state from a
    /// previous job must never block polling for the new one.
    pub fn watch_job(&self, job_id: impl Into<String>) {
        {
            let mut target = self.inner.target.lock().expect("poller target lock poisoned");
            target.job_id = Some(job_id.into());
            target.generation += 1;
        }
        self.inner.terminal_seen.store(false, Ordering::SeqCst);
        self.inner
            .state
            .send_modify(|state| {
                state.job = None;
                state.error = None;
            });
        self.inner.publish_polling_flag();
        self.inner.wake.notify_one();
    }

    /// Enable or disable the cadence. Disabling stops scheduled fetches
    /// synchronously; an already in-flight fetch still lands.
    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.store(enabled, Ordering::SeqCst);
        self.inner.publish_polling_flag();
        if enabled {
            self.inner.wake.notify_one();
        }
    }
}

impl Drop for JobPoller {
    fn drop(&mut self) {
        // Never leak a running interval past the poller's lifetime.
        self.task.abort();
    }
}

async fn run_loop(inner: Arc<Inner>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = inner.wake.notified() => {
                // Retarget or re-enable: fetch now and restart the cadence.
                ticker.reset();
            }
        }

        if !inner.enabled.load(Ordering::SeqCst) {
            continue;
        }
        if inner.terminal_seen.load(Ordering::SeqCst) {
            // The tick may still fire after a terminal status; the shared
            // flag keeps it from turning into a fetch.
            continue;
        }
        spawn_fetch(&inner);
    }
}
