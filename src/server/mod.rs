//! Web dashboard for the document-processing pipeline.
//!
//! Serves browse/detail/review/upload pages plus thin JSON endpoints that
//! the page scripts poll. All job state is fetched from the backend job API;
//! the dashboard holds no storage of its own. Each watched job gets one
//! server-side poller, shared across page refreshes, so browser polling
//! never multiplies load on the backend.

mod assets;
mod handlers;
mod routes;
mod templates;

pub use routes::create_router;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::client::PipelineClient;
use crate::config::Settings;
use crate::poller::{JobPoller, PollState};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub client: PipelineClient,
    pub poll_interval: Duration,
    pub review_threshold: f64,
    /// One poller per watched job id, shared across requests.
    pollers: Arc<Mutex<HashMap<String, Arc<JobPoller>>>>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: PipelineClient::from_settings(settings),
            poll_interval: settings.poll_interval(),
            review_threshold: settings.review_threshold,
            pollers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get (or start) the shared poller for a job and return its state.
    /// Waits briefly for the first fetch so fresh pages render a snapshot
    /// instead of an empty shell.
    pub async fn poll_state(&self, job_id: &str) -> PollState {
        let poller = {
            let mut pollers = self.pollers.lock().expect("poller registry lock poisoned");
            pollers
                .entry(job_id.to_string())
                .or_insert_with(|| {
                    Arc::new(JobPoller::spawn(
                        self.client.clone(),
                        job_id,
                        self.poll_interval,
                        true,
                    ))
                })
                .clone()
        };

        let mut rx = poller.subscribe();
        let _ = tokio::time::timeout(
            Duration::from_secs(3),
            rx.wait_for(|s| s.job.is_some() || s.error.is_some()),
        )
        .await;

        let state = poller.state();
        if !state.polling {
            // Terminal jobs need no cadence; drop the poller and let a later
            // view re-fetch once.
            self.pollers
                .lock()
                .expect("poller registry lock poisoned")
                .remove(job_id);
        }
        state
    }

    /// The shared poller for a job, if one is currently running.
    pub fn poller(&self, job_id: &str) -> Option<Arc<JobPoller>> {
        self.pollers
            .lock()
            .expect("poller registry lock poisoned")
            .get(job_id)
            .cloned()
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting dashboard at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
