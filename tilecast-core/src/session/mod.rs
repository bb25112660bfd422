//! Session lifecycle driver.
//!
//! Consumes connectivity events from an mpsc channel and executes the
//! [`SessionAction`] each one produces against the frame pipeline. The
//! channel decouples this core from the platform's event dispatch: any
//! source that can push [`LinkEvent`]s can drive a session.

pub mod link;
pub mod pipeline;

pub use link::{LinkEvent, LinkPhase, LinkState, RETRY_LIMIT, SessionAction};
pub use pipeline::{FramePipeline, PipelineConfig, ScreenPipeline};

use tokio::sync::mpsc;
use tracing::{error, info};

/// Message shown when the retry budget runs out.
const FAILURE_MESSAGE: &str = "Cannot connect to the internet. Check your network credentials";

// ── Session ──────────────────────────────────────────────────────

/// One display session: connectivity state plus the pipeline it drives.
pub struct Session<P: FramePipeline> {
    state: LinkState,
    pipeline: P,
}

impl<P: FramePipeline> Session<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            state: LinkState::new(),
            pipeline,
        }
    }

    /// Current connectivity state.
    pub fn state(&self) -> &LinkState {
        &self.state
    }

    /// Consume the session and keep the pipeline.
    pub fn into_pipeline(self) -> P {
        self.pipeline
    }

    /// React to one connectivity event.
    ///
    /// A failed download attempt is reported and dropped; recovery is
    /// driven by subsequent connectivity events, not by this layer.
    pub async fn handle_event(&mut self, event: LinkEvent) {
        match self.state.handle_event(event) {
            SessionAction::FetchAndRender => {
                info!("address acquired: download image & render the display");
                if let Err(e) = self.pipeline.fetch_and_render().await {
                    error!("frame update failed: {e}");
                }
            }
            SessionAction::Reconnect { attempt } => {
                self.pipeline.reconnect(attempt).await;
            }
            SessionAction::GiveUp => {
                self.pipeline.show_failure(FAILURE_MESSAGE);
            }
            SessionAction::Ignore => {}
        }
    }

    /// Drive the session until the event source closes.
    ///
    /// A terminal `Failed` state does not stop the loop: the rest of
    /// the system stays responsive, later events are simply ignored.
    pub async fn run(&mut self, mut events: mpsc::Receiver<LinkEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
