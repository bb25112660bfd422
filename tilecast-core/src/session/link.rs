//! Connectivity lifecycle state machine.
//!
//! The connectivity subsystem (Wi-Fi stack, NetworkManager, …) is an
//! external collaborator that pushes [`LinkEvent`]s; this module only
//! defines the reaction. The state is an explicit value owned by the
//! session rather than process-wide globals, so the reaction logic is
//! testable in isolation: [`LinkState::handle_event`] is pure and
//! returns the [`SessionAction`] the driver must execute.
//!
//! ```text
//!  Disconnected ──► Connected ◄──┐
//!       │              │         │ address acquired
//!       │ loss         │ loss    │ (resets the retry counter)
//!       ▼              ▼         │
//!   Connecting ────────┴───► Failed   (after 4 consecutive losses)
//! ```

use std::time::Instant;

// ── Constants ────────────────────────────────────────────────────

/// Consecutive losses after which the session gives up. `Failed` is
/// terminal; recovery requires external intervention (fixed
/// credentials and a restart).
pub const RETRY_LIMIT: u8 = 4;

// ── LinkEvent ────────────────────────────────────────────────────

/// Connectivity event delivered by the external subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// The network stack obtained a local address; traffic can flow.
    AddressAcquired,
    /// The link went down.
    ConnectionLost,
}

// ── LinkPhase ────────────────────────────────────────────────────

/// Current phase of the connectivity lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LinkPhase {
    /// No link yet. Initial state.
    #[default]
    Disconnected,

    /// A reconnect attempt is in flight.
    Connecting,

    /// Link is up and usable.
    Connected {
        /// When the link came up.
        since: Instant,
    },

    /// Retry budget exhausted. Terminal.
    Failed,
}

impl std::fmt::Display for LinkPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected { .. } => write!(f, "Connected"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

impl LinkPhase {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

// ── SessionAction ────────────────────────────────────────────────

/// What the session driver must do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Link is up: download the image and render it.
    FetchAndRender,
    /// Ask the connectivity subsystem to re-join the network.
    Reconnect {
        /// Which consecutive attempt this is (1-based).
        attempt: u8,
    },
    /// Retry budget exhausted: surface a user-visible failure.
    GiveUp,
    /// Nothing to do (the session has already failed).
    Ignore,
}

// ── LinkState ────────────────────────────────────────────────────

/// Connectivity phase plus the bounded retry counter.
#[derive(Debug, Default)]
pub struct LinkState {
    phase: LinkPhase,
    retry_count: u8,
}

impl LinkState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &LinkPhase {
        &self.phase
    }

    /// Consecutive losses since the last successful connection.
    pub fn retry_count(&self) -> u8 {
        self.retry_count
    }

    /// React to a connectivity event.
    ///
    /// An acquired address resets the retry counter and yields
    /// [`SessionAction::FetchAndRender`]. Each loss increments the
    /// counter and requests a reconnect until [`RETRY_LIMIT`]
    /// consecutive losses, at which point the state becomes terminal.
    pub fn handle_event(&mut self, event: LinkEvent) -> SessionAction {
        if self.phase.is_failed() {
            return SessionAction::Ignore;
        }

        match event {
            LinkEvent::AddressAcquired => {
                self.phase = LinkPhase::Connected {
                    since: Instant::now(),
                };
                self.retry_count = 0;
                SessionAction::FetchAndRender
            }
            LinkEvent::ConnectionLost => {
                self.retry_count += 1;
                if self.retry_count >= RETRY_LIMIT {
                    self.phase = LinkPhase::Failed;
                    SessionAction::GiveUp
                } else {
                    self.phase = LinkPhase::Connecting;
                    SessionAction::Reconnect {
                        attempt: self.retry_count,
                    }
                }
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
