//! Share button lifecycle: `Idle -> Sharing -> Succeeded | Failed -> Idle`.

use crate::compose::{share, ShareContext, ShareOutcome, SharePayload};
use crate::error::ShareError;

pub const IDLE_LABEL: &str = "Share to Farcaster";
pub const BUSY_LABEL: &str = "Sharing...";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShareState {
    #[default]
    Idle,
    Sharing,
    Succeeded,
    Failed,
}

#[derive(Debug, Default)]
pub struct ShareSession {
    state: ShareState,
    last_result: Option<ShareState>,
}

impl ShareSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> ShareState {
        self.state
    }

    /// Terminal state of the most recent completed share.
    #[must_use]
    pub fn last_result(&self) -> Option<ShareState> {
        self.last_result
    }

    #[must_use]
    pub fn trigger_enabled(&self) -> bool {
        self.state != ShareState::Sharing
    }

    #[must_use]
    pub fn trigger_label(&self) -> &'static str {
        if self.state == ShareState::Sharing {
            BUSY_LABEL
        } else {
            IDLE_LABEL
        }
    }

    /// Enters `Sharing`.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::AlreadySharing`] while a share is in flight.
    pub fn begin(&mut self) -> Result<(), ShareError> {
        if self.state == ShareState::Sharing {
            return Err(ShareError::AlreadySharing);
        }
        self.state = ShareState::Sharing;
        Ok(())
    }

    /// Records `outcome` and returns the terminal state it maps to.
    pub fn finish(&mut self, outcome: &ShareOutcome) -> ShareState {
        let terminal = if outcome.is_success() {
            ShareState::Succeeded
        } else {
            ShareState::Failed
        };
        self.state = terminal;
        self.last_result = Some(terminal);
        terminal
    }

    pub fn reset(&mut self) {
        self.state = ShareState::Idle;
    }

    /// Runs one full share cycle and leaves the session `Idle`.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::AlreadySharing`] if a share is in flight.
    pub fn run(
        &mut self,
        payload: &SharePayload,
        context: ShareContext<'_>,
    ) -> Result<ShareOutcome, ShareError> {
        self.begin()?;
        let outcome = share(payload, context);
        let terminal = self.finish(&outcome);
        tracing::debug!(username = %payload.username, state = ?terminal, "share finished");
        self.reset();
        Ok(outcome)
    }
}
