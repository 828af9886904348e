//! seal/unseal state machine
//!
//! ```text
//!            submit (size < T, duplicate)      submit (ignored)
//!               ┌──────┐                          ┌──────┐
//!               ▼      │   submit (size == T,     ▼      │
//!           ┌──────────┴┐   combine ok)     ┌────────────┴┐
//!  init ──▶ │  sealed   │ ────────────────▶ │  unsealed   │
//!           └──────────┬┘                   └──────┬──────┘
//!               ▲      │ submit (size == T,        │
//!               └──────┘  combine failed: reset)   │ seal (wipe)
//!               ▲                                  │
//!               └──────────────────────────────────┘
//! ```
//!
//! all state sits behind one mutex held for a whole transition, so
//! add → combine → clear is atomic with respect to other callers.

use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use zeroize::Zeroize;

use crate::accumulator::ShareAccumulator;
use crate::config::SealConfig;
use crate::secret::MasterSecret;
use crate::share::Share;
use crate::{shamir, Error, Result};

/// read-only view of the seal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealStatus {
    pub sealed: bool,
    pub t: usize,
    pub n: usize,
    /// shares accumulated toward the current attempt, 0 once unsealed
    pub progress: usize,
}

struct CoreState {
    accumulator: ShareAccumulator,
    master: Option<MasterSecret>,
}

impl CoreState {
    fn new(config: &SealConfig) -> Self {
        Self {
            accumulator: ShareAccumulator::new(config.threshold()),
            master: None,
        }
    }

    fn is_sealed(&self) -> bool {
        self.master.is_none()
    }

    fn progress(&self) -> usize {
        if self.is_sealed() {
            self.accumulator.len()
        } else {
            0
        }
    }

    /// wipe the master secret and any partial progress
    fn reset(&mut self) {
        if let Some(mut secret) = self.master.take() {
            secret.zeroize();
        }
        self.accumulator.clear();
    }
}

/// owns the share accumulator and, while unsealed, the master secret
pub struct SealCoordinator {
    config: SealConfig,
    state: Mutex<CoreState>,
}

impl SealCoordinator {
    /// new coordinator in the sealed state with no progress
    pub fn new(config: SealConfig) -> Self {
        Self {
            state: Mutex::new(CoreState::new(&config)),
            config,
        }
    }

    pub fn config(&self) -> SealConfig {
        self.config
    }

    /// force the sealed state, wiping the master secret
    ///
    /// idempotent when already sealed.
    pub fn seal(&self) -> Result<()> {
        let mut state = self.lock()?;
        let was_unsealed = !state.is_sealed();
        state.reset();

        if was_unsealed {
            info!("core sealed, master secret wiped");
        } else {
            debug!("seal requested while sealed, progress reset");
        }
        Ok(())
    }

    /// submit one share toward unsealing
    ///
    /// structurally malformed input fails with `InvalidShareEncoding` and
    /// leaves progress untouched. duplicates and submissions while unsealed
    /// are no-ops. when the share completes a threshold set the set is
    /// combined; on failure every accumulated share is discarded before
    /// `CombineFailed` is returned.
    pub fn submit_share(&self, share: &[u8]) -> Result<SealStatus> {
        let share = Share::from_bytes(share)?;
        let mut state = self.lock()?;

        if !state.is_sealed() {
            debug!("share submitted while unsealed, ignoring");
            return Ok(self.status_of(&state));
        }

        let (added, size) = state.accumulator.add(share);
        if !added {
            debug!(progress = size, "duplicate share ignored");
            return Ok(self.status_of(&state));
        }
        if !state.accumulator.is_full() {
            debug!(progress = size, threshold = self.config.threshold(), "share accepted");
            return Ok(self.status_of(&state));
        }

        let combined = shamir::combine(state.accumulator.shares(), &self.config);
        state.accumulator.clear();

        match combined {
            Ok(secret) => {
                state.master = Some(secret);
                info!(threshold = self.config.threshold(), "core unsealed");
                Ok(self.status_of(&state))
            }
            Err(e) => {
                warn!(error = %e, "combine failed, unseal progress reset");
                Err(Error::CombineFailed(e))
            }
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.status().sealed
    }

    /// shares accumulated since the last reset, 0 when unsealed
    pub fn secret_progress(&self) -> usize {
        self.status().progress
    }

    pub fn status(&self) -> SealStatus {
        match self.lock() {
            Ok(state) => self.status_of(&state),
            Err(_) => self.sealed_status(),
        }
    }

    /// run `f` against the master secret without letting it escape
    pub fn with_master_secret<R>(&self, f: impl FnOnce(&[u8]) -> R) -> Result<R> {
        let state = self.lock()?;
        match &state.master {
            Some(secret) => Ok(f(secret.as_bytes())),
            None => Err(Error::Sealed),
        }
    }

    fn status_of(&self, state: &CoreState) -> SealStatus {
        SealStatus {
            sealed: state.is_sealed(),
            t: self.config.threshold(),
            n: self.config.total_shares(),
            progress: state.progress(),
        }
    }

    fn sealed_status(&self) -> SealStatus {
        SealStatus {
            sealed: true,
            t: self.config.threshold(),
            n: self.config.total_shares(),
            progress: 0,
        }
    }

    /// take the state lock
    ///
    /// a poisoned lock means a transition panicked midway. secret material
    /// is wiped and the core left sealed before the failure is reported.
    fn lock(&self) -> Result<MutexGuard<'_, CoreState>> {
        match self.state.lock() {
            Ok(guard) => Ok(guard),
            Err(poisoned) => {
                let mut guard = poisoned.into_inner();
                guard.reset();
                drop(guard);
                self.state.clear_poison();
                error!("seal state lock poisoned, core reset to sealed");
                Err(Error::Internal("seal state lock poisoned".into()))
            }
        }
    }
}

impl std::fmt::Debug for SealCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.status();
        f.debug_struct("SealCoordinator")
            .field("sealed", &status.sealed)
            .field("threshold", &status.t)
            .field("shares", &status.n)
            .field("progress", &status.progress)
            .finish()
    }
}
