//! # sealgate
//!
//! threshold seal/unseal gate for a single master secret.
//!
//! the master secret is split into N shares at initialization. the gate
//! stays sealed until T distinct shares, possibly submitted one at a time
//! by different operators, reconstruct it.
//!
//! ```text
//!   share ──▶ ┌──────────────────────────────────────────┐
//!   share ──▶ │ SealCoordinator (one mutex)              │
//!   share ──▶ │   validate ─▶ accumulate ─▶ size == T ?  │
//!             │                              │           │
//!             │                       combine (GF(256))  │
//!             │                        ok │     │ err    │
//!             │                  unsealed ◀     ▶ reset  │
//!             └──────────────────────────────────────────┘
//! ```
//!
//! ## security properties
//!
//! - fewer than T shares never reconstruct the secret
//! - a failed combine discards the whole batch, so shares cannot be
//!   guessed one at a time against a growing set
//! - shares carry a checksum of the secret, mixed splits are rejected
//! - the master secret is zeroized on re-seal and on drop
//!
//! ## usage
//!
//! ```rust
//! use sealgate::{shamir, MasterSecret, SealConfig, SealCoordinator};
//!
//! let config = SealConfig::new(2, 3)?;
//! let shares = shamir::split(&MasterSecret::generate(), &config);
//!
//! let core = SealCoordinator::new(config);
//! core.submit_share(shares[0].as_bytes())?;
//! let status = core.submit_share(shares[2].as_bytes())?;
//! assert!(!status.sealed);
//!
//! core.seal()?;
//! assert!(core.is_sealed());
//! # Ok::<(), sealgate::Error>(())
//! ```

pub mod accumulator;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod secret;
pub mod shamir;
pub mod share;

pub use accumulator::ShareAccumulator;
pub use config::SealConfig;
pub use coordinator::{SealCoordinator, SealStatus};
pub use error::{CombineError, Error, Result};
pub use secret::MasterSecret;
pub use shamir::{combine, split};
pub use share::Share;
