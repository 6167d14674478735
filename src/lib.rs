//! # user-replication
//!
//! A two-service demonstration of change-detection-driven replication over HTTP.
//!
//! - The **principal** owns an in-memory set of user records and a dirty flag that any
//!   mutation sets and any check clears.
//! - The **replica** polls that flag on a fixed interval (short poll) and, only when it
//!   reports changes, fetches the full record set and swaps it into its local mirror
//!   (long poll).
//!
//! ## Example
//!
//! ```rust
//! use user_replication::{PrincipalStore, RecordInput};
//!
//! let store = PrincipalStore::new();
//! let user = store.create(RecordInput::new("A", "a"));
//! assert_eq!(user.id, 1);
//! assert!(store.check_and_reset());
//! assert!(!store.check_and_reset());
//! ```

pub mod config;
pub mod error;
pub mod replica;
pub mod server;
pub mod store;

pub use config::{PrincipalConfig, ReplicaConfig};
pub use error::{ApiError, ReplicationError, StoreError};
pub use replica::{Mirror, PollOutcome, ReplicationAgent, ReplicationStatus, ReplicationTask};
pub use store::{ChangeCheck, PrincipalStore, Record, RecordId, RecordInput};
