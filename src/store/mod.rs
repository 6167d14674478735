//! Principal-side data: user records and the authoritative store.

pub mod principal;
pub mod record;

pub use principal::PrincipalStore;
pub use record::{ChangeCheck, Record, RecordId, RecordInput};
