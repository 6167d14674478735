//! Replica side: principal client, local mirror, agent and its poll loop.

pub mod agent;
pub mod client;
pub mod mirror;
pub mod poller;

pub use agent::{PollOutcome, ReplicationAgent, ReplicationStatus};
pub use client::PrincipalClient;
pub use mirror::{Mirror, Snapshot};
pub use poller::ReplicationTask;
