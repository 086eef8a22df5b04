//! Social-graph access for castcard: profile and recent-cast lookups against
//! the Neynar v2 API, plus the fetch-then-aggregate pipeline built on them.

pub mod activity;
pub mod client;
pub mod error;
pub mod graph;
pub mod types;

pub use activity::{fetch_activity, ActivitySnapshot, TOP_ENGAGER_LIMIT};
pub use client::NeynarClient;
pub use error::NeynarError;
pub use graph::SocialGraph;
