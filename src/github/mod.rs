pub mod client;
pub mod issues;
pub mod search;

pub use client::{GraphQlClient, IssueSource};
pub use search::fetch_snapshot;
