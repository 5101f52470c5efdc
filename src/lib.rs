pub mod config;
pub mod diff;
pub mod github;
pub mod notify;
pub mod run;
pub mod snapshot;
pub mod status;
pub mod storage;
