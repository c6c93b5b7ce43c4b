// library crate for acto
// exposes modules needed by integration tests

pub mod analytics;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod export;
pub mod rules;
pub mod scan;
pub mod watch;
