pub mod analysis;
pub mod calendar;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod raw;
pub mod stats;
