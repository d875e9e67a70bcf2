pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod retry;
pub mod runner;
pub mod sheet;
pub mod source;
