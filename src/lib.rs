pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod pomodoro;
pub mod preferences;
pub mod storage;
pub mod store;
pub mod transfer;

pub use error::{PlanbookError, Result};
pub use store::DataStore;
