pub mod config;
pub mod db;
pub mod observer;
pub mod tracker;
pub mod utils;

pub use config::TrackerConfig;
pub use db::Database;
pub use tracker::{SessionManager, TrackerController};
