// Daygate Library
// Re-export modules for use by the server and player binaries

pub mod answer;
pub mod cache;
pub mod clock;
pub mod config;
pub mod db;
pub mod filmstrip;
pub mod notify;
pub mod puzzles;
pub mod remote;
pub mod schedule;
pub mod server;
pub mod session;
