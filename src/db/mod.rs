pub mod init;
pub mod migrations;
pub mod progress;

pub use init::{get_db_stats, init_db, migrate, ping, DbStats};
