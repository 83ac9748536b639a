//! CLI commands for mnemo

pub mod add;
pub mod dispatch;
pub mod generate;
pub mod helpers;
pub mod init;
pub mod list;
pub mod rule;
pub mod search;
pub mod serve;
