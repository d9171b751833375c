pub mod cleanup;
pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod lines;
pub mod list;
pub mod log;
pub mod serve;
pub mod show;
pub mod start;
pub mod stop;
