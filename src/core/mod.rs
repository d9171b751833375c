pub mod cleanup;
pub mod config;
pub mod export;
pub mod list;
pub mod log;
pub mod start;
pub mod stop;
