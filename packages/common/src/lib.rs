pub mod config;
pub mod retry;
pub mod storage;
pub mod upload;
