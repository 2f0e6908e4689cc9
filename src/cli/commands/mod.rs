pub mod audit;
pub mod backup;
pub mod catalog;
pub mod config;
pub mod db;
pub mod delete;
pub mod export;
pub mod init;
pub mod log;
pub mod report;
pub mod show;
pub mod weigh;
