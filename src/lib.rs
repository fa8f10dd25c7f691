pub mod cache;
pub mod chart;
pub mod config;
pub mod error;
pub mod format;
pub mod merge;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod storage;
