pub mod observer;
pub mod sync_config;
pub mod synchronizer;
pub mod tick_report;
