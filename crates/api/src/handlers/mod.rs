pub mod dashboard;
pub mod eventlogs;
pub mod thresholds;
