mod warning_record_repo;

pub use warning_record_repo::WarningRecordRepo;
