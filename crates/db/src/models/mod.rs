pub mod warning_record;
