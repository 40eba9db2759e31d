pub mod runtime_logger;
pub mod selection_log;
