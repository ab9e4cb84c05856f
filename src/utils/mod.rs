pub mod engine_logger;
