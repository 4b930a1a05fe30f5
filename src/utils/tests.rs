use super::error::OutputError;
use super::logging;

#[test]
fn logging_init_accepts_levels() {
    // Should not panic
    logging::init("info");
    logging::init("debug");
    logging::init("warn");
}

#[test]
fn parse_level_falls_back_to_info() {
    assert_eq!(logging::parse_level("WARNING"), tracing::Level::WARN);
    assert_eq!(logging::parse_level("trace"), tracing::Level::TRACE);
    assert_eq!(logging::parse_level("nonsense"), tracing::Level::INFO);
}

#[test]
fn error_messages_name_the_path() {
    let err = OutputError::PathNotADirectory("/tmp/x/file".into());
    assert_eq!(err.to_string(), "path component is not a directory: /tmp/x/file");

    let err = OutputError::TokenNotFound("topic4".to_string());
    assert_eq!(err.to_string(), "token 'topic4' has no value");
}
