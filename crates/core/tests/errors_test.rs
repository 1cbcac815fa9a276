use std::error::Error;
use cozy_core::errors::{CozyError, CozyResult};

#[test]
fn test_cozy_error_display() {
    let invalid = CozyError::InvalidConfig("url pattern has no capture group".to_string());
    let retrieval = CozyError::Retrieval("timed out".to_string());
    let parse = CozyError::Parse("bad table".to_string());
    let handler = CozyError::Handler(eyre::eyre!("processor failed"));
    let internal = CozyError::Internal(Box::new(std::io::Error::other("Internal error")));

    assert_eq!(
        invalid.to_string(),
        "Invalid configuration: url pattern has no capture group"
    );
    assert_eq!(retrieval.to_string(), "Retrieval error: timed out");
    assert_eq!(parse.to_string(), "Parse error: bad table");
    assert!(handler.to_string().contains("Handler error:"));
    assert!(internal.to_string().contains("Internal error:"));
}

#[test]
fn test_error_source() {
    let io_error = std::io::Error::other("IO error");
    let error = CozyError::Internal(Box::new(io_error));

    assert!(error.source().is_some());
}

#[test]
fn test_cozy_result() {
    let result: CozyResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: CozyResult<i32> = Err(CozyError::Parse("nope".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_from_eyre_report() {
    let error: CozyError = eyre::eyre!("parser exploded").into();

    assert!(matches!(error, CozyError::Handler(_)));
    assert!(error.to_string().contains("parser exploded"));
}
