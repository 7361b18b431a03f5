use cfn_manage::core::{CfnError, ClientConfig, IndexMap, StackDescriptor};

#[test]
fn test_error_creation() {
    let err = CfnError::invalid_argument("bad");
    assert!(matches!(err, CfnError::InvalidArgument(_)));

    let err = CfnError::provisioning("rejected");
    assert!(matches!(err, CfnError::Provisioning(_)));

    let err = CfnError::wait_timeout("slow");
    assert!(matches!(err, CfnError::WaitTimeout(_)));
}

#[test]
fn test_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: CfnError = io_err.into();
    assert!(matches!(err, CfnError::Io(_)));

    let json_err = serde_json_error();
    let err: CfnError = json_err.into();
    assert!(matches!(err, CfnError::Serialization(_)));
}

fn serde_json_error() -> serde_json::Error {
    serde_json::from_str::<u32>("not a number").unwrap_err()
}

#[test]
fn test_error_display() {
    let err = CfnError::invalid_argument("stack name is required");
    assert_eq!(err.to_string(), "Invalid argument: stack name is required");

    let err = CfnError::wait_timeout("stack s not deleted after 120 attempts");
    assert_eq!(err.to_string(), "Wait timeout: stack s not deleted after 120 attempts");
}

#[test]
fn test_missing_identity_fails_before_any_request() {
    let err = StackDescriptor::new("", "", false, IndexMap::new()).unwrap_err();
    assert!(matches!(err, CfnError::InvalidArgument(_)));
}

#[test]
fn test_bad_config_is_config_error() {
    let err = ClientConfig::from_toml("region = 5").unwrap_err();
    assert!(matches!(err, CfnError::Config(_)));
}
