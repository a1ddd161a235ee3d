use super::*;

#[test]
fn test_error_codes() {
    let conflict = DomainError::Conflict {
        message: "version 3 is stale".to_string(),
    };
    assert_eq!(conflict.code(), "CONFLICT");
    assert!(conflict.is_conflict());
    assert!(!conflict.is_invalid_argument());

    let unavailable = DomainError::StoreUnavailable {
        message: "pool timed out".to_string(),
    };
    assert_eq!(unavailable.code(), "STORE_UNAVAILABLE");
    assert!(unavailable.is_store_unavailable());
}

#[test]
fn test_token_errors_are_invalid_arguments() {
    let err: DomainError = TokenError::UnknownField {
        field: "password".to_string(),
    }
    .into();
    assert!(err.is_invalid_argument());
    assert_eq!(err.code(), "UNKNOWN_FIELD");
    assert!(err.to_string().contains("password"));

    let err: DomainError = TokenError::EntropyUnavailable.into();
    assert!(!err.is_invalid_argument());
    assert_eq!(err.code(), "ENTROPY_UNAVAILABLE");
}

#[test]
fn test_messages() {
    let err = DomainError::NotFound {
        resource: "access token 00ff".to_string(),
    };
    assert_eq!(err.to_string(), "Resource not found: access token 00ff");

    let err = TokenError::InvalidTokenType {
        value: "bearer".to_string(),
    };
    assert_eq!(err.to_string(), "Invalid token type: \"bearer\"");
}
