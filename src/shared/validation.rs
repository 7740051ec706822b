use uuid::Uuid;
use validator::ValidationError;

/// Identifiers are UUIDs in their canonical hyphenated text form
/// - Valid: "0190f5c2-6c1d-7a4e-9d2b-3f0e8c1a2b3c"
/// - Invalid: "", "123", "0190f5c26c1d7a4e9d2b3f0e8c1a2b3c", "{0190f5c2-...}"
pub fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    parse_identifier(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("identifier").with_message("must be a valid id".into()))
}

/// Parses an identifier, accepting only the canonical hyphenated form
pub fn parse_identifier(value: &str) -> Option<Uuid> {
    if value.len() != 36 {
        return None;
    }
    Uuid::parse_str(value).ok()
}
