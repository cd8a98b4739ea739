use serde_json::json;

use crate::ValidationError;

/// Renders validation errors as a GraphQL-style `{"errors": [...]}` response.
pub fn json_from_validation_errors(errors: &[ValidationError]) -> String {
    json!({ "errors": errors }).to_string()
}
