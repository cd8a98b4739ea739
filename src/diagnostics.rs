use itertools::Itertools;
use serde::Serialize;
use smol_str::SmolStr;

use crate::SelectionField;

/// Why two fields sharing a response name cannot be merged.
#[derive(Clone, Debug, PartialEq)]
pub struct ConflictReason {
    pub response_name: SmolStr,
    pub message: ConflictReasonMessage,
}

impl ConflictReason {
    pub fn new(response_name: impl Into<SmolStr>, message: ConflictReasonMessage) -> Self {
        Self {
            response_name: response_name.into(),
            message,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConflictReasonMessage {
    Message(String),
    Nested(Vec<ConflictReason>),
}

impl From<String> for ConflictReasonMessage {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

#[derive(Debug)]
pub struct Conflict<'a> {
    pub reason: ConflictReason,
    /// The two conflicting fields followed by every field involved in
    /// nested conflicts.
    pub fields: Vec<&'a SelectionField>,
}

impl<'a> Conflict<'a> {
    pub fn new(reason: ConflictReason, fields: Vec<&'a SelectionField>) -> Self {
        Self { reason, fields }
    }

    pub fn message(&self) -> String {
        fields_conflict_message(&self.reason.response_name, &self.reason.message)
    }
}

pub fn fields_conflict_message(response_name: &str, reason: &ConflictReasonMessage) -> String {
    format!(
        "Fields \"{response_name}\" conflict because {}.",
        reason_message(reason)
    )
}

pub fn reason_message(reason: &ConflictReasonMessage) -> String {
    match reason {
        ConflictReasonMessage::Message(message) => message.clone(),
        ConflictReasonMessage::Nested(reasons) => reasons
            .iter()
            .map(|reason| {
                format!(
                    "subfields \"{}\" conflict because {}",
                    reason.response_name,
                    reason_message(&reason.message)
                )
            })
            .join(" and "),
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationError<'a> {
    pub message: String,
    #[serde(skip)]
    pub fields: Vec<&'a SelectionField>,
}

impl<'a> ValidationError<'a> {
    pub fn new(message: String, fields: Vec<&'a SelectionField>) -> Self {
        Self { message, fields }
    }
}

impl<'a> From<Conflict<'a>> for ValidationError<'a> {
    fn from(value: Conflict<'a>) -> Self {
        Self::new(value.message(), value.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(response_name: &str, message: &str) -> ConflictReason {
        ConflictReason::new(response_name, message.to_owned().into())
    }

    #[test]
    fn test_flat_message() {
        assert_eq!(
            fields_conflict_message(
                "fido",
                &"name and nickname are different fields".to_owned().into()
            ),
            r#"Fields "fido" conflict because name and nickname are different fields."#
        );
    }

    #[test]
    fn test_nested_message() {
        let reason = ConflictReasonMessage::Nested(vec![
            leaf("x", "a and b are different fields"),
            ConflictReason::new(
                "deepField",
                ConflictReasonMessage::Nested(vec![leaf("y", "they have differing arguments")]),
            ),
        ]);
        assert_eq!(
            fields_conflict_message("field", &reason),
            concat!(
                r#"Fields "field" conflict because subfields "x" conflict because a and b are different fields"#,
                r#" and subfields "deepField" conflict because subfields "y" conflict because they have differing arguments."#,
            )
        );
    }
}
