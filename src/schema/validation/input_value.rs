use serde_json::{Map, Value as JsonValue};
use tracing::{instrument, trace};

use crate::{OperationDefinition, Schema, Type, TypeFull};

static NULL: JsonValue = JsonValue::Null;

impl Schema {
    /// Checks a runtime value, eg a variable supplied with a request,
    /// against an input type. An empty result means the value is valid.
    ///
    /// Panics if `type_` names a type that isn't an input type.
    #[instrument(level = "trace", skip_all, fields(type_ = %type_))]
    pub fn validate_input_value(&self, value: &JsonValue, type_: &TypeFull) -> Vec<String> {
        input_value_errors(self, value, type_)
    }

    /// Checks the supplied variables of an operation against the declared
    /// variable types, one message per offending variable.
    #[instrument(level = "trace", skip_all, fields(operation = ?operation.name))]
    pub fn validate_variable_values(
        &self,
        operation: &OperationDefinition,
        variables: &Map<String, JsonValue>,
    ) -> Vec<String> {
        operation
            .variable_definitions
            .iter()
            .filter_map(|variable_definition| {
                let name = &variable_definition.name;
                let type_ = &variable_definition.type_;
                if !self.is_input_type(type_) {
                    return Some(format!(
                        "Variable \"${name}\" expected value of type \"{type_}\" which cannot be used as an input type."
                    ));
                }
                let has_default = variable_definition.default_value.is_some();
                let Some(value) = variables.get(name.as_str()) else {
                    if has_default || !matches!(type_, TypeFull::NonNull(_)) {
                        return None;
                    }
                    trace!(%name, "missing required variable");
                    return Some(format!(
                        "Variable \"${name}\" of required type \"{type_}\" was not provided."
                    ));
                };
                if value.is_null() && has_default {
                    return None;
                }
                let errors = input_value_errors(self, value, type_);
                if errors.is_empty() {
                    return None;
                }
                trace!(%name, count = errors.len(), "invalid variable value");
                Some(format!(
                    "Variable \"${name}\" got invalid value {value}.{}",
                    errors
                        .iter()
                        .map(|error| format!("\n{error}"))
                        .collect::<String>()
                ))
            })
            .collect()
    }
}

fn input_value_errors(schema: &Schema, value: &JsonValue, type_: &TypeFull) -> Vec<String> {
    if let TypeFull::NonNull(of) = type_ {
        if value.is_null() {
            return vec![match &**of {
                TypeFull::Type(name) => format!("Expected \"{name}!\", found null."),
                _ => "Expected non-null value, found null.".to_owned(),
            }];
        }
        return input_value_errors(schema, value, of);
    }

    if value.is_null() {
        return vec![];
    }

    match type_ {
        TypeFull::List(item_type) => match value {
            JsonValue::Array(items) => items
                .iter()
                .enumerate()
                .flat_map(|(index, item)| {
                    input_value_errors(schema, item, item_type)
                        .into_iter()
                        .map(move |error| format!("In element #{index}: {error}"))
                })
                .collect(),
            _ => input_value_errors(schema, value, item_type),
        },
        TypeFull::Type(name) => match schema.type_(name) {
            Type::InputObject(input_object) => {
                let JsonValue::Object(fields) = value else {
                    return vec![format!("Expected \"{name}\", found not an object.")];
                };
                let field_defs = input_object.fields();
                fields
                    .keys()
                    .filter(|field_name| !field_defs.contains_key(field_name.as_str()))
                    .map(|field_name| format!("In field \"{field_name}\": Unknown field."))
                    .chain(field_defs.values().flat_map(|field_def| {
                        input_value_errors(
                            schema,
                            fields.get(field_def.name.as_str()).unwrap_or(&NULL),
                            &field_def.type_,
                        )
                        .into_iter()
                        .map(move |error| format!("In field \"{}\": {error}", field_def.name))
                    }))
                    .collect()
            }
            Type::Scalar(scalar) => leaf_errors(name, value, scalar.parse_value(value)),
            Type::Enum(enum_) => leaf_errors(name, value, enum_.parse_value(value)),
            _ => panic!("Must be input type, got `{name}`"),
        },
        TypeFull::NonNull(_) => unreachable!(),
    }
}

fn leaf_errors(name: &str, value: &JsonValue, parsed: Option<JsonValue>) -> Vec<String> {
    match parsed {
        None | Some(JsonValue::Null) => {
            vec![format!("Expected type \"{name}\", found {value}.")]
        }
        Some(_) => vec![],
    }
}
