use std::fmt;

use derive_builder::Builder;
use serde_json::Value as JsonValue;
use smol_str::SmolStr;

use crate::{Error, Result, Type, Value, assert_valid_name};

pub type Serialize = Box<dyn Fn(&JsonValue) -> JsonValue + Send + Sync>;
pub type ParseValue = Box<dyn Fn(&JsonValue) -> Option<JsonValue> + Send + Sync>;
pub type ParseLiteral = Box<dyn Fn(&Value) -> Option<JsonValue> + Send + Sync>;

/// A leaf type with custom coercion.
///
/// A scalar without `parse_value`/`parse_literal` is output-only: it never
/// accepts an input value.
#[derive(Builder)]
#[builder(
    pattern = "owned",
    build_fn(validate = "Self::validate", error = "Error")
)]
pub struct ScalarType {
    #[builder(setter(into))]
    pub name: SmolStr,
    #[builder(setter(into, strip_option), default)]
    pub description: Option<SmolStr>,
    #[builder(setter(custom))]
    serializer: Serialize,
    #[builder(setter(custom), default)]
    value_parser: Option<ParseValue>,
    #[builder(setter(custom), default)]
    literal_parser: Option<ParseLiteral>,
}

impl ScalarTypeBuilder {
    pub fn serialize(
        self,
        serialize: impl Fn(&JsonValue) -> JsonValue + Send + Sync + 'static,
    ) -> Self {
        let mut new = self;
        new.serializer = Some(Box::new(serialize));
        new
    }

    pub fn parse_value(
        self,
        parse_value: impl Fn(&JsonValue) -> Option<JsonValue> + Send + Sync + 'static,
    ) -> Self {
        let mut new = self;
        new.value_parser = Some(Some(Box::new(parse_value)));
        new
    }

    pub fn parse_literal(
        self,
        parse_literal: impl Fn(&Value) -> Option<JsonValue> + Send + Sync + 'static,
    ) -> Self {
        let mut new = self;
        new.literal_parser = Some(Some(Box::new(parse_literal)));
        new
    }

    fn validate(&self) -> Result<()> {
        let Some(name) = self.name.as_ref() else {
            return Ok(());
        };
        assert_valid_name(name)?;
        let has_value_parser = self.value_parser.as_ref().is_some_and(Option::is_some);
        let has_literal_parser = self.literal_parser.as_ref().is_some_and(Option::is_some);
        if has_value_parser != has_literal_parser {
            return Err(Error::PartialScalarParsers(name.clone()));
        }
        Ok(())
    }
}

impl ScalarType {
    fn new_builtin(
        name: &str,
        description: &str,
        serialize: impl Fn(&JsonValue) -> JsonValue + Send + Sync + 'static,
        parse_value: impl Fn(&JsonValue) -> Option<JsonValue> + Send + Sync + 'static,
        parse_literal: impl Fn(&Value) -> Option<JsonValue> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            serializer: Box::new(serialize),
            value_parser: Some(Box::new(parse_value)),
            literal_parser: Some(Box::new(parse_literal)),
        }
    }

    pub fn serialize(&self, value: &JsonValue) -> JsonValue {
        (self.serializer)(value)
    }

    pub fn is_input_capable(&self) -> bool {
        self.value_parser.is_some()
    }

    pub fn parse_value(&self, value: &JsonValue) -> Option<JsonValue> {
        self.value_parser
            .as_ref()
            .and_then(|parse_value| parse_value(value))
    }

    pub fn parse_literal(&self, value: &Value) -> Option<JsonValue> {
        self.literal_parser
            .as_ref()
            .and_then(|parse_literal| parse_literal(value))
    }
}

impl fmt::Debug for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn as_int(value: &JsonValue) -> Option<i32> {
    if let Some(value) = value.as_i64() {
        return i32::try_from(value).ok();
    }
    let value = value.as_f64()?;
    (value.fract() == 0.0 && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX))
        .then_some(value as i32)
}

fn coerce_int(value: &JsonValue) -> JsonValue {
    let coerced = match value {
        JsonValue::Bool(value) => Some(i32::from(*value)),
        JsonValue::String(value) => value.parse::<f64>().ok().and_then(|value| {
            (value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX))
                .then_some(value.trunc() as i32)
        }),
        JsonValue::Number(number) => number.as_f64().and_then(|value| {
            (value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX))
                .then_some(value.trunc() as i32)
        }),
        _ => None,
    };
    coerced.map_or(JsonValue::Null, Into::into)
}

fn coerce_float(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Number(_) => value.clone(),
        JsonValue::Bool(value) => f64::from(u8::from(*value)).into(),
        JsonValue::String(value) => value
            .parse::<f64>()
            .ok()
            .map_or(JsonValue::Null, Into::into),
        _ => JsonValue::Null,
    }
}

fn coerce_string(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::String(_) => value.clone(),
        JsonValue::Number(value) => value.to_string().into(),
        JsonValue::Bool(value) => value.to_string().into(),
        _ => JsonValue::Null,
    }
}

fn coerce_boolean(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Bool(_) => value.clone(),
        JsonValue::Number(value) => (value.as_f64() != Some(0.0)).into(),
        JsonValue::String(value) => (!value.is_empty()).into(),
        _ => JsonValue::Null,
    }
}

pub fn int_type() -> Type {
    Type::Scalar(ScalarType::new_builtin(
        "Int",
        "The `Int` scalar type represents non-fractional signed whole numeric values between -2^31 and 2^31 - 1.",
        coerce_int,
        |value| as_int(value).map(Into::into),
        |value| match value {
            Value::Int(value) => Some((*value).into()),
            _ => None,
        },
    ))
}

pub fn float_type() -> Type {
    Type::Scalar(ScalarType::new_builtin(
        "Float",
        "The `Float` scalar type represents signed double-precision fractional values.",
        coerce_float,
        |value| value.is_number().then(|| value.clone()),
        |value| match value {
            Value::Int(value) => Some((*value).into()),
            Value::Float(value) => Some((*value).into()),
            _ => None,
        },
    ))
}

pub fn string_type() -> Type {
    Type::Scalar(ScalarType::new_builtin(
        "String",
        "The `String` scalar type represents textual data, represented as UTF-8 character sequences.",
        coerce_string,
        |value| value.is_string().then(|| value.clone()),
        |value| match value {
            Value::String(value) => Some(value.as_str().into()),
            _ => None,
        },
    ))
}

pub fn boolean_type() -> Type {
    Type::Scalar(ScalarType::new_builtin(
        "Boolean",
        "The `Boolean` scalar type represents `true` or `false`.",
        coerce_boolean,
        |value| value.is_boolean().then(|| value.clone()),
        |value| match value {
            Value::Bool(value) => Some((*value).into()),
            _ => None,
        },
    ))
}

pub fn id_type() -> Type {
    Type::Scalar(ScalarType::new_builtin(
        "ID",
        "The `ID` scalar type represents a unique identifier.",
        coerce_string,
        |value| match value {
            JsonValue::String(_) => Some(value.clone()),
            JsonValue::Number(_) => as_int(value).map(|value| value.to_string().into()),
            _ => None,
        },
        |value| match value {
            Value::String(value) => Some(value.as_str().into()),
            Value::Int(value) => Some(value.to_string().into()),
            _ => None,
        },
    ))
}

pub fn builtin_types() -> Vec<Type> {
    vec![
        int_type(),
        float_type(),
        string_type(),
        boolean_type(),
        id_type(),
    ]
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn scalar(type_: &Type) -> &ScalarType {
        type_.maybe_as_scalar().unwrap()
    }

    #[test]
    fn test_int_parse_value() {
        let type_ = int_type();
        let int = scalar(&type_);
        assert_eq!(int.parse_value(&json!(3)), Some(json!(3)));
        assert_eq!(int.parse_value(&json!(3.0)), Some(json!(3)));
        assert_eq!(int.parse_value(&json!(3.5)), None);
        assert_eq!(int.parse_value(&json!(2_147_483_648_i64)), None);
        assert_eq!(int.parse_value(&json!("3")), None);
        assert_eq!(int.parse_value(&json!(true)), None);
    }

    #[test]
    fn test_int_serialize() {
        let type_ = int_type();
        let int = scalar(&type_);
        assert_eq!(int.serialize(&json!(3.7)), json!(3));
        assert_eq!(int.serialize(&json!("12")), json!(12));
        assert_eq!(int.serialize(&json!(false)), json!(0));
        assert_eq!(int.serialize(&json!("abc")), JsonValue::Null);
    }

    #[test]
    fn test_float() {
        let type_ = float_type();
        let float = scalar(&type_);
        assert_eq!(float.parse_value(&json!(1.5)), Some(json!(1.5)));
        assert_eq!(float.parse_value(&json!("1.5")), None);
        assert_eq!(float.parse_literal(&Value::Int(2)), Some(json!(2)));
        assert_eq!(float.parse_literal(&Value::Float(2.5)), Some(json!(2.5)));
    }

    #[test]
    fn test_string_and_boolean() {
        let string_type = string_type();
        let string = scalar(&string_type);
        assert_eq!(string.parse_value(&json!("a")), Some(json!("a")));
        assert_eq!(string.parse_value(&json!(1)), None);
        assert_eq!(string.serialize(&json!(1)), json!("1"));
        assert_eq!(
            string.parse_literal(&Value::String("a".into())),
            Some(json!("a"))
        );
        assert_eq!(string.parse_literal(&Value::EnumVariant("A".into())), None);

        let boolean_type = boolean_type();
        let boolean = scalar(&boolean_type);
        assert_eq!(boolean.parse_value(&json!(false)), Some(json!(false)));
        assert_eq!(boolean.parse_value(&json!(0)), None);
        assert_eq!(boolean.serialize(&json!(0)), json!(false));
    }

    #[test]
    fn test_id() {
        let type_ = id_type();
        let id = scalar(&type_);
        assert_eq!(id.parse_value(&json!("abc")), Some(json!("abc")));
        assert_eq!(id.parse_value(&json!(12)), Some(json!("12")));
        assert_eq!(id.parse_value(&json!(1.5)), None);
        assert_eq!(id.parse_literal(&Value::Int(7)), Some(json!("7")));
    }

    #[test]
    fn test_parsers_both_or_neither() {
        assert!(matches!(
            ScalarTypeBuilder::default()
                .name("Odd")
                .serialize(|value| value.clone())
                .parse_value(|value| Some(value.clone()))
                .build(),
            Err(Error::PartialScalarParsers(name)) if name == "Odd"
        ));
        let output_only = ScalarTypeBuilder::default()
            .name("Opaque")
            .serialize(|value| value.clone())
            .build()
            .unwrap();
        assert!(!output_only.is_input_capable());
        assert_eq!(output_only.parse_value(&json!(1)), None);
    }

    #[test]
    fn test_serialize_required() {
        assert!(matches!(
            ScalarTypeBuilder::default().name("Odd").build(),
            Err(Error::UninitializedField(_))
        ));
    }
}
