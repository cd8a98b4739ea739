use std::{collections::HashMap, fmt};

use derive_builder::Builder;
use itertools::Itertools;
use serde_json::Value as JsonValue;
use smol_str::SmolStr;

use crate::{IndexMap, OperationType, TypeFull};

#[derive(Debug)]
pub struct Request {
    pub document: Document,
}

impl Request {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn chosen_operation(&self) -> &OperationDefinition {
        self.document.chosen_operation()
    }

    pub fn fragment(&self, name: &str) -> &FragmentDefinition {
        self.document.fragment(name)
    }
}

/// Resolves fragment spreads to their definitions.
pub trait FragmentLookup {
    fn maybe_fragment(&self, name: &str) -> Option<&FragmentDefinition>;
}

impl FragmentLookup for Request {
    fn maybe_fragment(&self, name: &str) -> Option<&FragmentDefinition> {
        self.document.maybe_fragment(name)
    }
}

#[derive(Debug)]
pub struct Document {
    pub definitions: Vec<ExecutableDefinition>,
    pub fragments_by_name: HashMap<SmolStr, usize>,
}

impl Document {
    pub fn new(definitions: Vec<ExecutableDefinition>) -> Self {
        let fragments_by_name = definitions
            .iter()
            .enumerate()
            .filter_map(|(index, definition)| match definition {
                ExecutableDefinition::Fragment(fragment) => Some((fragment.name.clone(), index)),
                _ => None,
            })
            .collect();
        Self {
            definitions,
            fragments_by_name,
        }
    }

    pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.definitions
            .iter()
            .filter_map(ExecutableDefinition::maybe_as_operation_definition)
    }

    pub fn chosen_operation(&self) -> &OperationDefinition {
        self.operations()
            .next()
            .expect("document has no operation definition")
    }

    pub fn fragment(&self, name: &str) -> &FragmentDefinition {
        self.maybe_fragment(name)
            .unwrap_or_else(|| panic!("unknown fragment `{name}`"))
    }
}

impl FragmentLookup for Document {
    fn maybe_fragment(&self, name: &str) -> Option<&FragmentDefinition> {
        self.fragments_by_name
            .get(name)
            .map(|&index| self.definitions[index].as_fragment_definition())
    }
}

#[derive(Debug)]
pub enum ExecutableDefinition {
    Operation(OperationDefinition),
    Fragment(FragmentDefinition),
}

impl ExecutableDefinition {
    pub fn maybe_as_operation_definition(&self) -> Option<&OperationDefinition> {
        match self {
            Self::Operation(operation_definition) => Some(operation_definition),
            _ => None,
        }
    }

    pub fn maybe_as_fragment_definition(&self) -> Option<&FragmentDefinition> {
        match self {
            Self::Fragment(fragment_definition) => Some(fragment_definition),
            _ => None,
        }
    }

    pub fn as_fragment_definition(&self) -> &FragmentDefinition {
        self.maybe_as_fragment_definition()
            .expect("expected fragment")
    }
}

impl From<OperationDefinition> for ExecutableDefinition {
    fn from(value: OperationDefinition) -> Self {
        Self::Operation(value)
    }
}

impl From<FragmentDefinition> for ExecutableDefinition {
    fn from(value: FragmentDefinition) -> Self {
        Self::Fragment(value)
    }
}

#[derive(Builder, Debug)]
#[builder(pattern = "owned")]
pub struct OperationDefinition {
    pub operation_type: OperationType,
    #[builder(setter(into, strip_option), default)]
    pub name: Option<SmolStr>,
    #[builder(default)]
    pub variable_definitions: Vec<VariableDefinition>,
    pub selection_set: Vec<Selection>,
    #[builder(default)]
    pub directives: Vec<Directive>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableDefinition {
    pub name: SmolStr,
    pub type_: TypeFull,
    pub default_value: Option<Value>,
}

impl VariableDefinition {
    pub fn new(name: impl Into<SmolStr>, type_: TypeFull, default_value: Option<Value>) -> Self {
        Self {
            name: name.into(),
            type_,
            default_value,
        }
    }
}

#[derive(Debug)]
pub struct FragmentDefinition {
    pub name: SmolStr,
    pub on: SmolStr,
    pub selection_set: Vec<Selection>,
    pub directives: Vec<Directive>,
}

impl FragmentDefinition {
    pub fn new(
        name: SmolStr,
        on: SmolStr,
        directives: Vec<Directive>,
        selection_set: Vec<Selection>,
    ) -> Self {
        Self {
            name,
            on,
            selection_set,
            directives,
        }
    }
}

#[derive(Debug)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

impl Selection {
    pub fn as_field(&self) -> &Field {
        match self {
            Self::Field(field) => field,
            _ => panic!("Expected field"),
        }
    }
}

impl From<Field> for Selection {
    fn from(value: Field) -> Self {
        Self::Field(value)
    }
}

impl From<FragmentSpread> for Selection {
    fn from(value: FragmentSpread) -> Self {
        Self::FragmentSpread(value)
    }
}

impl From<InlineFragment> for Selection {
    fn from(value: InlineFragment) -> Self {
        Self::InlineFragment(value)
    }
}

#[derive(Builder, Debug)]
#[builder(pattern = "owned")]
pub struct Field {
    #[builder(setter(into, strip_option), default)]
    pub alias: Option<SmolStr>,
    #[builder(setter(into))]
    pub name: SmolStr,
    #[builder(setter(strip_option), default)]
    pub selection_set: Option<Vec<Selection>>,
    #[builder(setter(custom), default)]
    pub arguments: Option<Vec<Argument>>,
    #[builder(default)]
    pub directives: Vec<Directive>,
}

impl FieldBuilder {
    pub fn arguments(self, arguments: impl IntoIterator<Item = Argument>) -> Self {
        let mut new = self;
        new.arguments = Some(Some(arguments.into_iter().collect()));
        new
    }
}

impl Field {
    /// The key this field is written under in the response: the alias if
    /// present, otherwise the field name.
    pub fn response_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn arguments(&self) -> &[Argument] {
        self.arguments.as_deref().unwrap_or_default()
    }
}

#[derive(Debug)]
pub struct FragmentSpread {
    pub name: SmolStr,
    pub directives: Vec<Directive>,
}

impl FragmentSpread {
    pub fn new(name: SmolStr, directives: Vec<Directive>) -> Self {
        Self { name, directives }
    }
}

#[derive(Debug)]
pub struct InlineFragment {
    pub on: Option<SmolStr>,
    pub selection_set: Vec<Selection>,
    pub directives: Vec<Directive>,
}

impl InlineFragment {
    pub fn new(
        on: Option<SmolStr>,
        directives: Vec<Directive>,
        selection_set: Vec<Selection>,
    ) -> Self {
        Self {
            on,
            selection_set,
            directives,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub name: SmolStr,
    pub value: Value,
}

impl Argument {
    pub fn new(name: SmolStr, value: Value) -> Self {
        Self { name, value }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f64),
    String(SmolStr),
    Null,
    Bool(bool),
    EnumVariant(SmolStr),
    Variable(SmolStr),
    List(Vec<Value>),
    Object(IndexMap<SmolStr, Value>),
}

/// Prints the canonical source form, eg `{a: [1, "x"], b: $var}`. Two
/// literals are considered equal iff they print identically.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
            Self::String(value) => write!(f, "{}", JsonValue::from(value.as_str())),
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::EnumVariant(value) => f.write_str(value),
            Self::Variable(name) => write!(f, "${name}"),
            Self::List(values) => write!(f, "[{}]", values.iter().join(", ")),
            Self::Object(fields) => write!(
                f,
                "{{{}}}",
                fields
                    .iter()
                    .map(|(name, value)| format!("{name}: {value}"))
                    .join(", ")
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    pub name: SmolStr,
    pub arguments: Option<Vec<Argument>>,
}

impl Directive {
    pub fn new(name: SmolStr, arguments: Option<Vec<Argument>>) -> Self {
        Self { name, arguments }
    }

    pub fn arguments(&self) -> &[Argument] {
        self.arguments.as_deref().unwrap_or_default()
    }
}
