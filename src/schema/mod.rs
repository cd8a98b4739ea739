use std::{
    collections::{HashMap, HashSet},
    sync::OnceLock,
};

use derive_builder::Builder;
use serde_json::Value as JsonValue;
use smol_str::SmolStr;
use squalid::{OptionExt, _d};
use tracing::{debug, instrument, trace};

use crate::{
    DirectiveDef, Error, IndexMap, ObjectType, OperationType, Result, Type, TypeFull,
    TypeInterface, builtin_directives, builtin_types,
};

mod invariants;
mod validation;

pub use validation::{
    OverlappingFieldsValidator, ValidatedRequest, ValidationRequestOrErrors,
    validate_overlapping_fields,
};

#[derive(Builder)]
#[builder(
    name = "SchemaBuilder",
    pattern = "owned",
    build_fn(private, name = "build_config", error = "Error")
)]
pub struct SchemaConfig {
    #[builder(setter(into, strip_option), default)]
    pub query: Option<SmolStr>,
    #[builder(setter(into, strip_option), default)]
    pub mutation: Option<SmolStr>,
    #[builder(setter(custom), default)]
    pub types: Vec<Type>,
    #[builder(setter(custom), default)]
    pub directives: Vec<DirectiveDef>,
}

impl SchemaBuilder {
    pub fn types(self, types: impl IntoIterator<Item = Type>) -> Self {
        let mut new = self;
        new.types = Some(types.into_iter().collect());
        new
    }

    /// Directives in addition to the built-in `@include`/`@skip`.
    pub fn directives(self, directives: impl IntoIterator<Item = DirectiveDef>) -> Self {
        let mut new = self;
        new.directives = Some(directives.into_iter().collect());
        new
    }

    pub fn build(self) -> Result<Schema> {
        Schema::try_new(self.build_config()?)
    }
}

/// The finalized registry of named types and directives.
///
/// Finalization forces every deferred definition and checks the type
/// system invariants, so a constructed `Schema` only ever hands out
/// references that resolve.
#[derive(Debug)]
pub struct Schema {
    types: IndexMap<SmolStr, Type>,
    query_type_name: SmolStr,
    mutation_type_name: Option<SmolStr>,
    directives: IndexMap<SmolStr, DirectiveDef>,
    implementations: HashMap<SmolStr, Vec<SmolStr>>,
    possible_type_sets: HashMap<SmolStr, OnceLock<HashSet<SmolStr>>>,
}

impl Schema {
    #[instrument(level = "debug", skip(config))]
    pub fn try_new(config: SchemaConfig) -> Result<Self> {
        let SchemaConfig {
            query,
            mutation,
            types: declared_types,
            directives: declared_directives,
        } = config;
        let query_type_name = query.ok_or(Error::NoQueryTypeSpecified)?;

        let mut types: IndexMap<SmolStr, Type> = _d();
        for type_ in builtin_types().into_iter().chain(declared_types) {
            let name: SmolStr = type_.name().into();
            if types.contains_key(&name) {
                return Err(Error::DuplicateTypeName(name));
            }
            types.insert(name, type_);
        }

        let mut directives: IndexMap<SmolStr, DirectiveDef> = _d();
        for directive in builtin_directives().into_iter().chain(declared_directives) {
            if directives.contains_key(&directive.name) {
                return Err(Error::DuplicateDirectiveName(directive.name));
            }
            directives.insert(directive.name.clone(), directive);
        }

        let mut schema = Self {
            types,
            query_type_name,
            mutation_type_name: mutation,
            directives,
            implementations: _d(),
            possible_type_sets: _d(),
        };
        schema.check_root_types()?;
        schema.check_types()?;
        schema.check_directives()?;

        schema.implementations = schema.collect_implementations();
        schema.possible_type_sets = schema
            .types
            .values()
            .filter(|type_| type_.is_abstract_type())
            .map(|type_| (type_.name().into(), OnceLock::new()))
            .collect();

        debug!(
            types = schema.types.len(),
            directives = schema.directives.len(),
            "finalized schema"
        );
        Ok(schema)
    }

    fn collect_implementations(&self) -> HashMap<SmolStr, Vec<SmolStr>> {
        let mut implementations: HashMap<SmolStr, Vec<SmolStr>> = _d();
        for object_type in self.types.values().filter_map(Type::maybe_as_object) {
            for interface in object_type.interfaces() {
                implementations
                    .entry(interface.clone())
                    .or_default()
                    .push(object_type.name.clone());
            }
        }
        implementations
    }

    pub fn types(&self) -> &IndexMap<SmolStr, Type> {
        &self.types
    }

    pub fn maybe_type(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    pub fn type_(&self, name: &str) -> &Type {
        self.maybe_type(name)
            .expect_else(|| format!("Unknown type: {name}"))
    }

    pub fn query_type(&self) -> &ObjectType {
        self.type_(&self.query_type_name).as_object()
    }

    pub fn mutation_type(&self) -> Option<&ObjectType> {
        self.mutation_type_name
            .as_ref()
            .map(|name| self.type_(name).as_object())
    }

    pub fn root_type(&self, operation_type: OperationType) -> Option<&Type> {
        match operation_type {
            OperationType::Query => Some(&self.query_type_name),
            OperationType::Mutation => self.mutation_type_name.as_ref(),
            OperationType::Subscription => None,
        }
        .map(|name| self.type_(name))
    }

    pub fn directives(&self) -> &IndexMap<SmolStr, DirectiveDef> {
        &self.directives
    }

    pub fn maybe_directive(&self, name: &str) -> Option<&DirectiveDef> {
        self.directives.get(name)
    }

    /// Resolves the innermost named type of a type reference.
    pub fn named_type(&self, type_: &TypeFull) -> Option<&Type> {
        self.maybe_type(type_.name())
    }

    pub fn is_input_type(&self, type_: &TypeFull) -> bool {
        self.named_type(type_).is_some_and(Type::is_input_type)
    }

    pub fn is_output_type(&self, type_: &TypeFull) -> bool {
        self.named_type(type_).is_some_and(Type::is_output_type)
    }

    pub fn is_leaf_type(&self, type_: &TypeFull) -> bool {
        self.named_type(type_).is_some_and(Type::is_leaf_type)
    }

    pub fn is_composite_type(&self, type_: &TypeFull) -> bool {
        self.named_type(type_).is_some_and(Type::is_composite_type)
    }

    pub fn is_abstract_type(&self, type_: &TypeFull) -> bool {
        self.named_type(type_).is_some_and(Type::is_abstract_type)
    }

    /// Names of the object types declaring that they implement the given
    /// interface, in declaration order.
    pub fn implementations(&self, interface_name: &str) -> &[SmolStr] {
        self.implementations
            .get(interface_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn possible_type_names(&self, abstract_type_name: &str) -> &[SmolStr] {
        match self.maybe_type(abstract_type_name) {
            Some(Type::Union(union)) => union.types(),
            Some(Type::Interface(_)) => self.implementations(abstract_type_name),
            _ => &[],
        }
    }

    pub fn possible_types(&self, abstract_type_name: &str) -> Vec<&ObjectType> {
        self.possible_type_names(abstract_type_name)
            .iter()
            .map(|name| self.type_(name).as_object())
            .collect()
    }

    pub fn is_possible_type(&self, abstract_type_name: &str, object_type_name: &str) -> bool {
        self.possible_type_sets
            .get(abstract_type_name)
            .is_some_and(|possible_type_set| {
                possible_type_set
                    .get_or_init(|| {
                        trace!(abstract_type_name, "building possible type set");
                        self.possible_type_names(abstract_type_name)
                            .iter()
                            .cloned()
                            .collect()
                    })
                    .contains(object_type_name)
            })
    }

    /// Picks the concrete object type of a runtime value of an abstract
    /// type: the abstract type's own resolver if it has one, otherwise the
    /// first possible type whose `is_type_of` accepts the value.
    pub fn resolve_abstract_type(
        &self,
        abstract_type_name: &str,
        value: &JsonValue,
    ) -> Option<&ObjectType> {
        let resolve_type = match self.type_(abstract_type_name) {
            Type::Interface(interface) => interface.resolve_type.as_ref(),
            Type::Union(union) => union.resolve_type.as_ref(),
            type_ => panic!("expected abstract type, got `{}`", type_.name()),
        };
        match resolve_type {
            Some(resolve_type) => resolve_type(value)
                .and_then(|name| self.maybe_type(&name))
                .and_then(Type::maybe_as_object),
            None => self
                .possible_types(abstract_type_name)
                .into_iter()
                .find(|object_type| object_type.is_type_of(value)),
        }
    }
}
