use std::{collections::HashMap, sync::OnceLock};

use derive_builder::Builder;
use itertools::Itertools;
use serde_json::Value as JsonValue;
use smol_str::SmolStr;
use squalid::_d;
use strum::{Display, EnumDiscriminants};

use crate::{Error, IndexMap, Result, Value};

mod scalars;
mod thunk;
mod type_full;

pub use scalars::{
    ScalarType, ScalarTypeBuilder, boolean_type, builtin_types, float_type, id_type, int_type,
    string_type,
};
pub use thunk::Thunk;
pub use type_full::TypeFull;

pub type IsTypeOf = Box<dyn Fn(&JsonValue) -> bool + Send + Sync>;
pub type ResolveType = Box<dyn Fn(&JsonValue) -> Option<SmolStr> + Send + Sync>;

#[derive(Debug, EnumDiscriminants)]
#[strum_discriminants(name(TypeKind), derive(Display))]
pub enum Type {
    Scalar(ScalarType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

impl Type {
    pub fn kind(&self) -> TypeKind {
        self.into()
    }

    pub fn is_input_type(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_) | Self::InputObject(_))
    }

    pub fn is_output_type(&self) -> bool {
        !matches!(self, Self::InputObject(_))
    }

    pub fn is_leaf_type(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_))
    }

    pub fn is_composite_type(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Interface(_) | Self::Union(_))
    }

    pub fn is_abstract_type(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::Union(_))
    }

    /// The field map of an object or interface type.
    pub fn maybe_fields(&self) -> Option<&IndexMap<SmolStr, FieldDef>> {
        match self {
            Self::Object(type_) => Some(type_.fields()),
            Self::Interface(type_) => Some(type_.fields()),
            _ => None,
        }
    }

    pub fn maybe_field(&self, name: &str) -> Option<&FieldDef> {
        self.maybe_fields()?.get(name)
    }

    pub fn maybe_as_object(&self) -> Option<&ObjectType> {
        match self {
            Self::Object(type_) => Some(type_),
            _ => None,
        }
    }

    pub fn as_object(&self) -> &ObjectType {
        self.maybe_as_object()
            .unwrap_or_else(|| panic!("expected object type, got `{}`", self.name()))
    }

    pub fn maybe_as_interface(&self) -> Option<&InterfaceType> {
        match self {
            Self::Interface(type_) => Some(type_),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> &InterfaceType {
        self.maybe_as_interface()
            .unwrap_or_else(|| panic!("expected interface type, got `{}`", self.name()))
    }

    pub fn maybe_as_union(&self) -> Option<&UnionType> {
        match self {
            Self::Union(type_) => Some(type_),
            _ => None,
        }
    }

    pub fn maybe_as_enum(&self) -> Option<&EnumType> {
        match self {
            Self::Enum(type_) => Some(type_),
            _ => None,
        }
    }

    pub fn maybe_as_scalar(&self) -> Option<&ScalarType> {
        match self {
            Self::Scalar(type_) => Some(type_),
            _ => None,
        }
    }

    pub fn maybe_as_input_object(&self) -> Option<&InputObjectType> {
        match self {
            Self::InputObject(type_) => Some(type_),
            _ => None,
        }
    }
}

pub trait TypeInterface {
    fn name(&self) -> &str;
    fn description(&self) -> Option<&str>;
}

impl TypeInterface for Type {
    fn name(&self) -> &str {
        match self {
            Self::Scalar(type_) => type_.name(),
            Self::Object(type_) => type_.name(),
            Self::Interface(type_) => type_.name(),
            Self::Union(type_) => type_.name(),
            Self::Enum(type_) => type_.name(),
            Self::InputObject(type_) => type_.name(),
        }
    }

    fn description(&self) -> Option<&str> {
        match self {
            Self::Scalar(type_) => type_.description(),
            Self::Object(type_) => type_.description(),
            Self::Interface(type_) => type_.description(),
            Self::Union(type_) => type_.description(),
            Self::Enum(type_) => type_.description(),
            Self::InputObject(type_) => type_.description(),
        }
    }
}

macro_rules! impl_type_interface {
    ($($type_:ty => $variant:ident),* $(,)?) => {
        $(
            impl TypeInterface for $type_ {
                fn name(&self) -> &str {
                    &self.name
                }

                fn description(&self) -> Option<&str> {
                    self.description.as_deref()
                }
            }

            impl From<$type_> for Type {
                fn from(value: $type_) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_type_interface!(
    ScalarType => Scalar,
    ObjectType => Object,
    InterfaceType => Interface,
    UnionType => Union,
    EnumType => Enum,
    InputObjectType => InputObject,
);

pub fn assert_valid_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let is_valid = chars
        .next()
        .is_some_and(|ch| matches!(ch, 'A'..='Z' | 'a'..='z' | '_'))
        && chars.all(|ch| matches!(ch, 'A'..='Z' | 'a'..='z' | '0'..='9' | '_'));
    if !is_valid {
        return Err(Error::InvalidName(name.into()));
    }
    Ok(())
}

pub(crate) fn field_map<TField>(
    fields: impl IntoIterator<Item = TField>,
    name: impl Fn(&TField) -> &SmolStr,
) -> IndexMap<SmolStr, TField> {
    fields
        .into_iter()
        .map(|field| (name(&field).clone(), field))
        .collect()
}

pub(crate) fn check_unique_names<'a>(
    owner: &SmolStr,
    names: impl IntoIterator<Item = &'a SmolStr>,
) -> Result<()> {
    match names.into_iter().duplicates().next() {
        Some(name) => Err(Error::DuplicateName {
            owner: owner.clone(),
            name: name.clone(),
        }),
        None => Ok(()),
    }
}

/// Fields keyed by name. A repeated name is remembered rather than
/// overwriting, so that the owning type fails once its fields are known.
#[derive(Debug)]
struct NamedFields<TField> {
    by_name: IndexMap<SmolStr, TField>,
    duplicate_name: Option<SmolStr>,
}

impl<TField> NamedFields<TField> {
    fn new(fields: impl IntoIterator<Item = TField>, name: impl Fn(&TField) -> &SmolStr) -> Self {
        let mut by_name: IndexMap<SmolStr, TField> = _d();
        let mut duplicate_name = None;
        for field in fields {
            let field_name = name(&field).clone();
            if by_name.contains_key(&field_name) {
                duplicate_name.get_or_insert(field_name);
                continue;
            }
            by_name.insert(field_name, field);
        }
        Self {
            by_name,
            duplicate_name,
        }
    }

    fn check_unique(&self, type_name: &SmolStr) -> Result<()> {
        match self.duplicate_name.as_ref() {
            Some(name) => Err(Error::DuplicateName {
                owner: type_name.clone(),
                name: name.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn validate_ready_fields<TField>(
    type_name: Option<&SmolStr>,
    fields: Option<&Thunk<NamedFields<TField>>>,
) -> Result<()> {
    let Some(type_name) = type_name else {
        return Ok(());
    };
    assert_valid_name(type_name)?;
    let Some(fields) = fields.filter(|fields| fields.is_forced()) else {
        return Ok(());
    };
    if fields.get().by_name.is_empty() {
        return Err(Error::EmptyFields(type_name.clone()));
    }
    fields.get().check_unique(type_name)
}

#[derive(Builder)]
#[builder(
    pattern = "owned",
    build_fn(validate = "Self::validate", error = "Error")
)]
pub struct ObjectType {
    #[builder(setter(into))]
    pub name: SmolStr,
    #[builder(setter(into, strip_option), default)]
    pub description: Option<SmolStr>,
    #[builder(setter(custom))]
    fields: Thunk<NamedFields<FieldDef>>,
    #[builder(setter(custom), default)]
    interfaces: Thunk<Vec<SmolStr>>,
    #[builder(setter(custom), default)]
    pub(crate) is_type_of: Option<IsTypeOf>,
}

impl ObjectTypeBuilder {
    pub fn fields(self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        let mut new = self;
        new.fields = Some(Thunk::ready(NamedFields::new(fields, |field| &field.name)));
        new
    }

    pub fn deferred_fields(self, fields: impl Fn() -> Vec<FieldDef> + Send + Sync + 'static) -> Self {
        let mut new = self;
        new.fields = Some(Thunk::deferred(move || {
            NamedFields::new(fields(), |field| &field.name)
        }));
        new
    }

    pub fn interfaces(self, interfaces: impl IntoIterator<Item = impl Into<SmolStr>>) -> Self {
        let mut new = self;
        new.interfaces = Some(Thunk::ready(
            interfaces.into_iter().map(Into::into).collect(),
        ));
        new
    }

    pub fn deferred_interfaces(
        self,
        interfaces: impl Fn() -> Vec<SmolStr> + Send + Sync + 'static,
    ) -> Self {
        let mut new = self;
        new.interfaces = Some(Thunk::deferred(interfaces));
        new
    }

    pub fn is_type_of(self, is_type_of: impl Fn(&JsonValue) -> bool + Send + Sync + 'static) -> Self {
        let mut new = self;
        new.is_type_of = Some(Some(Box::new(is_type_of)));
        new
    }

    fn validate(&self) -> Result<()> {
        validate_ready_fields(self.name.as_ref(), self.fields.as_ref())
    }
}

impl ObjectType {
    pub fn fields(&self) -> &IndexMap<SmolStr, FieldDef> {
        &self.fields.get().by_name
    }

    pub(crate) fn check_unique_field_names(&self) -> Result<()> {
        self.fields.get().check_unique(&self.name)
    }

    pub fn maybe_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields().get(name)
    }

    pub fn field(&self, name: &str) -> &FieldDef {
        self.maybe_field(name)
            .unwrap_or_else(|| panic!("no field `{name}` on type `{}`", self.name))
    }

    pub fn interfaces(&self) -> &[SmolStr] {
        self.interfaces.get()
    }

    pub fn has_is_type_of(&self) -> bool {
        self.is_type_of.is_some()
    }

    pub fn is_type_of(&self, value: &JsonValue) -> bool {
        self.is_type_of
            .as_ref()
            .is_some_and(|is_type_of| is_type_of(value))
    }
}

impl std::fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("interfaces", &self.interfaces)
            .finish_non_exhaustive()
    }
}

#[derive(Builder)]
#[builder(
    pattern = "owned",
    build_fn(validate = "Self::validate", error = "Error")
)]
pub struct InterfaceType {
    #[builder(setter(into))]
    pub name: SmolStr,
    #[builder(setter(into, strip_option), default)]
    pub description: Option<SmolStr>,
    #[builder(setter(custom))]
    fields: Thunk<NamedFields<FieldDef>>,
    #[builder(setter(custom), default)]
    pub(crate) resolve_type: Option<ResolveType>,
}

impl InterfaceTypeBuilder {
    pub fn fields(self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        let mut new = self;
        new.fields = Some(Thunk::ready(NamedFields::new(fields, |field| &field.name)));
        new
    }

    pub fn deferred_fields(self, fields: impl Fn() -> Vec<FieldDef> + Send + Sync + 'static) -> Self {
        let mut new = self;
        new.fields = Some(Thunk::deferred(move || {
            NamedFields::new(fields(), |field| &field.name)
        }));
        new
    }

    pub fn resolve_type(
        self,
        resolve_type: impl Fn(&JsonValue) -> Option<SmolStr> + Send + Sync + 'static,
    ) -> Self {
        let mut new = self;
        new.resolve_type = Some(Some(Box::new(resolve_type)));
        new
    }

    fn validate(&self) -> Result<()> {
        validate_ready_fields(self.name.as_ref(), self.fields.as_ref())
    }
}

impl InterfaceType {
    pub fn fields(&self) -> &IndexMap<SmolStr, FieldDef> {
        &self.fields.get().by_name
    }

    pub(crate) fn check_unique_field_names(&self) -> Result<()> {
        self.fields.get().check_unique(&self.name)
    }

    pub fn maybe_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields().get(name)
    }

    pub fn field(&self, name: &str) -> &FieldDef {
        self.maybe_field(name)
            .unwrap_or_else(|| panic!("no field `{name}` on interface `{}`", self.name))
    }

    pub fn has_resolve_type(&self) -> bool {
        self.resolve_type.is_some()
    }
}

impl std::fmt::Debug for InterfaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterfaceType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

#[derive(Builder)]
#[builder(
    pattern = "owned",
    build_fn(validate = "Self::validate", error = "Error")
)]
pub struct UnionType {
    #[builder(setter(into))]
    pub name: SmolStr,
    #[builder(setter(into, strip_option), default)]
    pub description: Option<SmolStr>,
    #[builder(setter(custom))]
    types: Thunk<Vec<SmolStr>>,
    #[builder(setter(custom), default)]
    pub(crate) resolve_type: Option<ResolveType>,
}

impl UnionTypeBuilder {
    pub fn types(self, types: impl IntoIterator<Item = impl Into<SmolStr>>) -> Self {
        let mut new = self;
        new.types = Some(Thunk::ready(types.into_iter().map(Into::into).collect()));
        new
    }

    pub fn deferred_types(self, types: impl Fn() -> Vec<SmolStr> + Send + Sync + 'static) -> Self {
        let mut new = self;
        new.types = Some(Thunk::deferred(types));
        new
    }

    pub fn resolve_type(
        self,
        resolve_type: impl Fn(&JsonValue) -> Option<SmolStr> + Send + Sync + 'static,
    ) -> Self {
        let mut new = self;
        new.resolve_type = Some(Some(Box::new(resolve_type)));
        new
    }

    fn validate(&self) -> Result<()> {
        let Some(name) = self.name.as_ref() else {
            return Ok(());
        };
        assert_valid_name(name)?;
        if self
            .types
            .as_ref()
            .is_some_and(|types| types.is_forced() && types.get().is_empty())
        {
            return Err(Error::EmptyUnion(name.clone()));
        }
        Ok(())
    }
}

impl UnionType {
    pub fn types(&self) -> &[SmolStr] {
        self.types.get()
    }

    pub fn has_resolve_type(&self) -> bool {
        self.resolve_type.is_some()
    }
}

impl std::fmt::Debug for UnionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnionType")
            .field("name", &self.name)
            .field("types", &self.types)
            .finish_non_exhaustive()
    }
}

#[derive(Builder, Debug)]
#[builder(
    pattern = "owned",
    build_fn(validate = "Self::validate", error = "Error")
)]
pub struct EnumType {
    #[builder(setter(into))]
    pub name: SmolStr,
    #[builder(setter(into, strip_option), default)]
    pub description: Option<SmolStr>,
    #[builder(
        setter(custom),
        field(
            ty = "Vec<EnumValue>",
            build = "field_map(self.values.clone(), |value| &value.name)"
        )
    )]
    values: IndexMap<SmolStr, EnumValue>,
    // keyed by the serialized form of each internal value
    #[builder(setter(skip))]
    value_lookup: OnceLock<HashMap<String, usize>>,
}

impl EnumTypeBuilder {
    pub fn values(self, values: impl IntoIterator<Item = EnumValue>) -> Self {
        let mut new = self;
        new.values = values.into_iter().collect();
        new
    }

    fn validate(&self) -> Result<()> {
        let Some(name) = self.name.as_ref() else {
            return Ok(());
        };
        assert_valid_name(name)?;
        if self.values.is_empty() {
            return Err(Error::EmptyEnumValues(name.clone()));
        }
        check_unique_names(name, self.values.iter().map(|value| &value.name))
    }
}

impl EnumType {
    pub fn values(&self) -> &IndexMap<SmolStr, EnumValue> {
        &self.values
    }

    pub fn maybe_value_by_name(&self, name: &str) -> Option<&EnumValue> {
        self.values.get(name)
    }

    pub fn maybe_value_by_internal_value(&self, value: &JsonValue) -> Option<&EnumValue> {
        let value_lookup = self.value_lookup.get_or_init(|| {
            self.values
                .values()
                .enumerate()
                .map(|(index, value)| (value.value.to_string(), index))
                .collect()
        });
        value_lookup
            .get(&value.to_string())
            .map(|&index| &self.values[index])
    }

    /// Internal value to external name.
    pub fn serialize(&self, value: &JsonValue) -> Option<SmolStr> {
        self.maybe_value_by_internal_value(value)
            .map(|value| value.name.clone())
    }

    /// External name, given as a runtime string, to internal value.
    pub fn parse_value(&self, value: &JsonValue) -> Option<JsonValue> {
        match value {
            JsonValue::String(name) => self
                .maybe_value_by_name(name)
                .map(|value| value.value.clone()),
            _ => None,
        }
    }

    /// External name, given as a literal, to internal value.
    pub fn parse_literal(&self, value: &Value) -> Option<JsonValue> {
        match value {
            Value::EnumVariant(name) => self
                .maybe_value_by_name(name)
                .map(|value| value.value.clone()),
            _ => None,
        }
    }
}

#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(
    pattern = "owned",
    build_fn(validate = "Self::validate", error = "Error")
)]
pub struct EnumValue {
    /// The internal value, defaults to the name.
    #[builder(setter(custom), default = "self.default_value()")]
    pub value: JsonValue,
    #[builder(setter(into))]
    pub name: SmolStr,
    #[builder(setter(into, strip_option), default)]
    pub description: Option<SmolStr>,
    #[builder(setter(into, strip_option), default)]
    pub deprecation_reason: Option<SmolStr>,
    #[builder(default)]
    is_deprecated: bool,
}

impl EnumValueBuilder {
    pub fn value(self, value: impl Into<JsonValue>) -> Self {
        let mut new = self;
        new.value = match value.into() {
            JsonValue::Null => None,
            value => Some(value),
        };
        new
    }

    fn default_value(&self) -> JsonValue {
        JsonValue::String(self.name.as_deref().unwrap_or_default().to_owned())
    }

    fn validate(&self) -> Result<()> {
        validate_deprecation(
            self.name.as_ref(),
            self.is_deprecated,
            self.deprecation_reason.as_ref(),
        )
    }
}

impl EnumValue {
    pub fn is_deprecated(&self) -> bool {
        self.is_deprecated || self.deprecation_reason.is_some()
    }
}

fn validate_deprecation(
    name: Option<&SmolStr>,
    is_deprecated: Option<bool>,
    deprecation_reason: Option<&Option<SmolStr>>,
) -> Result<()> {
    let Some(name) = name else {
        return Ok(());
    };
    assert_valid_name(name)?;
    if is_deprecated.is_some() && deprecation_reason.is_some_and(Option::is_some) {
        return Err(Error::ConflictingDeprecation(name.clone()));
    }
    Ok(())
}

#[derive(Builder, Debug)]
#[builder(
    pattern = "owned",
    build_fn(validate = "Self::validate", error = "Error")
)]
pub struct InputObjectType {
    #[builder(setter(into))]
    pub name: SmolStr,
    #[builder(setter(into, strip_option), default)]
    pub description: Option<SmolStr>,
    #[builder(setter(custom))]
    fields: Thunk<NamedFields<InputFieldDef>>,
}

impl InputObjectTypeBuilder {
    pub fn fields(self, fields: impl IntoIterator<Item = InputFieldDef>) -> Self {
        let mut new = self;
        new.fields = Some(Thunk::ready(NamedFields::new(fields, |field| &field.name)));
        new
    }

    pub fn deferred_fields(
        self,
        fields: impl Fn() -> Vec<InputFieldDef> + Send + Sync + 'static,
    ) -> Self {
        let mut new = self;
        new.fields = Some(Thunk::deferred(move || {
            NamedFields::new(fields(), |field| &field.name)
        }));
        new
    }

    fn validate(&self) -> Result<()> {
        validate_ready_fields(self.name.as_ref(), self.fields.as_ref())
    }
}

impl InputObjectType {
    pub fn fields(&self) -> &IndexMap<SmolStr, InputFieldDef> {
        &self.fields.get().by_name
    }

    pub(crate) fn check_unique_field_names(&self) -> Result<()> {
        self.fields.get().check_unique(&self.name)
    }

    pub fn maybe_field(&self, name: &str) -> Option<&InputFieldDef> {
        self.fields().get(name)
    }
}

#[derive(Builder, Debug)]
#[builder(
    pattern = "owned",
    build_fn(validate = "Self::validate", error = "Error")
)]
pub struct FieldDef {
    #[builder(setter(into))]
    pub name: SmolStr,
    #[builder(setter(into))]
    pub type_: TypeFull,
    #[builder(
        setter(custom),
        field(
            ty = "Vec<ArgumentDef>",
            build = "field_map(self.args.clone(), |arg| &arg.name)"
        )
    )]
    pub args: IndexMap<SmolStr, ArgumentDef>,
    #[builder(setter(into, strip_option), default)]
    pub description: Option<SmolStr>,
    #[builder(setter(into, strip_option), default)]
    pub deprecation_reason: Option<SmolStr>,
    #[builder(default)]
    is_deprecated: bool,
}

impl FieldDefBuilder {
    pub fn args(self, args: impl IntoIterator<Item = ArgumentDef>) -> Self {
        let mut new = self;
        new.args = args.into_iter().collect();
        new
    }

    fn validate(&self) -> Result<()> {
        validate_deprecation(
            self.name.as_ref(),
            self.is_deprecated,
            self.deprecation_reason.as_ref(),
        )?;
        match self.name.as_ref() {
            Some(name) => check_unique_names(name, self.args.iter().map(|arg| &arg.name)),
            None => Ok(()),
        }
    }
}

impl FieldDef {
    pub fn maybe_arg(&self, name: &str) -> Option<&ArgumentDef> {
        self.args.get(name)
    }

    pub fn is_deprecated(&self) -> bool {
        self.is_deprecated || self.deprecation_reason.is_some()
    }
}

/// An argument of a field or directive, or a field of an input object.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(
    pattern = "owned",
    build_fn(validate = "Self::validate", error = "Error")
)]
pub struct InputValueDef {
    #[builder(setter(into))]
    pub name: SmolStr,
    #[builder(setter(into))]
    pub type_: TypeFull,
    #[builder(setter(into, strip_option), default)]
    pub default_value: Option<JsonValue>,
    #[builder(setter(into, strip_option), default)]
    pub description: Option<SmolStr>,
}

impl InputValueDefBuilder {
    fn validate(&self) -> Result<()> {
        if let Some(name) = self.name.as_ref() {
            assert_valid_name(name)?;
        }
        Ok(())
    }
}

impl InputValueDef {
    pub(crate) fn new(name: impl Into<SmolStr>, type_: TypeFull) -> Self {
        Self {
            name: name.into(),
            type_,
            default_value: _d(),
            description: _d(),
        }
    }
}

pub type ArgumentDef = InputValueDef;
pub type ArgumentDefBuilder = InputValueDefBuilder;
pub type InputFieldDef = InputValueDef;
pub type InputFieldDefBuilder = InputValueDefBuilder;
