mod diagnostics;
mod directives;
mod error;
mod inscribe;
mod operation;
mod request;
mod schema;
mod types;

pub use indexmap::IndexMap;

pub use crate::diagnostics::{
    Conflict, ConflictReason, ConflictReasonMessage, ValidationError, fields_conflict_message,
    reason_message,
};
pub use crate::directives::{
    DirectiveDef, DirectiveDefBuilder, builtin_directives, include_directive, skip_directive,
};
pub use crate::error::{Error, Result};
pub use crate::inscribe::json_from_validation_errors;
pub use crate::operation::OperationType;
pub use crate::request::{
    Argument, Directive, Document, ExecutableDefinition, Field as SelectionField,
    FieldBuilder as SelectionFieldBuilder, FragmentDefinition, FragmentLookup, FragmentSpread,
    InlineFragment, OperationDefinition, OperationDefinitionBuilder, Request, Selection, Value,
    VariableDefinition,
};
pub use crate::schema::{
    OverlappingFieldsValidator, Schema, SchemaBuilder, SchemaConfig, ValidatedRequest,
    ValidationRequestOrErrors, validate_overlapping_fields,
};
pub use crate::types::{
    ArgumentDef, ArgumentDefBuilder, EnumType, EnumTypeBuilder, EnumValue, EnumValueBuilder,
    FieldDef, FieldDefBuilder, InputFieldDef, InputFieldDefBuilder, InputObjectType,
    InputObjectTypeBuilder, InputValueDef, InputValueDefBuilder, InterfaceType,
    InterfaceTypeBuilder, IsTypeOf, ObjectType, ObjectTypeBuilder, ResolveType, ScalarType,
    ScalarTypeBuilder, Thunk, Type, TypeFull, TypeInterface, TypeKind, UnionType,
    UnionTypeBuilder, assert_valid_name, boolean_type, builtin_types, float_type, id_type,
    int_type, string_type,
};
