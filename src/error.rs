use derive_builder::UninitializedFieldError;
use smol_str::SmolStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("must provide query type")]
    NoQueryTypeSpecified,
    #[error("root type `{0}` must be an object type")]
    RootTypeNotObject(SmolStr),
    #[error(transparent)]
    UninitializedField(#[from] UninitializedFieldError),
    #[error("names must match /^[_a-zA-Z][_a-zA-Z0-9]*$/ but `{0}` does not")]
    InvalidName(SmolStr),
    #[error("invalid type reference: `{0}`")]
    InvalidTypeReference(SmolStr),
    #[error("can only create non-null of a nullable type but got: `{0}`")]
    NonNullOfNonNull(SmolStr),
    #[error("duplicate type name: `{0}`")]
    DuplicateTypeName(SmolStr),
    #[error("duplicate directive name: `@{0}`")]
    DuplicateDirectiveName(SmolStr),
    #[error("`{owner}` lists `{name}` more than once")]
    DuplicateName { owner: SmolStr, name: SmolStr },
    #[error("unknown type `{name}` referenced by `{referenced_by}`")]
    UnknownType {
        name: SmolStr,
        referenced_by: SmolStr,
    },
    #[error("`{0}` fields must be a non-empty map of field names to fields")]
    EmptyFields(SmolStr),
    #[error("`{type_name}.{field_name}` field type must be an output type but got: `{type_}`")]
    FieldNotOutputType {
        type_name: SmolStr,
        field_name: SmolStr,
        type_: SmolStr,
    },
    #[error(
        "`{type_name}.{field_name}({argument_name}:)` argument type must be an input type but got: `{type_}`"
    )]
    ArgumentNotInputType {
        type_name: SmolStr,
        field_name: SmolStr,
        argument_name: SmolStr,
        type_: SmolStr,
    },
    #[error("`{type_name}.{field_name}` field type must be an input type but got: `{type_}`")]
    InputFieldNotInputType {
        type_name: SmolStr,
        field_name: SmolStr,
        type_: SmolStr,
    },
    #[error(
        "`@{directive_name}({argument_name}:)` argument type must be an input type but got: `{type_}`"
    )]
    DirectiveArgumentNotInputType {
        directive_name: SmolStr,
        argument_name: SmolStr,
        type_: SmolStr,
    },
    #[error("`{type_name}` may only implement interface types, it cannot implement: `{interface}`")]
    ImplementsNonInterface {
        type_name: SmolStr,
        interface: SmolStr,
    },
    #[error(
        "interface type `{interface}` does not provide a `resolve_type` function and implementing type `{type_name}` does not provide an `is_type_of` function, there is no way to resolve this implementing type"
    )]
    UnresolvableImplementation {
        interface: SmolStr,
        type_name: SmolStr,
    },
    #[error("must provide at least one possible type for union `{0}`")]
    EmptyUnion(SmolStr),
    #[error("`{union}` may only contain object types, it cannot contain: `{member}`")]
    UnionMemberNotObject { union: SmolStr, member: SmolStr },
    #[error(
        "union type `{union}` does not provide a `resolve_type` function and possible type `{member}` does not provide an `is_type_of` function, there is no way to resolve this possible type"
    )]
    UnresolvablePossibleType { union: SmolStr, member: SmolStr },
    #[error("`{0}` values must be a non-empty map of value names to values")]
    EmptyEnumValues(SmolStr),
    #[error("`{0}` must provide both `parse_value` and `parse_literal` functions")]
    PartialScalarParsers(SmolStr),
    #[error("`{0}` should provide either `deprecation_reason` or `is_deprecated`, not both")]
    ConflictingDeprecation(SmolStr),
}

pub type Result<TSuccess> = std::result::Result<TSuccess, Error>;
