#![allow(dead_code, unused_macros)]

use serde_json::Value as JsonValue;
use smol_str::SmolStr;

use sauvignon_types::{
    Argument, ArgumentDefBuilder, Directive, Document, EnumTypeBuilder, EnumValueBuilder,
    ExecutableDefinition, FieldDef, FieldDefBuilder, FragmentDefinition, FragmentSpread,
    InlineFragment, InputFieldDefBuilder, InputObjectTypeBuilder, InterfaceTypeBuilder,
    ObjectTypeBuilder, OperationDefinitionBuilder, OperationType, Schema, SchemaBuilder,
    Selection, SelectionFieldBuilder, Type, TypeFull, UnionTypeBuilder, Value,
};

pub fn type_full(value: &str) -> TypeFull {
    value.parse().unwrap()
}

pub fn field_def(name: &str, type_: &str) -> FieldDef {
    FieldDefBuilder::default()
        .name(name)
        .type_(type_full(type_))
        .build()
        .unwrap()
}

pub fn field_def_with_args(name: &str, type_: &str, args: &[(&str, &str)]) -> FieldDef {
    FieldDefBuilder::default()
        .name(name)
        .type_(type_full(type_))
        .args(args.iter().map(|(name, type_)| {
            ArgumentDefBuilder::default()
                .name(*name)
                .type_(type_full(type_))
                .build()
                .unwrap()
        }))
        .build()
        .unwrap()
}

/// Resolves the concrete type from a `__typename` key on the runtime value.
pub fn resolve_by_typename(value: &JsonValue) -> Option<SmolStr> {
    value
        .get("__typename")
        .and_then(JsonValue::as_str)
        .map(Into::into)
}

pub fn object_type(name: &str, interfaces: &[&str], fields: Vec<FieldDef>) -> Type {
    Type::Object(
        ObjectTypeBuilder::default()
            .name(name)
            .interfaces(interfaces.iter().copied())
            .fields(fields)
            .build()
            .unwrap(),
    )
}

pub fn interface_type(name: &str, fields: Vec<FieldDef>) -> Type {
    Type::Interface(
        InterfaceTypeBuilder::default()
            .name(name)
            .fields(fields)
            .resolve_type(resolve_by_typename)
            .build()
            .unwrap(),
    )
}

/// ```graphql
/// interface Being { name(surname: Boolean): String }
/// interface Pet { name(surname: Boolean): String }
/// enum DogCommand { SIT, HEEL, DOWN }
/// enum FurColor { BROWN, BLACK, TAN, SPOTTED }
/// type Dog implements Being & Pet {
///   name(surname: Boolean): String
///   nickname: String
///   barkVolume: Int
///   barks: Boolean
///   doesKnowCommand(dogCommand: DogCommand): Boolean
///   isHousetrained(atOtherHomes: Boolean = true): Boolean
///   isAtLocation(x: Int, y: Int): Boolean
/// }
/// type Cat implements Being & Pet {
///   name(surname: Boolean): String
///   nickname: String
///   meows: Boolean
///   meowVolume: Int
///   furColor: FurColor
/// }
/// union CatOrDog = Cat | Dog
/// type Human implements Being {
///   name(surname: Boolean): String
///   pets: [Pet]
///   relatives: [Human]
/// }
/// input ComplexInput {
///   requiredField: Boolean!
///   intField: Int
///   stringField: String
///   booleanField: Boolean
///   stringListField: [String]
/// }
/// type QueryRoot {
///   human(id: ID): Human
///   dog: Dog
///   cat: Cat
///   pet: Pet
///   catOrDog: CatOrDog
///   complexArgField(complexArg: ComplexInput): String
/// }
/// ```
pub fn pets_schema() -> Schema {
    SchemaBuilder::default()
        .query("QueryRoot")
        .types([
            interface_type(
                "Being",
                vec![field_def_with_args("name", "String", &[("surname", "Boolean")])],
            ),
            interface_type(
                "Pet",
                vec![field_def_with_args("name", "String", &[("surname", "Boolean")])],
            ),
            Type::Enum(
                EnumTypeBuilder::default()
                    .name("DogCommand")
                    .values(["SIT", "HEEL", "DOWN"].map(|name| {
                        EnumValueBuilder::default().name(name).build().unwrap()
                    }))
                    .build()
                    .unwrap(),
            ),
            Type::Enum(
                EnumTypeBuilder::default()
                    .name("FurColor")
                    .values(
                        ["BROWN", "BLACK", "TAN", "SPOTTED"]
                            .into_iter()
                            .enumerate()
                            .map(|(index, name)| {
                                EnumValueBuilder::default()
                                    .name(name)
                                    .value(index)
                                    .build()
                                    .unwrap()
                            }),
                    )
                    .build()
                    .unwrap(),
            ),
            object_type(
                "Dog",
                &["Being", "Pet"],
                vec![
                    field_def_with_args("name", "String", &[("surname", "Boolean")]),
                    field_def("nickname", "String"),
                    field_def("barkVolume", "Int"),
                    field_def("barks", "Boolean"),
                    field_def_with_args(
                        "doesKnowCommand",
                        "Boolean",
                        &[("dogCommand", "DogCommand")],
                    ),
                    FieldDefBuilder::default()
                        .name("isHousetrained")
                        .type_("Boolean")
                        .args([ArgumentDefBuilder::default()
                            .name("atOtherHomes")
                            .type_("Boolean")
                            .default_value(true)
                            .build()
                            .unwrap()])
                        .build()
                        .unwrap(),
                    field_def_with_args("isAtLocation", "Boolean", &[("x", "Int"), ("y", "Int")]),
                ],
            ),
            object_type(
                "Cat",
                &["Being", "Pet"],
                vec![
                    field_def_with_args("name", "String", &[("surname", "Boolean")]),
                    field_def("nickname", "String"),
                    field_def("meows", "Boolean"),
                    field_def("meowVolume", "Int"),
                    field_def("furColor", "FurColor"),
                ],
            ),
            Type::Union(
                UnionTypeBuilder::default()
                    .name("CatOrDog")
                    .types(["Cat", "Dog"])
                    .resolve_type(resolve_by_typename)
                    .build()
                    .unwrap(),
            ),
            Type::Object(
                ObjectTypeBuilder::default()
                    .name("Human")
                    .interfaces(["Being"])
                    .deferred_fields(|| {
                        vec![
                            field_def_with_args("name", "String", &[("surname", "Boolean")]),
                            field_def("pets", "[Pet]"),
                            field_def("relatives", "[Human]"),
                        ]
                    })
                    .build()
                    .unwrap(),
            ),
            Type::InputObject(
                InputObjectTypeBuilder::default()
                    .name("ComplexInput")
                    .fields(
                        [
                            ("requiredField", "Boolean!"),
                            ("intField", "Int"),
                            ("stringField", "String"),
                            ("booleanField", "Boolean"),
                            ("stringListField", "[String]"),
                        ]
                        .map(|(name, type_)| {
                            InputFieldDefBuilder::default()
                                .name(name)
                                .type_(type_full(type_))
                                .build()
                                .unwrap()
                        }),
                    )
                    .build()
                    .unwrap(),
            ),
            object_type(
                "QueryRoot",
                &[],
                vec![
                    field_def_with_args("human", "Human", &[("id", "ID")]),
                    field_def("dog", "Dog"),
                    field_def("cat", "Cat"),
                    field_def("pet", "Pet"),
                    field_def("catOrDog", "CatOrDog"),
                    field_def_with_args(
                        "complexArgField",
                        "String",
                        &[("complexArg", "ComplexInput")],
                    ),
                ],
            ),
        ])
        .build()
        .unwrap()
}

/// ```graphql
/// interface SomeBox { unrelatedField: String }
/// type StringBox implements SomeBox { scalar: String, unrelatedField: String }
/// type IntBox implements SomeBox { scalar: Int, unrelatedField: String }
/// interface NonNullStringBox1 { scalar: String! }
/// type NonNullStringBox1Impl implements SomeBox & NonNullStringBox1 {
///   scalar: String!
///   unrelatedField: String
/// }
/// interface NonNullStringBox2 { scalar: String! }
/// type NonNullStringBox2Impl implements SomeBox & NonNullStringBox2 {
///   scalar: String!
///   unrelatedField: String
/// }
/// type Node { id: ID, name: String }
/// type Edge { node: Node }
/// type Connection { edges: [Edge] }
/// type Query { someBox: SomeBox, connection: Connection }
/// ```
pub fn boxes_schema() -> Schema {
    SchemaBuilder::default()
        .query("Query")
        .types([
            interface_type("SomeBox", vec![field_def("unrelatedField", "String")]),
            object_type(
                "StringBox",
                &["SomeBox"],
                vec![
                    field_def("scalar", "String"),
                    field_def("unrelatedField", "String"),
                ],
            ),
            object_type(
                "IntBox",
                &["SomeBox"],
                vec![
                    field_def("scalar", "Int"),
                    field_def("unrelatedField", "String"),
                ],
            ),
            interface_type("NonNullStringBox1", vec![field_def("scalar", "String!")]),
            object_type(
                "NonNullStringBox1Impl",
                &["SomeBox", "NonNullStringBox1"],
                vec![
                    field_def("scalar", "String!"),
                    field_def("unrelatedField", "String"),
                ],
            ),
            interface_type("NonNullStringBox2", vec![field_def("scalar", "String!")]),
            object_type(
                "NonNullStringBox2Impl",
                &["SomeBox", "NonNullStringBox2"],
                vec![
                    field_def("scalar", "String!"),
                    field_def("unrelatedField", "String"),
                ],
            ),
            object_type(
                "Node",
                &[],
                vec![field_def("id", "ID"), field_def("name", "String")],
            ),
            object_type("Edge", &[], vec![field_def("node", "Node")]),
            object_type("Connection", &[], vec![field_def("edges", "[Edge]")]),
            object_type(
                "Query",
                &[],
                vec![
                    field_def("someBox", "SomeBox"),
                    field_def("connection", "Connection"),
                ],
            ),
        ])
        .build()
        .unwrap()
}

/// A selection field under construction.
pub struct PendingField {
    alias: Option<&'static str>,
    name: &'static str,
    arguments: Vec<Argument>,
    directives: Vec<Directive>,
    selection_set: Option<Vec<Selection>>,
}

pub fn field(name: &'static str) -> PendingField {
    PendingField {
        alias: None,
        name,
        arguments: vec![],
        directives: vec![],
        selection_set: None,
    }
}

/// `alias: name`
pub fn aliased(alias: &'static str, name: &'static str) -> PendingField {
    PendingField {
        alias: Some(alias),
        ..field(name)
    }
}

impl PendingField {
    pub fn arg(mut self, name: &str, value: Value) -> Self {
        self.arguments.push(Argument::new(name.into(), value));
        self
    }

    pub fn directive(mut self, name: &str, arguments: Vec<(&str, Value)>) -> Self {
        self.directives.push(directive(name, arguments));
        self
    }

    pub fn selections(mut self, selection_set: Vec<Selection>) -> Self {
        self.selection_set = Some(selection_set);
        self
    }
}

impl From<PendingField> for Selection {
    fn from(value: PendingField) -> Self {
        let mut builder = SelectionFieldBuilder::default()
            .name(value.name)
            .directives(value.directives);
        if let Some(alias) = value.alias {
            builder = builder.alias(alias);
        }
        if !value.arguments.is_empty() {
            builder = builder.arguments(value.arguments);
        }
        if let Some(selection_set) = value.selection_set {
            builder = builder.selection_set(selection_set);
        }
        Selection::Field(builder.build().unwrap())
    }
}

macro_rules! selections {
    ($($selection:expr),* $(,)?) => {
        vec![$(::std::convert::Into::<::sauvignon_types::Selection>::into($selection)),*]
    };
}

pub fn directive(name: &str, arguments: Vec<(&str, Value)>) -> Directive {
    Directive::new(
        name.into(),
        Some(
            arguments
                .into_iter()
                .map(|(name, value)| Argument::new(name.into(), value))
                .collect(),
        ),
    )
}

pub fn enum_value(name: &str) -> Value {
    Value::EnumVariant(name.into())
}

pub fn spread(name: &str) -> Selection {
    Selection::FragmentSpread(FragmentSpread::new(name.into(), vec![]))
}

pub fn inline_fragment(on: Option<&str>, selection_set: Vec<Selection>) -> Selection {
    Selection::InlineFragment(InlineFragment::new(on.map(Into::into), vec![], selection_set))
}

pub fn fragment(name: &str, on: &str, selection_set: Vec<Selection>) -> ExecutableDefinition {
    FragmentDefinition::new(name.into(), on.into(), vec![], selection_set).into()
}

pub fn query(selection_set: Vec<Selection>) -> ExecutableDefinition {
    OperationDefinitionBuilder::default()
        .operation_type(OperationType::Query)
        .selection_set(selection_set)
        .build()
        .unwrap()
        .into()
}

pub fn document(definitions: Vec<ExecutableDefinition>) -> Document {
    Document::new(definitions)
}
