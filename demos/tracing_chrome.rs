use sauvignon_types::{Request, Schema, json_from_validation_errors};
use serde_json::{Value as JsonValue, json};
use tracing_chrome::ChromeLayerBuilder;
use tracing_subscriber::prelude::*;

#[path = "../tests/shared/mod.rs"]
#[macro_use]
mod shared;

use shared::{aliased, document, field, fragment, pets_schema, query, spread};

fn run_request(request: &Request, expected: JsonValue, schema: &Schema) {
    let errors = schema.validate(request).into_errors();
    let json: JsonValue = serde_json::from_str(&json_from_validation_errors(&errors)).unwrap();
    assert_eq!(json, expected);
}

fn main() {
    let (chrome_layer, _guard) = ChromeLayerBuilder::new().build();
    tracing_subscriber::registry().with(chrome_layer).init();

    let schema = pets_schema();

    run_request(
        &Request::new(document(vec![
            query(selections![field("dog").selections(selections![
                spread("dogNames"),
                aliased("name", "nickname"),
            ])]),
            fragment("dogNames", "Dog", selections![field("name")]),
        ])),
        json!({
            "errors": [
                {
                    "message": "Fields \"name\" conflict because name and nickname are different fields."
                }
            ]
        }),
        &schema,
    );

    assert_eq!(
        schema.validate_input_value(
            &json!({ "requiredField": null }),
            &"ComplexInput!".parse().unwrap()
        ),
        [r#"In field "requiredField": Expected "Boolean!", found null."#]
    );
}
