//! Integration tests for greenland-schema
//!
//! Compiles the same schemas for every provider and checks the per-dialect
//! rules over whole documents, including generated schemas.

use greenland_schema::cli::{handle_command, Command, CommandType};
use greenland_schema::config::Settings;
use greenland_schema::llm::forced_required_fields;
use greenland_schema::{
    compile_anthropic, compile_gemini, compile_ollama, compile_openai, decompile, Property,
    Provider, Schema,
};
use proptest::prelude::*;
use serde_json::{json, Value};

fn user_profile() -> Schema {
    Schema::new("UserProfile", "A user profile object")
        .with_property("name", Property::string("Full name of the user"))
        .with_property(
            "age",
            Property::integer("Age in years").with_minimum(0).with_maximum(120),
        )
        .with_property(
            "interests",
            Property::array("List of interests", json!({"type": "string"})).optional(),
        )
}

fn with_address() -> Schema {
    Schema::new("Customer", "").with_property(
        "address",
        Property::inline_object(
            "Postal address",
            [
                ("street", Property::string("Street")),
                ("city", Property::string("City")),
                ("zip", Property::string("ZIP code").optional()),
            ],
            false,
        ),
    )
}

fn names(document: &Value, key: &str) -> Vec<String> {
    document[key]
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Count `minimum`/`maximum` keywords anywhere in a document
fn count_bounds(document: &Value) -> usize {
    match document {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| {
                usize::from(key == "minimum" || key == "maximum") + count_bounds(value)
            })
            .sum(),
        Value::Array(values) => values.iter().map(count_bounds).sum(),
        _ => 0,
    }
}

/// Check a rule on every object level that has a `properties` map
fn for_each_object(document: &Value, check: &mut dyn FnMut(&serde_json::Map<String, Value>)) {
    let Some(object) = document.as_object() else {
        return;
    };

    if let Some(properties) = object.get("properties").and_then(Value::as_object) {
        check(object);
        for prop in properties.values() {
            for_each_object(prop, check);
        }
    }

    if let Some(items) = object.get("items") {
        for_each_object(items, check);
    }
}

#[test]
fn test_user_profile_across_dialects() {
    let schema = user_profile();

    let openai = compile_openai(&schema);
    assert_eq!(names(&openai, "required"), ["name", "age", "interests"]);
    assert!(openai["properties"]["age"].get("minimum").is_none());
    assert!(openai["properties"]["age"].get("maximum").is_none());

    let anthropic = compile_anthropic(&schema);
    assert_eq!(names(&anthropic, "required"), ["name", "age"]);
    assert_eq!(anthropic["properties"]["age"]["minimum"], json!(0));
    assert_eq!(anthropic["properties"]["age"]["maximum"], json!(120));

    let gemini = compile_gemini(&schema);
    assert_eq!(names(&gemini, "propertyOrdering"), ["name", "age", "interests"]);
    assert_eq!(names(&gemini, "required").len(), 2);

    let ollama = compile_ollama(&schema);
    assert_eq!(names(&ollama, "required").len(), 2);
    assert_eq!(ollama["additionalProperties"], json!(false));
}

#[test]
fn test_nested_address_across_dialects() {
    let schema = with_address();

    let openai = compile_openai(&schema);
    assert_eq!(
        names(&openai["properties"]["address"], "required"),
        ["street", "city", "zip"]
    );
    assert_eq!(
        forced_required_fields(&schema),
        vec!["address.zip".to_string()]
    );

    let gemini = compile_gemini(&schema);
    assert_eq!(
        names(&gemini["properties"]["address"], "propertyOrdering"),
        ["street", "city", "zip"]
    );
    assert_eq!(
        names(&gemini["properties"]["address"], "required"),
        ["street", "city"]
    );
}

#[test]
fn test_openai_decompile_flattens_required() {
    let schema = user_profile();
    let recovered = decompile(&compile_openai(&schema));

    assert_eq!(recovered.name, "Schema");
    assert!(!schema.properties["interests"].required);
    assert!(recovered.properties["interests"].required);
    assert_eq!(recovered.required_properties(), schema.all_properties());
    assert_ne!(recovered.properties, schema.properties);
}

#[test]
fn test_anthropic_decompile_keeps_required() {
    let schema = user_profile();
    let recovered = decompile(&compile_anthropic(&schema));

    assert_eq!(recovered.required_properties(), schema.required_properties());
    assert_eq!(recovered.properties["age"].minimum, Some(serde_json::Number::from(0u64)));
}

#[test]
fn test_decompiled_maps_stay_open_in_every_dialect() {
    let document = json!({
        "title": "Sentence",
        "type": "object",
        "properties": {
            "translations": {
                "type": "object",
                "description": "Sentence per language",
                "additionalProperties": {"type": "integer", "minimum": 0, "maximum": 5}
            }
        },
        "required": ["translations"]
    });
    let schema = decompile(&document);

    for provider in Provider::ALL {
        let compiled = provider.compile(&schema);
        let translations = &compiled["properties"]["translations"];
        assert!(translations.get("properties").is_none(), "{provider}");
        assert_eq!(translations["additionalProperties"]["type"], "integer", "{provider}");
    }
    assert_eq!(count_bounds(&compile_openai(&schema)), 0);
    assert_eq!(
        compile_anthropic(&schema)["properties"]["translations"]["additionalProperties"]["maximum"],
        json!(5)
    );
}

#[test]
fn test_provider_compile_matches_functions() {
    let schema = with_address();
    assert_eq!(Provider::OpenAI.compile(&schema), compile_openai(&schema));
    assert_eq!(Provider::Anthropic.compile(&schema), compile_anthropic(&schema));
    assert_eq!(Provider::Gemini.compile(&schema), compile_gemini(&schema));
    assert_eq!(Provider::Ollama.compile(&schema), compile_ollama(&schema));
}

#[test]
fn test_request_fragments_by_model() {
    let settings = Settings::default();
    let schema = user_profile();

    let openai = settings.dialect(settings.route("gpt-4o-mini")).request_fragment(&schema);
    assert_eq!(openai["response_format"]["type"], "json_schema");
    assert_eq!(openai["response_format"]["json_schema"]["name"], "UserProfile");
    assert_eq!(
        openai["response_format"]["json_schema"]["schema"],
        compile_openai(&schema)
    );

    let gemini = settings.dialect(settings.route("gemini-1.5-flash")).request_fragment(&schema);
    assert_eq!(
        gemini["generationConfig"]["responseSchema"],
        compile_gemini(&schema)
    );

    let ollama = settings.dialect(settings.route("qwen2.5:7b")).request_fragment(&schema);
    assert_eq!(ollama["format"], compile_ollama(&schema));
}

#[test]
fn test_command_parsing() {
    let cmd = Command::parse(&["compile", "claude", "-"]).unwrap();
    assert!(matches!(
        cmd.command_type,
        CommandType::Compile {
            provider: Some(Provider::Anthropic),
            ..
        }
    ));

    let cmd = Command::parse(&["request", "o3-mini", "schema.json"]).unwrap();
    assert!(matches!(cmd.command_type, CommandType::Request { .. }));

    let cmd = Command::parse(&["route", "o3-mini"]).unwrap();
    assert_eq!(
        handle_command(&cmd, &Settings::default()).unwrap(),
        "openai"
    );
}

fn with_required(prop: Property, required: bool) -> Property {
    if required {
        prop
    } else {
        prop.optional()
    }
}

fn leaf_property() -> impl Strategy<Value = Property> {
    prop_oneof![
        any::<bool>().prop_map(|req| with_required(Property::string("Text"), req)),
        (any::<bool>(), -50i64..50, 50i64..500).prop_map(|(req, low, high)| {
            with_required(
                Property::integer("Count").with_minimum(low).with_maximum(high),
                req,
            )
        }),
        (any::<bool>(), 0u64..10).prop_map(|(req, low)| {
            with_required(Property::number("Score").with_minimum(low), req)
        }),
        any::<bool>().prop_map(|req| with_required(Property::boolean("Flag"), req)),
        any::<bool>().prop_map(|req| {
            with_required(Property::array("Tags", json!({"type": "string"})), req)
        }),
    ]
}

fn property_list(
    property: impl Strategy<Value = Property>,
) -> impl Strategy<Value = Vec<(String, Property)>> {
    proptest::collection::vec(("f_[a-z]{1,6}", property), 0..5)
}

fn build_schema(name: &str, properties: Vec<(String, Property)>) -> Schema {
    properties
        .into_iter()
        .fold(Schema::new(name, ""), |schema, (key, prop)| {
            schema.with_property(key, prop)
        })
}

fn any_property() -> impl Strategy<Value = Property> {
    leaf_property().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            (property_list(inner.clone()), any::<bool>(), any::<bool>()).prop_map(
                |(props, extra, req)| {
                    with_required(Property::inline_object("Inline", props, extra), req)
                }
            ),
            (property_list(inner.clone()), any::<bool>()).prop_map(|(props, req)| {
                with_required(Property::object("Nested", build_schema("Nested", props)), req)
            }),
            (property_list(inner), any::<bool>()).prop_map(|(props, req)| {
                with_required(Property::array_of("Rows", build_schema("Row", props)), req)
            }),
        ]
    })
}

fn any_schema() -> impl Strategy<Value = Schema> {
    property_list(any_property()).prop_map(|props| build_schema("Generated", props))
}

proptest! {
    #[test]
    fn prop_openai_requires_every_property(schema in any_schema()) {
        let document = compile_openai(&schema);
        prop_assert_eq!(names(&document, "required").len(), schema.len());

        let mut violations = Vec::new();
        for_each_object(&document, &mut |object| {
            let keys: Vec<&String> = object["properties"]
                .as_object()
                .into_iter()
                .flat_map(|p| p.keys())
                .collect();
            let required: Vec<&str> = object
                .get("required")
                .and_then(Value::as_array)
                .map(|list| list.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            let closed = object.get("additionalProperties") == Some(&json!(false));
            if keys.len() != required.len() || !closed {
                violations.push(Value::Object(object.clone()));
            }
        });
        prop_assert!(violations.is_empty(), "non-strict objects: {:?}", violations);
    }

    #[test]
    fn prop_other_dialects_honor_required_flags(schema in any_schema()) {
        let expected = schema.required_properties();
        prop_assert_eq!(names(&compile_anthropic(&schema), "required"), expected.clone());
        prop_assert_eq!(names(&compile_gemini(&schema), "required"), expected.clone());
        prop_assert_eq!(names(&compile_ollama(&schema), "required"), expected);
    }

    #[test]
    fn prop_gemini_ordering_on_every_level(schema in any_schema()) {
        let document = compile_gemini(&schema);
        prop_assert_eq!(names(&document, "propertyOrdering"), schema.all_properties());

        let mut mismatches = Vec::new();
        for_each_object(&document, &mut |object| {
            let keys: Vec<Value> = object["properties"]
                .as_object()
                .into_iter()
                .flat_map(|p| p.keys())
                .map(|k| Value::from(k.as_str()))
                .collect();
            if object.get("propertyOrdering") != Some(&Value::Array(keys)) {
                mismatches.push(Value::Object(object.clone()));
            }
        });
        prop_assert!(mismatches.is_empty(), "unordered objects: {:?}", mismatches);
    }

    #[test]
    fn prop_openai_has_no_bounds(schema in any_schema()) {
        prop_assert_eq!(count_bounds(&compile_openai(&schema)), 0);
    }

    #[test]
    fn prop_compiling_leaves_schema_untouched(schema in any_schema()) {
        let before = schema.clone();
        for provider in Provider::ALL {
            let _ = provider.compile(&schema);
        }
        prop_assert_eq!(schema, before);
    }

    #[test]
    fn prop_decompile_recovers_root_required(schema in any_schema()) {
        let from_anthropic = decompile(&compile_anthropic(&schema));
        prop_assert_eq!(from_anthropic.required_properties(), schema.required_properties());

        let from_openai = decompile(&compile_openai(&schema));
        prop_assert_eq!(from_openai.required_properties(), schema.all_properties());
    }
}
