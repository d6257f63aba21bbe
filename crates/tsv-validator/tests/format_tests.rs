use super::*;
use crate::diagnostics::Context;
use tsv_common::{FunctionValue, ObjectValue};
use tsv_graph::{
    IndexKeyKind, Intrinsic, LiteralValue, PrimitiveName, RawInterface, RawModule, RawNamedType,
    RawType, TypeData,
};
use tsv_linker::{MemoryLoader, link};

fn string_type() -> TypeData {
    TypeData::Intrinsic(Intrinsic::Primitive(PrimitiveName::String))
}

// =============================================================================
// Values
// =============================================================================

#[test]
fn test_render_primitives() {
    assert_eq!(render_value(&Value::Undefined), "undefined");
    assert_eq!(render_value(&Value::Null), "null");
    assert_eq!(render_value(&Value::Boolean(false)), "false");
    assert_eq!(render_value(&Value::Number(12.0)), "12");
    assert_eq!(render_value(&Value::Number(1.5)), "1.5");
    assert_eq!(render_value(&Value::BigInt(-42)), "-42n");
    assert_eq!(render_value(&Value::Symbol(None)), "Symbol()");
    assert_eq!(
        render_value(&Value::Symbol(Some("tag".to_string()))),
        "Symbol(tag)"
    );
}

#[test]
fn test_render_strings_are_quoted_and_truncated() {
    assert_eq!(render_value(&"abc".into()), "\"abc\"");
    assert_eq!(render_value(&"say \"hi\"".into()), "\"say \\\"hi\\\"\"");

    let exact = "x".repeat(32);
    assert_eq!(render_value(&exact.clone().into()), format!("\"{exact}\""));

    let long = "y".repeat(40);
    assert_eq!(
        render_value(&long.into()),
        format!("\"{}...\"", "y".repeat(32))
    );

    // Truncation counts characters, not bytes.
    let wide = "é".repeat(33);
    assert_eq!(
        render_value(&wide.into()),
        format!("\"{}...\"", "é".repeat(32))
    );
}

#[test]
fn test_render_functions() {
    assert_eq!(
        render_value(&FunctionValue::named("handler").into()),
        "[Function handler]"
    );
    assert_eq!(
        render_value(&FunctionValue::default().into()),
        "[Function]"
    );
}

#[test]
fn test_render_containers_show_primitive_entries_only() {
    let array: Value = vec![Value::from(1), "two".into(), Value::Null].into();
    assert_eq!(render_value(&array), "[1, \"two\", null]");

    let nested: Value = vec![Value::from(1), vec![Value::from(2)].into(), Value::from(3)].into();
    assert_eq!(render_value(&nested), "[1, 3, ...]");

    let object: Value = ObjectValue::new()
        .with("a", 12)
        .with("inner", ObjectValue::new().with("x", 1))
        .with("b", "s")
        .into();
    assert_eq!(render_value(&object), "{a: 12, b: \"s\", ...}");

    assert_eq!(render_value(&Value::Array(Vec::new())), "[]");
    assert_eq!(render_value(&ObjectValue::new().into()), "{}");
}

// =============================================================================
// Trails
// =============================================================================

#[test]
fn test_format_trail_reads_outermost_first() {
    let module = RawModule::new().with_type(RawNamedType::exported(
        "A",
        RawInterface::new()
            .property("b", RawType::primitive("string"))
            .into(),
    ));
    let graph = link(["./m"], &MemoryLoader::new().with("./m", module)).unwrap();
    let id = graph
        .module_by_path("./m")
        .and_then(|module| module.named_type("A"))
        .unwrap();

    let inner = Value::from(22);
    let outer: Value = ObjectValue::new().with("b", 22).into();
    let string = string_type();

    let mut trail = UnmatchTrail::new();
    trail.push(UnmatchEntry {
        value: &inner,
        ty: TypeRef::Node(&string),
        cause: None,
        context: Some(Context::Property("b".to_string())),
        score: None,
    });
    trail.push(UnmatchEntry {
        value: &outer,
        ty: TypeRef::Named(id),
        cause: None,
        context: None,
        score: Some(0.0),
    });

    assert_eq!(
        format_trail(&graph, &trail),
        "value {b: 22} is not conform to A.\nproperty 'b' value 22 is not conform to string."
    );
}

#[test]
fn test_format_causes() {
    let graph = TypeGraph::new();
    let members = [string_type(), TypeData::Literal(LiteralValue::Number(1.0))];
    let value = Value::from(true);
    let string = string_type();

    let line = |cause, context: Option<Context>| {
        let mut trail = UnmatchTrail::new();
        trail.push(UnmatchEntry {
            value: &value,
            ty: TypeRef::Node(&string),
            cause: Some(cause),
            context,
            score: None,
        });
        format_trail(&graph, &trail)
    };

    assert_eq!(
        line(Cause::NotInstanceOf("Date"), None),
        "value true is not conform to string: is not a `Date`."
    );
    assert_eq!(
        line(Cause::MissingProperty("id"), Some(Context::ArrayItem(3))),
        "array item 3 value true is not conform to string: missing property 'id'."
    );
    assert_eq!(
        line(
            Cause::InvalidIndexKey {
                key: "x".to_string(),
                kind: IndexKeyKind::Number
            },
            Some(Context::TupleItem(0))
        ),
        "tuple item 0 value true is not conform to string: key 'x' is not a valid number key."
    );
    assert_eq!(
        line(
            Cause::TupleLength {
                expected: 2,
                actual: 3
            },
            None
        ),
        "value true is not conform to string: expected 2 items, got 3."
    );
    assert_eq!(
        line(Cause::NoMatchingType(&members), None),
        "value true is not conform to string: no matching type in: string or 1."
    );
    assert_eq!(
        line(Cause::InvalidKey, None),
        "value true is not conform to string: is not a valid key."
    );
}
