use super::*;
use crate::{CheckResult, ValidatorOptions};
use tsv_graph::{IndexKeyKind, RawInterface, RawModule, RawNamedType, RawType, TypeGraph};
use tsv_linker::{MemoryLoader, link};

/// `B = { [k: number]: boolean; a: string }` plus whatever the test adds.
fn graph_with(types: impl IntoIterator<Item = RawNamedType>) -> TypeGraph {
    let base = RawNamedType::exported(
        "B",
        RawInterface::new()
            .index_signature(IndexKeyKind::Number, RawType::primitive("boolean"))
            .property("a", RawType::primitive("string"))
            .into(),
    );
    let module = types
        .into_iter()
        .fold(RawModule::new().with_type(base), RawModule::with_type);
    link(["./m"], &MemoryLoader::new().with("./m", module)).unwrap()
}

fn check(graph: &TypeGraph, name: &str, value: impl Into<Value>) -> Result<CheckResult, CheckError> {
    Validator::with_options(graph, ValidatorOptions::default()).check("./m", name, &value.into())
}

fn conforms(graph: &TypeGraph, name: &str, value: impl Into<Value>) -> bool {
    check(graph, name, value).unwrap().conform
}

fn member(of: RawType, key: &str) -> RawType {
    RawType::member(of, LiteralValue::String(key.to_string()))
}

fn index(of: RawType, position: f64) -> RawType {
    RawType::member(of, LiteralValue::Number(position))
}

// =============================================================================
// keyof
// =============================================================================

#[test]
fn test_keyof_interface() {
    let graph = graph_with([RawNamedType::exported(
        "K",
        RawType::keyof(RawType::local("B")),
    )]);
    assert!(conforms(&graph, "K", 12));
    assert!(conforms(&graph, "K", "12"));
    assert!(conforms(&graph, "K", "a"));
    assert!(!conforms(&graph, "K", true));
    assert_eq!(
        check(&graph, "K", "b").unwrap().error.as_deref(),
        Some("value \"b\" is not conform to K: is not a valid key.")
    );
}

#[test]
fn test_keyof_string_index_accepts_any_key() {
    let graph = graph_with([RawNamedType::exported(
        "K",
        RawType::keyof(
            RawInterface::new()
                .index_signature(IndexKeyKind::String, RawType::special("any"))
                .into(),
        ),
    )]);
    assert!(conforms(&graph, "K", "anything"));
    assert!(conforms(&graph, "K", 3));
    assert!(!conforms(&graph, "K", Value::Null));
}

#[test]
fn test_keyof_array_tuple_and_string_literal() {
    let graph = graph_with([
        RawNamedType::exported(
            "ArrayKey",
            RawType::keyof(RawType::array(RawType::primitive("string"))),
        ),
        RawNamedType::exported(
            "TupleKey",
            RawType::keyof(RawType::tuple(vec![RawType::primitive("string")])),
        ),
        RawNamedType::exported("TextKey", RawType::keyof(RawType::string_literal("abc"))),
    ]);
    for name in ["ArrayKey", "TupleKey", "TextKey"] {
        assert!(conforms(&graph, name, 0));
        assert!(conforms(&graph, name, "1"));
        assert!(!conforms(&graph, name, "length"));
    }
}

#[test]
fn test_keyof_intersection_accepts_any_member_key() {
    let graph = graph_with([RawNamedType::exported(
        "K",
        RawType::keyof(RawType::intersection(vec![
            RawType::local("B"),
            RawInterface::new()
                .property("extra", RawType::primitive("number"))
                .into(),
        ])),
    )]);
    assert!(conforms(&graph, "K", "a"));
    assert!(conforms(&graph, "K", "extra"));
    assert!(!conforms(&graph, "K", "missing"));
}

#[test]
fn test_keyof_union_is_a_query_error() {
    let graph = graph_with([RawNamedType::exported(
        "K",
        RawType::keyof(RawType::union(vec![
            RawType::local("B"),
            RawType::primitive("string"),
        ])),
    )]);
    assert_eq!(
        check(&graph, "K", "a"),
        Err(CheckError::UnsupportedKeyof { kind: "union" })
    );
}

#[test]
fn test_keyof_mapped_is_unimplemented() {
    let graph = graph_with([RawNamedType::exported(
        "K",
        RawType::keyof(
            RawInterface::new()
                .mapped_index_signature(RawType::primitive("string"), RawType::primitive("number"))
                .into(),
        ),
    )]);
    assert!(matches!(
        check(&graph, "K", "a"),
        Err(CheckError::Unimplemented { .. })
    ));
}

// =============================================================================
// Member access
// =============================================================================

#[test]
fn test_member_of_interface() {
    let graph = graph_with([RawNamedType::exported(
        "M",
        member(RawType::local("B"), "a"),
    )]);
    assert!(conforms(&graph, "M", "sdds"));
    assert_eq!(
        check(&graph, "M", 12).unwrap().error.as_deref(),
        Some("value 12 is not conform to M.\nvalue 12 is not conform to string.")
    );
}

#[test]
fn test_member_missing_property_is_a_query_error() {
    let graph = graph_with([RawNamedType::exported(
        "M",
        member(RawType::local("B"), "nope"),
    )]);
    assert_eq!(
        check(&graph, "M", "x"),
        Err(CheckError::UnknownProperty {
            property: "nope".to_string()
        })
    );
}

#[test]
fn test_member_of_array_and_tuple() {
    let graph = graph_with([
        RawNamedType::exported(
            "Item",
            index(RawType::array(RawType::primitive("number")), 0.0),
        ),
        RawNamedType::exported(
            "Second",
            index(
                RawType::tuple(vec![RawType::primitive("string"), RawType::primitive("number")]),
                1.0,
            ),
        ),
        RawNamedType::exported(
            "Beyond",
            index(RawType::tuple(vec![RawType::primitive("string")]), 5.0),
        ),
        RawNamedType::exported(
            "Length",
            member(RawType::array(RawType::primitive("number")), "length"),
        ),
    ]);
    assert!(conforms(&graph, "Item", 3));
    assert!(!conforms(&graph, "Item", "3"));
    assert!(conforms(&graph, "Second", 3));
    assert!(!conforms(&graph, "Second", "3"));
    assert_eq!(
        check(&graph, "Beyond", 3),
        Err(CheckError::TupleIndexOutOfRange {
            index: "5".to_string(),
            len: 1
        })
    );
    assert!(matches!(
        check(&graph, "Length", 3),
        Err(CheckError::UnknownProperty { .. })
    ));
}

#[test]
fn test_member_through_references() {
    let graph = graph_with([
        RawNamedType::new("Alias", RawType::local("B")),
        RawNamedType::exported("M", member(RawType::local("Alias"), "a")),
    ]);
    assert!(conforms(&graph, "M", "text"));
    assert!(!conforms(&graph, "M", 1));
}

#[test]
fn test_member_of_intersection() {
    let graph = graph_with([RawNamedType::exported(
        "M",
        member(
            RawType::intersection(vec![
                RawType::local("B"),
                RawInterface::new()
                    .property("count", RawType::primitive("number"))
                    .into(),
            ]),
            "count",
        ),
    )]);
    assert!(conforms(&graph, "M", 1));
    assert!(!conforms(&graph, "M", "one"));
}

#[test]
fn test_member_unsupported_parents_and_keys() {
    let graph = graph_with([
        RawNamedType::exported(
            "OfUnion",
            member(
                RawType::union(vec![RawType::local("B"), RawType::primitive("null")]),
                "a",
            ),
        ),
        RawNamedType::exported(
            "Symbolic",
            RawType::Member {
                of: Box::new(RawType::local("B")),
                key: MemberKey::Name {
                    name: "iterator".to_string(),
                },
            },
        ),
        RawNamedType::exported(
            "OfString",
            member(RawType::primitive("string"), "length"),
        ),
    ]);
    assert_eq!(
        check(&graph, "OfUnion", "x"),
        Err(CheckError::UnsupportedMember { kind: "union" })
    );
    assert!(matches!(
        check(&graph, "Symbolic", "x"),
        Err(CheckError::Unimplemented { .. })
    ));
    assert_eq!(
        check(&graph, "OfString", 1),
        Err(CheckError::UnsupportedMember {
            kind: "name reference"
        })
    );
}
