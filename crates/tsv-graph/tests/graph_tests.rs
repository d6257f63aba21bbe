use super::*;
use crate::types::{Intrinsic, PrimitiveName};

fn number() -> TypeData {
    TypeData::Intrinsic(Intrinsic::Primitive(PrimitiveName::Number))
}

#[test]
fn test_add_module_is_idempotent_per_path() {
    let mut graph = TypeGraph::new();
    let a = graph.add_module("./a");
    let b = graph.add_module("./b");
    assert_ne!(a, b);
    assert_eq!(graph.add_module("./a"), a);
    assert_eq!(graph.module_count(), 2);
    assert_eq!(graph.module_id("./b"), Some(b));
    assert_eq!(graph.module_id("./c"), None);
}

#[test]
fn test_declare_then_define() {
    let mut graph = TypeGraph::new();
    let module = graph.add_module("./a");
    let id = graph
        .declare_type(module, "A", true, Some("doc".to_string()))
        .expect("first declaration");

    let declared = graph.named_type(id);
    assert_eq!(declared.name, "A");
    assert!(declared.exported);
    assert!(!declared.is_defined());
    assert!(!graph.is_fully_defined());

    graph.define_type(id, Vec::new(), number());
    assert_eq!(graph.named_type(id).body(), Some(&number()));
    assert!(graph.is_fully_defined());
    assert_eq!(graph.lookup("./a", "A").map(|named| named.id), Some(id));
    assert_eq!(graph.qualified_name(id), "./a#A");
}

#[test]
fn test_duplicate_declaration_is_refused() {
    let mut graph = TypeGraph::new();
    let module = graph.add_module("./a");
    assert!(graph.declare_type(module, "A", false, None).is_some());
    assert!(graph.declare_type(module, "A", true, None).is_none());
    assert_eq!(graph.named_type_count(), 1);
}

#[test]
fn test_self_reference_uses_handle() {
    let mut graph = TypeGraph::new();
    let module = graph.add_module("./list");
    let node = graph.declare_type(module, "Node", true, None).unwrap();
    graph.define_type(
        node,
        Vec::new(),
        TypeData::Array(Box::new(TypeData::LocalRef {
            name: "Node".to_string(),
            target: node,
        })),
    );

    let body = graph.named_type(node).body().unwrap();
    let TypeData::Array(item) = body else {
        panic!("expected array, got {body:?}");
    };
    assert_eq!(item.ref_target(), Some(node));
}

#[test]
fn test_named_types_keep_declaration_order() {
    let mut graph = TypeGraph::new();
    let module = graph.add_module("./m");
    for name in ["Z", "A", "M"] {
        graph.declare_type(module, name, false, None);
    }
    let names: Vec<&str> = graph
        .module(module)
        .named_types()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["Z", "A", "M"]);
}
