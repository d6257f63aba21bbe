use super::*;
use crate::types::{
    IndexKeyKind, IndexSignature, Intrinsic, ParamInfo, PrimitiveName, PropertySignature,
};

fn primitive(name: PrimitiveName) -> TypeData {
    TypeData::Intrinsic(Intrinsic::Primitive(name))
}

fn prop(name: &str, ty: TypeData, optional: bool) -> PropertySignature<TypeData> {
    PropertySignature {
        name: name.to_string(),
        ty,
        optional,
        readonly: false,
    }
}

#[test]
fn test_format_structural_kinds() {
    let graph = TypeGraph::new();
    let fmt = TypeFormatter::new(&graph);

    let union = TypeData::Composite {
        op: CompositeOp::Union,
        members: vec![
            primitive(PrimitiveName::String),
            primitive(PrimitiveName::Null),
        ],
    };
    assert_eq!(fmt.format(&union), "string | null");
    assert_eq!(
        fmt.format(&TypeData::Array(Box::new(union.clone()))),
        "(string | null)[]"
    );
    assert_eq!(
        fmt.format(&TypeData::Tuple(vec![
            primitive(PrimitiveName::Number),
            TypeData::Literal(LiteralValue::String("a".to_string())),
        ])),
        "[number, \"a\"]"
    );
    assert_eq!(fmt.format(&TypeData::Tuple(vec![])), "[]");
    assert_eq!(
        fmt.format(&TypeData::Keyof(Box::new(union))),
        "keyof (string | null)"
    );
    assert_eq!(
        fmt.format(&TypeData::Literal(LiteralValue::BigInt(7))),
        "7n"
    );
}

#[test]
fn test_format_named_refs_and_members() {
    let mut graph = TypeGraph::new();
    let module = graph.add_module("./m");
    let b = graph.declare_type(module, "B", true, None).unwrap();
    let fmt = TypeFormatter::new(&graph);

    let local = TypeData::LocalRef {
        name: "B".to_string(),
        target: b,
    };
    assert_eq!(fmt.format(&local), "B");
    assert_eq!(fmt.format_named(b), "B");

    let member = TypeData::Member {
        of: Box::new(local),
        key: MemberKey::Literal {
            value: LiteralValue::String("a".to_string()),
        },
    };
    assert_eq!(fmt.format(&member), "B[\"a\"]");

    let qualified = TypeData::ImportedRef {
        name: "T".to_string(),
        namespace: Some("ns".to_string()),
        target: b,
    };
    assert_eq!(fmt.format(&qualified), "ns.T");
}

#[test]
fn test_format_interface_and_function() {
    let graph = TypeGraph::new();
    let fmt = TypeFormatter::new(&graph);

    let shape = InterfaceShape {
        index_signature: Some(IndexSignature {
            key_name: "k".to_string(),
            key_kind: IndexKeyKind::Number,
            value_type: primitive(PrimitiveName::Boolean),
            optional: false,
            readonly: false,
        }),
        mapped_index_signature: None,
        properties: vec![
            prop("a", primitive(PrimitiveName::String), false),
            prop("b", primitive(PrimitiveName::Number), true),
        ],
    };
    assert_eq!(
        fmt.format(&TypeData::Interface(Box::new(shape))),
        "{ [k: number]: boolean; a: string; b?: number }"
    );
    assert_eq!(
        fmt.format(&TypeData::Interface(Box::default())),
        "{}"
    );

    let function = TypeData::Function(FunctionShape {
        params: vec![
            ParamInfo {
                name: "x".to_string(),
                ty: Some(primitive(PrimitiveName::Number)),
                optional: false,
            },
            ParamInfo {
                name: "rest".to_string(),
                ty: None,
                optional: true,
            },
        ],
        return_type: Box::new(primitive(PrimitiveName::Undefined)),
        generics: vec![GenericParamInfo {
            name: "T".to_string(),
            constraint: Some(primitive(PrimitiveName::String)),
            default: None,
        }],
    });
    assert_eq!(
        fmt.format(&function),
        "<T extends string>(x: number, rest?) => undefined"
    );
}

#[test]
fn test_format_literal_escapes_strings() {
    assert_eq!(
        format_literal(&LiteralValue::String("say \"hi\"".to_string())),
        "\"say \\\"hi\\\"\""
    );
    assert_eq!(format_literal(&LiteralValue::Number(12.0)), "12");
    assert_eq!(format_literal(&LiteralValue::Boolean(false)), "false");
}
