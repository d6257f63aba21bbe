use super::*;
use crate::types::IndexKeyKind;

#[test]
fn test_deserialize_module_json() {
    let json = r#"{
        "imports": [{ "fromPath": "./b.ts", "members": [{ "exportedName": "B", "localAlias": "Bee" }] }],
        "namespacedImports": [{ "fromPath": "./c", "localNamespace": "C" }],
        "namedTypes": [
            {
                "name": "A",
                "exported": true,
                "docComment": "An A.",
                "body": {
                    "kind": "interface",
                    "extends": [{ "kind": "importedRef", "refName": "Bee" }],
                    "entries": [
                        { "kind": "indexSignature", "keyName": "k", "keyKind": "number",
                          "valueType": { "kind": "nameRef", "category": "primitive", "refName": "boolean" } },
                        { "kind": "property", "name": "c",
                          "type": { "kind": "importedRef", "refName": "T", "namespace": "C" },
                          "optional": true }
                    ]
                }
            },
            {
                "name": "L",
                "body": { "kind": "composite", "op": "union", "members": [
                    { "kind": "literal", "value": { "type": "string", "value": "12" } },
                    { "kind": "literal", "value": { "type": "bigint", "value": "12" } }
                ] }
            }
        ]
    }"#;

    let module: RawModule = serde_json::from_str(json).expect("valid raw module");
    assert_eq!(module.imports[0].members[0].local_name(), "Bee");
    assert_eq!(module.namespaced_imports[0].local_namespace, "C");
    assert_eq!(module.import_paths().collect::<Vec<_>>(), vec!["./b.ts", "./c"]);

    let a = &module.named_types[0];
    assert!(a.exported);
    assert_eq!(a.doc_comment.as_deref(), Some("An A."));
    let RawType::Interface(interface) = &a.body else {
        panic!("expected interface, got {:?}", a.body);
    };
    assert_eq!(interface.extends, vec![RawType::imported("Bee")]);
    assert!(matches!(
        &interface.entries[0],
        RawInterfaceEntry::IndexSignature(sig) if sig.key_kind == IndexKeyKind::Number
    ));
    assert!(matches!(
        &interface.entries[1],
        RawInterfaceEntry::Property(prop) if prop.optional && prop.ty == RawType::qualified("C", "T")
    ));

    let l = &module.named_types[1];
    assert!(!l.exported);
    assert_eq!(
        l.body,
        RawType::union(vec![
            RawType::string_literal("12"),
            RawType::literal(LiteralValue::BigInt(12)),
        ])
    );
}

#[test]
fn test_builder_output_serializes_back() {
    let module = RawModule::new()
        .with_import("./b", [("B", None)])
        .with_type(RawNamedType::exported(
            "A",
            RawInterface::new()
                .property("a", RawType::primitive("number"))
                .optional_property("b", RawType::array(RawType::imported("B")))
                .into(),
        ));

    let json = serde_json::to_value(&module).expect("serializable");
    assert_eq!(json["imports"][0]["fromPath"], "./b");
    assert_eq!(json["namedTypes"][0]["body"]["kind"], "interface");
    assert_eq!(
        json["namedTypes"][0]["body"]["entries"][1]["type"]["item"]["refName"],
        "B"
    );
    assert!(json.get("namespacedImports").is_none());

    let back: RawModule = serde_json::from_value(json).expect("round trip");
    assert_eq!(back, module);
}

#[test]
fn test_invalid_bigint_literal_is_rejected() {
    let json = r#"{ "kind": "literal", "value": { "type": "bigint", "value": "twelve" } }"#;
    let err = serde_json::from_str::<RawType>(json).unwrap_err();
    assert!(err.to_string().contains("invalid bigint literal"));
}

#[test]
fn test_flat_interface_form_folds_into_entries() {
    let json = r#"{
        "kind": "interface",
        "properties": [
            { "name": "a", "type": { "kind": "nameRef", "category": "primitive", "refName": "number" } },
            { "name": "b", "type": { "kind": "nameRef", "category": "primitive", "refName": "string" }, "readonly": true }
        ],
        "indexSignature": {
            "keyName": "k", "keyKind": "string",
            "valueType": { "kind": "nameRef", "category": "special", "refName": "unknown" }
        }
    }"#;
    let RawType::Interface(interface) = serde_json::from_str::<RawType>(json).unwrap() else {
        panic!("expected interface");
    };
    assert_eq!(interface.entries.len(), 3);
    assert!(matches!(
        &interface.entries[0],
        RawInterfaceEntry::IndexSignature(sig) if sig.key_kind == IndexKeyKind::String
    ));
    assert!(matches!(
        &interface.entries[1],
        RawInterfaceEntry::Property(prop) if prop.name == "a" && !prop.readonly
    ));
    assert!(matches!(
        &interface.entries[2],
        RawInterfaceEntry::Property(prop) if prop.name == "b" && prop.readonly
    ));

    // Always written back in the entries form.
    let json = serde_json::to_value(RawType::Interface(interface)).unwrap();
    assert!(json.get("properties").is_none());
    assert_eq!(json["entries"][2]["kind"], "property");
}

#[test]
fn test_unknown_fields_are_rejected() {
    let misspelled = [
        r#"{ "namedType": [] }"#,
        r#"{ "imports": [{ "fromPath": "./b", "members": [{ "exportName": "B" }] }] }"#,
        r#"{ "namedTypes": [{ "name": "A", "exported": true, "bdy": { "kind": "localRef", "refName": "A" } }] }"#,
        r#"{ "namedTypes": [{ "name": "A", "body": { "kind": "interface", "props": [] } }] }"#,
        r#"{ "namedTypes": [{ "name": "A", "body": { "kind": "localRef", "ref": "B" } }] }"#,
        r#"{ "namedTypes": [{ "name": "A", "body": { "kind": "interface", "entries": [
            { "kind": "property", "name": "a", "typ": { "kind": "localRef", "refName": "A" } }
        ] } }] }"#,
    ];
    for json in misspelled {
        let err = serde_json::from_str::<RawModule>(json).unwrap_err();
        assert!(err.to_string().contains("unknown field"), "{json}: {err}");
    }
}

#[test]
fn test_bigint_literal_tag() {
    let json = serde_json::to_value(RawType::literal(LiteralValue::BigInt(-9))).unwrap();
    assert_eq!(json["value"]["type"], "bigint");
    assert_eq!(json["value"]["value"], "-9");

    let parsed: RawType =
        serde_json::from_str(r#"{ "kind": "literal", "value": { "type": "bigint", "value": "40n" } }"#)
            .unwrap();
    assert_eq!(parsed, RawType::literal(LiteralValue::BigInt(40)));
}
