//! Linking errors.
//!
//! Every variant is fatal: a graph that fails to link is never handed out.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("failed to load module '{path}'")]
    Load {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid module specifier '{specifier}' in {}", importer_label(.importer))]
    InvalidSpecifier {
        specifier: String,
        importer: Option<String>,
    },

    #[error("cannot resolve package '{specifier}' imported by {}", importer_label(.importer))]
    UnresolvedPackage {
        specifier: String,
        importer: Option<String>,
    },

    #[error("duplicate name '{name}' in module '{module}'")]
    DuplicateName { module: String, name: String },

    #[error("module '{from}' has no exported member '{member}' (imported by '{module}')")]
    UnknownExportedMember {
        module: String,
        from: String,
        member: String,
    },

    #[error("unknown namespace '{namespace}' in type '{type_name}' of module '{module}'")]
    UnknownNamespace {
        module: String,
        type_name: String,
        namespace: String,
    },

    #[error("unresolved reference '{reference}' in type '{type_name}' of module '{module}'")]
    UnresolvedReference {
        module: String,
        type_name: String,
        reference: String,
    },

    #[error("unknown {category} name '{name}' in type '{type_name}' of module '{module}'")]
    UnknownIntrinsic {
        module: String,
        type_name: String,
        category: &'static str,
        name: String,
    },

    #[error("invalid interface in type '{type_name}' of module '{module}': {reason}")]
    InvalidInterface {
        module: String,
        type_name: String,
        reason: InterfaceShapeError,
    },
}

/// Why an interface body cannot be folded into a linked shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterfaceShapeError {
    #[error("more than one index signature")]
    MultipleIndexSignatures,
    #[error("a mapped index signature cannot be combined with other entries")]
    MappedWithOtherEntries,
    #[error("duplicate property '{0}'")]
    DuplicateProperty(String),
}

fn importer_label(importer: &Option<String>) -> String {
    match importer {
        Some(path) => format!("'{path}'"),
        None => "the entry paths".to_string(),
    }
}
