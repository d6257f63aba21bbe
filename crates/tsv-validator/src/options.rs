//! Validator configuration.

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a boolean that may also be spelled as a string
/// (`"true"`, `"off"`, `"1"` ...).
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

const fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorOptions {
    /// Whether values may carry keys their interface does not declare.
    ///
    /// Carried for configuration compatibility only: undeclared keys are
    /// accepted whatever this says.
    #[serde(default = "default_true", deserialize_with = "deserialize_bool_or_string")]
    pub accept_additional_props: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            accept_additional_props: true,
        }
    }
}

impl ValidatorOptions {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
