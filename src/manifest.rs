//! Loading of the app manifest that declares a deployment's environment.
//!
//! Only the top-level `env` object matters here. Each member maps a
//! variable name to a definition object; definitions that carry a `value`
//! are literals, the rest are supplied elsewhere (secrets, add-ons,
//! generators) and have no value in the manifest.

use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

use crate::error::{EnvSetupError, SchemaError, json_type_name};

const ENV_KEY: &str = "env";
const VALUE_KEY: &str = "value";

/// The `env` section of a parsed manifest, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct AppManifest {
    env: Map<String, Value>,
}

/// One member of the manifest's `env` object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvEntry<'a> {
    pub name: &'a str,
    pub definition: &'a Value,
}

impl AppManifest {
    /// Reads the whole file at `path` and parses it.
    ///
    /// The file is closed before parsing begins.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EnvSetupError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(EnvSetupError::Read)?;
        debug!(bytes = content.len(), "Manifest read");
        Self::from_json(&content)
    }

    /// Parses manifest text and extracts its `env` object.
    ///
    /// # Errors
    ///
    /// [`EnvSetupError::Parse`] if `text` is not JSON, and
    /// [`EnvSetupError::Schema`] if there is no top-level `env` object.
    pub fn from_json(text: &str) -> Result<Self, EnvSetupError> {
        let document: Value = serde_json::from_str(text).map_err(EnvSetupError::Parse)?;
        Self::from_value(document)
    }

    pub fn from_value(document: Value) -> Result<Self, EnvSetupError> {
        let mut root = match document {
            Value::Object(root) => root,
            other => {
                return Err(SchemaError::DocumentNotAnObject {
                    found: json_type_name(&other),
                }
                .into());
            }
        };

        match root.remove(ENV_KEY) {
            Some(Value::Object(env)) => Ok(Self { env }),
            Some(other) => Err(SchemaError::EnvNotAnObject {
                found: json_type_name(&other),
            }
            .into()),
            None => Err(SchemaError::MissingEnv.into()),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = EnvEntry<'_>> {
        self.env
            .iter()
            .map(|(name, definition)| EnvEntry { name, definition })
    }

    pub fn len(&self) -> usize {
        self.env.len()
    }

    pub fn is_empty(&self) -> bool {
        self.env.is_empty()
    }
}

impl<'a> EnvEntry<'a> {
    /// The literal `value` of this definition, if it has one.
    ///
    /// An explicit `"value": null` is still a value. Definitions that are
    /// not objects never have one.
    pub fn literal_value(&self) -> Option<&'a Value> {
        self.definition.as_object()?.get(VALUE_KEY)
    }
}
