//! Failure taxonomy for the env setup pipeline.
//!
//! Every failure is fatal. The binary maps each [`ErrorKind`] to its own
//! process exit status so a deploy step can tell them apart.

use serde_json::Value;
use std::io;
use thiserror::Error;

/// Coarse classification of an [`EnvSetupError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Parse,
    Schema,
    Serialization,
}

#[derive(Debug, Error)]
pub enum EnvSetupError {
    #[error("failed to read input file")]
    Read(#[source] io::Error),

    #[error("input is not valid JSON")]
    Parse(#[source] serde_json::Error),

    #[error("unexpected manifest shape")]
    Schema(#[from] SchemaError),

    #[error("failed to encode environment as JSON")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write output")]
    Write(#[source] io::Error),
}

/// The manifest parsed, but does not carry an `env` object where expected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("top-level value must be an object, found {found}")]
    DocumentNotAnObject { found: &'static str },

    #[error("missing top-level `env` key")]
    MissingEnv,

    #[error("`env` must be an object, found {found}")]
    EnvNotAnObject { found: &'static str },
}

impl EnvSetupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EnvSetupError::Read(_) | EnvSetupError::Write(_) => ErrorKind::Io,
            EnvSetupError::Parse(_) => ErrorKind::Parse,
            EnvSetupError::Schema(_) => ErrorKind::Schema,
            EnvSetupError::Serialize(_) => ErrorKind::Serialization,
        }
    }

    /// Process exit status for this failure, following `sysexits.h`.
    ///
    /// | Kind          | Code | Name        |
    /// |---------------|------|-------------|
    /// | Io            | 66   | EX_NOINPUT  |
    /// | Parse         | 65   | EX_DATAERR  |
    /// | Schema        | 78   | EX_CONFIG   |
    /// | Serialization | 70   | EX_SOFTWARE |
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::Io => 66,
            ErrorKind::Parse => 65,
            ErrorKind::Schema => 78,
            ErrorKind::Serialization => 70,
        }
    }
}

/// Name of a JSON value's type, as used in schema diagnostics.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
