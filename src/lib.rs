pub mod error;
pub mod manifest;
pub mod output;
pub mod transform;

pub use error::{EnvSetupError, ErrorKind, SchemaError};
pub use manifest::{AppManifest, EnvEntry};
pub use output::{to_json_pretty, write_env};
pub use transform::{FlatEnv, flatten_env};
