//! Service definition loading.
//!
//! A service file declares the functions of a service together with their
//! optional `regions` and `stages` restrictions:
//!
//! ```toml
//! service = "billing"
//!
//! [functions.api]
//! handler = "src/api.handler"
//! regions = ["us-east-1"]
//! stages = ["prod"]
//! ```
//!
//! TOML and JSON are both accepted; the format follows the file extension.

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;
pub mod value;

pub use parser::{
    parse_service_file, parse_service_json_str, parse_service_str, parse_service_toml_str,
    to_json, to_toml,
};
pub use paths::{DEFAULT_SERVICE_FILES, ServiceFormat, discover_service_file};
pub use schema::{FunctionEntry, FunctionTable, ProviderConfig, ServiceConfig};
pub use store::ServiceStore;
