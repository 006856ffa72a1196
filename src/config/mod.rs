//! Typed configuration loading for braidcfg

pub mod parser;
pub mod persistence;
pub mod schema;
pub mod table;
pub mod value;

pub use parser::{coerce_value, parse_file, ConfigParseError, ConfigParser};
pub use persistence::WriteError;
pub use schema::{Classification, SchemaRegistry, ValueKind};
pub use table::{ConfigTable, LookupError};
pub use value::ConfigValue;
