//! Configuration management module
//!
//! Configuration is resolved in layers: built-in defaults, then a `.env`
//! file, then `MPM_*` environment variables, then command-line arguments.

pub mod env;
pub mod parser;
pub mod validation;

pub use env::EnvManager;
pub use parser::{display_config_summary, load_config, ConfigParser};
pub use validation::{ConfigValidator, ValidationLevel, ValidationWarning};
