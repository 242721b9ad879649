// Profile module - language registry for snippet execution
#![allow(unused_imports)]

pub mod config;
pub mod error;
pub mod registry;
pub mod types;

pub use config::{LanguageEntry, SnippetsConfig};
pub use error::{ProfileError, Result};
pub use registry::Registry;
pub use types::{LanguageProfile, TimeoutSpec};
