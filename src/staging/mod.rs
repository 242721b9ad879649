// Staging module - persists fetched snippets for the sandbox mount

pub mod error;
pub mod ids;
pub mod store;

pub use error::PersistError;
pub use ids::{JobIdGenerator, RandomJobIds};
pub use store::StagingStore;
