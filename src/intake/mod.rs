// Intake module - receives platform events relayed over UDP

pub mod config;
pub mod dedup;
pub mod error;
pub mod protocol;
pub mod server;
pub mod types;

pub use config::IntakeConfig;
pub use server::Intake;
pub use types::InboundEvent;
