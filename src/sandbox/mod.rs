// Sandbox module - isolated, resource-bounded snippet execution
#![allow(unused_imports)]

pub mod config;
pub mod error;
pub mod executor;
pub mod runtime;
pub mod types;

pub use config::SandboxConfig;
pub use error::{ExecutionError, Result};
pub use executor::SandboxExecutor;
pub use runtime::{ContainerRuntime, DockerRuntime, docker_args};
pub use types::{ContainerOutput, ContainerRequest, ExecutionResult, Mount};
