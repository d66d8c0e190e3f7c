pub mod attendee;
pub mod config;
pub mod env;
pub mod error;
pub mod platform;

pub use attendee::{Attendee, AttendeeForm, PageRequest};
pub use config::ServerConfig;
pub use env::{EnvSource, ProcessEnv, StaticEnv};
pub use error::{ErsError, Result};
pub use platform::{BoundService, DeploymentDescriptor, RuntimeSnapshot, ServiceBindings};
