pub mod connect;
pub mod error;
pub mod handlers;
pub mod server;
pub mod service;

pub use server::{ApiState, build_router, serve};
pub use service::AttendeeService;
