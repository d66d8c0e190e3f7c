pub mod attendees;
pub mod health;
pub mod platform;
