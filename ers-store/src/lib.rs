pub mod memory;
pub mod persist;
pub mod repository;

pub use memory::AttendeeStore;
pub use repository::AttendeeRepository;
