use ers_core::attendee::{Attendee, PageRequest};
use ers_core::error::Result;

/// Storage for attendee records.
///
/// Listing methods return records ordered by id (insertion order).
pub trait AttendeeRepository: Send + Sync {
    /// Store an attendee. An `id` of `0` gets a fresh identifier; any other
    /// id replaces the existing record with that id.
    fn save(&self, attendee: Attendee) -> Result<Attendee>;

    fn delete_all(&self) -> Result<()>;

    fn find_all(&self) -> Vec<Attendee>;

    /// Case-insensitive substring match on the first name, one page.
    fn find_by_first_name_contains_ignore_case(
        &self,
        fragment: &str,
        page: PageRequest,
    ) -> Vec<Attendee>;

    fn count(&self) -> usize;
}
