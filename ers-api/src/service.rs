use ers_core::attendee::{Attendee, AttendeeForm, PageRequest};
use ers_core::error::Result;
use ers_store::AttendeeRepository;
use std::sync::Arc;
use tracing::info;

/// Attendee operations exposed to the HTTP layer.
///
/// Keeps handlers away from the repository; every method is a straight
/// delegation.
#[derive(Clone)]
pub struct AttendeeService {
    repo: Arc<dyn AttendeeRepository>,
}

impl AttendeeService {
    pub fn new(repo: Arc<dyn AttendeeRepository>) -> Self {
        Self { repo }
    }

    /// Copy a client-submitted form into a new record and store it.
    pub fn translate_and_store(&self, form: AttendeeForm) -> Result<Attendee> {
        let stored = self.repo.save(Attendee::from(form))?;
        info!(id = stored.id, "Attendee added");
        Ok(stored)
    }

    pub fn delete_all_attendees(&self) -> Result<()> {
        self.repo.delete_all()?;
        info!("All attendees deleted");
        Ok(())
    }

    pub fn list_all_attendees(&self) -> Vec<Attendee> {
        self.repo.find_all()
    }

    /// First page of attendees whose first name contains `fragment`,
    /// ignoring case.
    pub fn search_attendees_by_first_name_fragment(&self, fragment: &str) -> Vec<Attendee> {
        self.repo
            .find_by_first_name_contains_ignore_case(fragment, PageRequest::first())
    }

    pub fn count(&self) -> usize {
        self.repo.count()
    }
}
