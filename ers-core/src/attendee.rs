use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of records returned by a paged query.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// A registered attendee as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    /// Store-assigned identifier. `0` means "not yet stored".
    #[serde(default)]
    pub id: u64,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    #[serde(default)]
    pub email_address: String,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Attendee fields as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email_address: String,
}

impl From<AttendeeForm> for Attendee {
    fn from(form: AttendeeForm) -> Self {
        Self {
            id: 0,
            first_name: form.first_name,
            last_name: form.last_name,
            email_address: form.email_address,
            created_at: None,
        }
    }
}

/// Zero-based page selector for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Self {
        Self { page, size }
    }

    /// The first page with the default page size.
    pub fn first() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }

    /// Number of records to skip before this page starts.
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}
