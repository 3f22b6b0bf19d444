use serde::{Deserialize, Serialize};

use crate::features::sync::{Keyed, Scoped};
use crate::features::tickets::services::status_normalizer::normalize;

/// Canonical display status of a ticket.
///
/// Only produced by [`normalize`]; statuses the client does not recognise are
/// carried verbatim in `Other` instead of being coerced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DisplayStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    Unknown,
    Other(String),
}

impl std::fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayStatus::Pending => write!(f, "Pending"),
            DisplayStatus::InProgress => write!(f, "In Progress"),
            DisplayStatus::Completed => write!(f, "Completed"),
            DisplayStatus::Cancelled => write!(f, "Cancelled"),
            DisplayStatus::Unknown => write!(f, "Unknown"),
            DisplayStatus::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Ticket record as sent by the backend and the live feed.
///
/// Feed events may carry only `ticketId` and `status`; every other field is
/// optional so partial records deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    pub ticket_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(
        default,
        rename = "status",
        alias = "rawStatus",
        skip_serializing_if = "Option::is_none"
    )]
    pub raw_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_staff: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Keyed for TicketRecord {
    fn key(&self) -> &str {
        &self.ticket_id
    }
}

impl Scoped for TicketRecord {
    fn ticket_id(&self) -> &str {
        &self.ticket_id
    }

    fn customer_email(&self) -> Option<&str> {
        self.customer_email.as_deref()
    }
}

/// Display-oriented projection of a ticket, one per list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketViewModel {
    pub ticket_id: String,
    pub title: Option<String>,
    pub service_type: Option<String>,
    pub raw_status: Option<String>,
    /// Optional colour override, e.g. "#FF9800"
    pub status_color: Option<String>,
    pub assigned_staff: Option<String>,
    /// Opaque display string, never parsed for ordering
    pub created_at: Option<String>,
}

impl TicketViewModel {
    pub fn new(ticket_id: impl Into<String>) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            title: None,
            service_type: None,
            raw_status: None,
            status_color: None,
            assigned_staff: None,
            created_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_raw_status(mut self, status: impl Into<String>) -> Self {
        self.raw_status = Some(status.into());
        self
    }

    /// Derived on every call so it can never drift from `raw_status`.
    pub fn display_status(&self) -> DisplayStatus {
        normalize(self.raw_status.as_deref())
    }

    /// Overlay the fields present in `record` (last writer wins per field).
    pub fn apply(&mut self, record: TicketRecord) {
        let TicketRecord {
            ticket_id: _,
            title,
            service_type,
            raw_status,
            status_color,
            assigned_staff,
            customer_email: _,
            created_at,
        } = record;

        if title.is_some() {
            self.title = title;
        }
        if service_type.is_some() {
            self.service_type = service_type;
        }
        if raw_status.is_some() {
            self.raw_status = raw_status;
        }
        if status_color.is_some() {
            self.status_color = status_color;
        }
        if assigned_staff.is_some() {
            self.assigned_staff = assigned_staff;
        }
        if created_at.is_some() {
            self.created_at = created_at;
        }
    }
}

impl From<TicketRecord> for TicketViewModel {
    fn from(r: TicketRecord) -> Self {
        Self {
            ticket_id: r.ticket_id,
            title: r.title,
            service_type: r.service_type,
            raw_status: r.raw_status,
            status_color: r.status_color,
            assigned_staff: r.assigned_staff,
            created_at: r.created_at,
        }
    }
}

impl Keyed for TicketViewModel {
    fn key(&self) -> &str {
        &self.ticket_id
    }
}
