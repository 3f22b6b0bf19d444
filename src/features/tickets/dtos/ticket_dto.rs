use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::tickets::models::TicketRecord;

/// Request DTO for submitting a new service ticket
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketDto {
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 60, message = "Service type is required"))]
    pub service_type: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,

    #[validate(email(message = "Invalid email format"))]
    pub customer_email: String,

    #[validate(length(min = 1, max = 255, message = "Address must be 1-255 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<NaiveDate>,
}

/// Payload of the ticket list endpoint
#[derive(Debug, Deserialize)]
pub struct TicketListBody {
    #[serde(default)]
    pub tickets: Vec<TicketRecord>,
}

/// Payload of the ticket creation endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCreatedBody {
    #[serde(default)]
    pub ticket_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "ticketRecord")]
    pub ticket: Option<TicketRecord>,
}

/// Result of a successful ticket submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketCreatedDto {
    pub ticket_id: String,
    pub status: String,
}
