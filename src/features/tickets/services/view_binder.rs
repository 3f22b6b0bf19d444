use serde::Serialize;

use crate::features::tickets::models::{DisplayStatus, TicketViewModel};
use crate::shared::constants::DEFAULT_TICKET_LABEL;
use crate::shared::validation::HEX_COLOR_REGEX;

/// Colour of a status badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Amber,
    Blue,
    Green,
    Red,
    Gray,
    /// Backend-supplied override, normalised to uppercase `#RRGGBB`/`#AARRGGBB`
    Custom(String),
}

impl ColorToken {
    /// Fixed palette keyed by display status. Unrecognised statuses render gray.
    pub fn for_status(status: &DisplayStatus) -> Self {
        match status {
            DisplayStatus::Pending => ColorToken::Amber,
            DisplayStatus::InProgress => ColorToken::Blue,
            DisplayStatus::Completed => ColorToken::Green,
            DisplayStatus::Cancelled => ColorToken::Red,
            DisplayStatus::Unknown | DisplayStatus::Other(_) => ColorToken::Gray,
        }
    }

    /// Parse an override colour; `None` if it is not a valid hex colour.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if HEX_COLOR_REGEX.is_match(raw) {
            Some(ColorToken::Custom(raw.to_uppercase()))
        } else {
            None
        }
    }

    pub fn hex(&self) -> &str {
        match self {
            ColorToken::Amber => "#FFA000",
            ColorToken::Blue => "#2196F3",
            ColorToken::Green => "#4CAF50",
            ColorToken::Red => "#F44336",
            ColorToken::Gray => "#9E9E9E",
            ColorToken::Custom(hex) => hex,
        }
    }
}

/// Display fields of one ticket row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundTicket {
    pub ticket_id: String,
    pub label: String,
    pub status_text: String,
    pub color_token: ColorToken,
    pub pay_action_visible: bool,
}

/// Render a ticket view-model. Pure: no store or network access.
pub fn bind(item: &TicketViewModel) -> BoundTicket {
    let status = item.display_status();

    let color_token = item
        .status_color
        .as_deref()
        .and_then(ColorToken::parse)
        .unwrap_or_else(|| ColorToken::for_status(&status));

    BoundTicket {
        ticket_id: item.ticket_id.clone(),
        label: item
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TICKET_LABEL.to_string()),
        status_text: status.to_string(),
        color_token,
        pay_action_visible: status == DisplayStatus::Completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(raw_status: Option<&str>) -> TicketViewModel {
        TicketViewModel {
            raw_status: raw_status.map(String::from),
            ..TicketViewModel::new("TCK-1")
        }
    }

    #[test]
    fn test_label_falls_back_to_default() {
        assert_eq!(bind(&ticket(Some("open"))).label, "Service Request");

        let titled = ticket(Some("open")).with_title("Leaking faucet");
        assert_eq!(bind(&titled).label, "Leaking faucet");
    }

    #[test]
    fn test_palette() {
        let cases = [
            (Some("open"), ColorToken::Amber),
            (Some("assigned"), ColorToken::Blue),
            (Some("completed"), ColorToken::Green),
            (Some("rejected"), ColorToken::Red),
            (None, ColorToken::Gray),
            (Some("on hold"), ColorToken::Gray),
        ];
        for (raw, expected) in cases {
            assert_eq!(bind(&ticket(raw)).color_token, expected, "{:?}", raw);
        }
    }

    #[test]
    fn test_valid_override_wins() {
        let mut item = ticket(Some("open"));
        item.status_color = Some("#ff5722".to_string());
        assert_eq!(
            bind(&item).color_token,
            ColorToken::Custom("#FF5722".to_string())
        );
    }

    #[test]
    fn test_invalid_override_ignored() {
        let mut item = ticket(Some("completed"));
        item.status_color = Some("greenish".to_string());
        assert_eq!(bind(&item).color_token, ColorToken::Green);
    }

    #[test]
    fn test_pay_action_only_when_completed() {
        let cases = [
            (Some("open"), false),
            (Some("active"), false),
            (Some("Completed"), true),
            (Some("cancelled"), false),
            (Some("awaiting parts"), false),
            (None, false),
        ];
        for (raw, visible) in cases {
            assert_eq!(bind(&ticket(raw)).pay_action_visible, visible, "{:?}", raw);
        }
    }

    #[test]
    fn test_unrecognised_status_renders_raw_text() {
        let bound = bind(&ticket(Some("Awaiting Parts")));
        assert_eq!(bound.status_text, "Awaiting Parts");
        assert_eq!(bound.color_token.hex(), "#9E9E9E");
    }
}
