use crate::features::tickets::models::DisplayStatus;

/// Map a raw backend status onto the canonical display set.
///
/// Matching is trimmed and case-insensitive. Unrecognised text passes through
/// as `Other` (trimmed, original casing); absent or blank input is `Unknown`.
pub fn normalize(raw: Option<&str>) -> DisplayStatus {
    let Some(raw) = raw else {
        return DisplayStatus::Unknown;
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DisplayStatus::Unknown;
    }

    match trimmed.to_lowercase().as_str() {
        "open" => DisplayStatus::Pending,
        "active" | "accepted" | "assigned" | "ongoing" => DisplayStatus::InProgress,
        "completed" => DisplayStatus::Completed,
        "cancelled" | "rejected" => DisplayStatus::Cancelled,
        _ => DisplayStatus::Other(trimmed.to_string()),
    }
}
