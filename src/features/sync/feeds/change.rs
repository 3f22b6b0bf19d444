use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::features::sync::Keyed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
    #[serde(alias = "ADDED", alias = "added")]
    Added,
    #[serde(alias = "MODIFIED", alias = "modified")]
    Modified,
    #[serde(alias = "REMOVED", alias = "removed")]
    Removed,
}

/// One incremental event from a live feed.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T> {
    Added(T),
    Modified(T),
    /// Only the key survives a removal
    Removed(String),
}

impl<T: Keyed> Change<T> {
    pub fn key(&self) -> &str {
        match self {
            Change::Added(item) | Change::Modified(item) => item.key(),
            Change::Removed(key) => key,
        }
    }

    pub fn change_type(&self) -> ChangeType {
        match self {
            Change::Added(_) => ChangeType::Added,
            Change::Modified(_) => ChangeType::Modified,
            Change::Removed(_) => ChangeType::Removed,
        }
    }
}

/// Wire form of a change: `{"changeType": "Modified", "ticketId": ..., ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEnvelope<T> {
    pub change_type: ChangeType,
    #[serde(flatten)]
    pub record: T,
}

impl<T: Keyed> From<ChangeEnvelope<T>> for Change<T> {
    fn from(envelope: ChangeEnvelope<T>) -> Self {
        match envelope.change_type {
            ChangeType::Added => Change::Added(envelope.record),
            ChangeType::Modified => Change::Modified(envelope.record),
            ChangeType::Removed => Change::Removed(envelope.record.key().to_string()),
        }
    }
}

/// Records that can be matched against a [`FeedFilter`].
pub trait Scoped: Keyed {
    fn ticket_id(&self) -> &str;
    fn customer_email(&self) -> Option<&str>;
}

/// Subscription filter: a customer, optionally narrowed to one ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFilter {
    pub customer_email: String,
    pub ticket_id: Option<String>,
}

impl FeedFilter {
    pub fn customer(email: impl Into<String>) -> Self {
        Self {
            customer_email: email.into(),
            ticket_id: None,
        }
    }

    pub fn for_ticket(mut self, ticket_id: impl Into<String>) -> Self {
        self.ticket_id = Some(ticket_id.into());
        self
    }

    /// Records without a customer email cannot be excluded by customer and pass.
    pub fn accepts<T: Scoped>(&self, record: &T) -> bool {
        let customer_ok = record
            .customer_email()
            .map(|email| email.eq_ignore_ascii_case(&self.customer_email))
            .unwrap_or(true);

        let ticket_ok = self
            .ticket_id
            .as_deref()
            .map(|id| id == record.ticket_id())
            .unwrap_or(true);

        customer_ok && ticket_ok
    }
}

/// Changes that turn snapshot `previous` into snapshot `next`.
///
/// Additions and modifications follow `next` order; removals come last in
/// `previous` order.
pub fn diff_snapshots<T>(previous: &[T], next: &[T]) -> Vec<Change<T>>
where
    T: Keyed + PartialEq + Clone,
{
    let before: HashMap<&str, &T> = previous.iter().map(|item| (item.key(), item)).collect();
    let after: HashMap<&str, &T> = next.iter().map(|item| (item.key(), item)).collect();

    let mut changes = Vec::new();

    for item in next {
        match before.get(item.key()) {
            None => changes.push(Change::Added(item.clone())),
            Some(old) if *old != item => changes.push(Change::Modified(item.clone())),
            Some(_) => {}
        }
    }

    for item in previous {
        if !after.contains_key(item.key()) {
            changes.push(Change::Removed(item.key().to_string()));
        }
    }

    changes
}
