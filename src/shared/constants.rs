/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size the backend accepts
pub const MAX_PAGE_SIZE: i64 = 100;

/// Upper bound on pages walked for one full-list fetch
pub const MAX_LIST_PAGES: i64 = 50;

// =============================================================================
// DISPLAY LABELS
// =============================================================================

/// Label for a ticket row that has no title
pub const DEFAULT_TICKET_LABEL: &str = "Service Request";

/// Default label of the payment action control
pub const PAY_NOW_LABEL: &str = "Pay Now";

/// Label shown instead of the pay action while cash is being collected
pub const AWAITING_CASH_LABEL: &str = "Awaiting Cash Collection";

/// Label shown once a payment has been settled
pub const PAID_LABEL: &str = "Paid";

/// Label shown while the payment record is not yet actionable
pub const PAYMENT_UNAVAILABLE_LABEL: &str = "Payment Not Ready";

// =============================================================================
// PAYMENT VOCABULARY
// =============================================================================

pub const PAYMENT_STATUS_PENDING: &str = "pending";
pub const PAYMENT_STATUS_COMPLETED: &str = "completed";

pub const PAYMENT_METHOD_ONLINE: &str = "online";
pub const PAYMENT_METHOD_CASH: &str = "cash";

// =============================================================================
// TICKET DEFAULTS
// =============================================================================

/// Raw status assumed for a freshly created ticket when the backend omits it
pub const NEW_TICKET_STATUS: &str = "open";
