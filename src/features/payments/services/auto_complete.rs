use crate::features::payments::models::PaymentViewModel;

/// One-shot latch deciding whether a payment screen completes an online
/// payment on its own.
///
/// Scoped to one screen instance: the same pending payment seen again (from
/// REST and then the live feed, say) does not trigger a second completion.
/// A fresh screen starts with a fresh latch.
#[derive(Debug, Default)]
pub struct AutoCompleteLatch {
    fired: bool,
}

impl AutoCompleteLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// True at most once per latch, and only for pending online payments.
    /// Cash payments never fire and never consume the latch.
    pub fn should_auto_complete(&mut self, payment: &PaymentViewModel) -> bool {
        if self.fired || !payment.is_pending() || !payment.is_online() {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}
