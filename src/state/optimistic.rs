//! Optimistic cart-line state machine.
//!
//! Each cart line owns one [`OptimisticQuantity`]. User actions update the
//! displayed quantity immediately and hand back a [`DispatchedMutation`] for
//! the caller to send; when the request settles the caller reports the
//! outcome through [`OptimisticQuantity::settle`], which commits or rolls back.
//!
//! Mutations for the same line are neither coalesced nor sequenced. Each one
//! settles independently and the display reflects whichever settled last.

use crate::domain::cart::CartMutation;
use crate::domain::mutation::MutationOutcome;
use crate::domain::types::CartItemId;
use crate::state::notification::{GENERIC_FAILURE, Notification};

/// The decrement control turns into a "remove" control at exactly one.
pub fn shows_remove(quantity: u32) -> bool {
    quantity == 1
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationPhase {
    /// Nothing dispatched since the line was created or reconciled.
    Idle,
    /// At least one request is in flight.
    Pending,
    /// The last settled request succeeded.
    Committed,
    /// The last settled request failed and the quantity was restored.
    RolledBack,
}

/// Identifies one dispatched request of a cart line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MutationTicket(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchedMutation {
    pub ticket: MutationTicket,
    pub mutation: CartMutation,
}

#[derive(Debug)]
pub struct OptimisticQuantity {
    cart_item_id: CartItemId,
    server_quantity: u32,
    confirmed: u32,
    displayed: u32,
    in_flight: usize,
    phase: MutationPhase,
    next_ticket: u64,
}

impl OptimisticQuantity {
    pub fn new(cart_item_id: CartItemId, server_quantity: u32) -> Self {
        Self {
            cart_item_id,
            server_quantity,
            confirmed: server_quantity,
            displayed: server_quantity,
            in_flight: 0,
            phase: MutationPhase::Idle,
            next_ticket: 0,
        }
    }

    pub fn cart_item_id(&self) -> &CartItemId {
        &self.cart_item_id
    }

    /// Quantity currently shown to the user.
    pub fn displayed(&self) -> u32 {
        self.displayed
    }

    /// Last quantity the server is known to hold.
    pub fn confirmed(&self) -> u32 {
        self.confirmed
    }

    pub fn phase(&self) -> MutationPhase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight > 0
    }

    pub fn shows_remove_affordance(&self) -> bool {
        shows_remove(self.displayed)
    }

    /// The line is dimmed while a request that may remove it is in flight.
    pub fn is_loading(&self) -> bool {
        self.is_pending() && self.displayed == 0
    }

    pub fn increment(&mut self) -> DispatchedMutation {
        self.displayed = self.displayed.saturating_add(1);
        self.dispatch(CartMutation::UpdateQuantity {
            cart_item_id: self.cart_item_id.clone(),
            quantity: self.displayed,
        })
    }

    /// Lowers the quantity by one. At zero nothing changes and no request is
    /// produced. Removal at one is left to the backend.
    pub fn decrement(&mut self) -> Option<DispatchedMutation> {
        if self.displayed == 0 {
            return None;
        }
        self.displayed -= 1;
        Some(self.dispatch(CartMutation::UpdateQuantity {
            cart_item_id: self.cart_item_id.clone(),
            quantity: self.displayed,
        }))
    }

    /// The checkbox tracks its own checked state; only the request is produced.
    pub fn toggle_selected(&mut self) -> DispatchedMutation {
        self.dispatch(CartMutation::ToggleSelected {
            cart_item_id: self.cart_item_id.clone(),
        })
    }

    /// Resets to the server quantity whenever it changes.
    pub fn reconcile(&mut self, server_quantity: u32) {
        if server_quantity == self.server_quantity {
            return;
        }
        self.server_quantity = server_quantity;
        self.confirmed = server_quantity;
        self.displayed = server_quantity;
    }

    /// Records the outcome of a dispatched request.
    ///
    /// A failed quantity update restores the last confirmed quantity and
    /// returns an error notification. There is no retry.
    pub fn settle(
        &mut self,
        dispatched: &DispatchedMutation,
        outcome: &MutationOutcome,
    ) -> Option<Notification> {
        if dispatched.mutation.cart_item_id() != &self.cart_item_id {
            log::warn!(
                "Ignoring outcome for cart item {} on line {}",
                dispatched.mutation.cart_item_id(),
                self.cart_item_id
            );
            return None;
        }

        self.in_flight = self.in_flight.saturating_sub(1);

        if outcome.success {
            if let CartMutation::UpdateQuantity { quantity, .. } = dispatched.mutation {
                self.confirmed = quantity;
            }
            self.phase = self.settled_phase(MutationPhase::Committed);
            return None;
        }

        log::error!(
            "Cart mutation {:?} failed for item {}: {:?}",
            dispatched.ticket,
            self.cart_item_id,
            outcome.error_msg
        );
        if let CartMutation::UpdateQuantity { .. } = dispatched.mutation {
            self.displayed = self.confirmed;
        }
        self.phase = self.settled_phase(MutationPhase::RolledBack);
        Some(Notification::error(
            outcome
                .error_msg
                .clone()
                .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        ))
    }

    fn settled_phase(&self, settled: MutationPhase) -> MutationPhase {
        if self.in_flight > 0 {
            MutationPhase::Pending
        } else {
            settled
        }
    }

    fn dispatch(&mut self, mutation: CartMutation) -> DispatchedMutation {
        self.next_ticket += 1;
        self.in_flight += 1;
        self.phase = MutationPhase::Pending;
        DispatchedMutation {
            ticket: MutationTicket(self.next_ticket),
            mutation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::notification::NotificationLevel;

    fn line(quantity: u32) -> OptimisticQuantity {
        OptimisticQuantity::new(CartItemId::new("7").unwrap(), quantity)
    }

    #[test]
    fn remove_control_only_at_one() {
        assert!(!shows_remove(0));
        assert!(shows_remove(1));
        assert!(!shows_remove(2));

        let mut item = line(2);
        assert!(!item.shows_remove_affordance());
        item.decrement();
        assert!(item.shows_remove_affordance());
    }

    #[test]
    fn increment_rolls_back_on_failure() {
        let mut item = line(3);
        let request = item.increment();
        assert_eq!(item.displayed(), 4);
        assert_eq!(item.phase(), MutationPhase::Pending);
        assert_eq!(
            request.mutation,
            CartMutation::UpdateQuantity {
                cart_item_id: CartItemId::new("7").unwrap(),
                quantity: 4
            }
        );

        let notification = item.settle(&request, &MutationOutcome::default());
        assert_eq!(item.displayed(), 3);
        assert_eq!(item.phase(), MutationPhase::RolledBack);
        let notification = notification.expect("failure is surfaced");
        assert_eq!(notification.level, NotificationLevel::Error);
        assert_eq!(notification.message, GENERIC_FAILURE);
    }

    #[test]
    fn decrement_at_zero_is_a_no_op() {
        let mut item = line(0);
        assert_eq!(item.decrement(), None);
        assert_eq!(item.displayed(), 0);
        assert_eq!(item.phase(), MutationPhase::Idle);
        assert!(!item.is_pending());
    }

    #[test]
    fn decrement_from_one_reaches_zero_and_loads() {
        let mut item = line(1);
        assert!(item.shows_remove_affordance());

        let request = item.decrement().expect("request dispatched");
        assert_eq!(item.displayed(), 0);
        assert!(item.is_loading());
        assert!(!item.shows_remove_affordance());

        assert_eq!(item.settle(&request, &MutationOutcome::succeeded()), None);
        assert_eq!(item.confirmed(), 0);
        assert_eq!(item.phase(), MutationPhase::Committed);
        assert!(!item.is_loading());
    }

    #[test]
    fn success_becomes_the_rollback_point() {
        let mut item = line(2);
        let first = item.increment();
        item.settle(&first, &MutationOutcome::succeeded());

        let second = item.increment();
        assert_eq!(item.displayed(), 4);
        item.settle(&second, &MutationOutcome::failed("Out of stock"));
        assert_eq!(item.displayed(), 3);
    }

    #[test]
    fn failure_message_comes_from_backend_when_present() {
        let mut item = line(2);
        let request = item.increment();
        let notification = item
            .settle(&request, &MutationOutcome::failed("Out of stock"))
            .unwrap();
        assert_eq!(notification.message, "Out of stock");
    }

    #[test]
    fn rapid_requests_settle_last_write_wins() {
        let mut item = line(1);
        let first = item.increment();
        let second = item.increment();
        assert_eq!(item.displayed(), 3);
        assert_ne!(first.ticket, second.ticket);

        item.settle(&second, &MutationOutcome::succeeded());
        assert_eq!(item.phase(), MutationPhase::Pending);

        // The older request fails after the newer one succeeded: the display
        // falls back to the newest confirmed quantity.
        item.settle(&first, &MutationOutcome::default());
        assert_eq!(item.displayed(), 3);
        assert_eq!(item.phase(), MutationPhase::RolledBack);
    }

    #[test]
    fn reconcile_follows_server_changes_only() {
        let mut item = line(2);
        item.increment();
        item.reconcile(2);
        assert_eq!(item.displayed(), 3);

        item.reconcile(5);
        assert_eq!(item.displayed(), 5);
        assert_eq!(item.confirmed(), 5);
    }

    #[test]
    fn toggle_failure_notifies_without_touching_quantity() {
        let mut item = line(2);
        let request = item.toggle_selected();
        assert_eq!(request.mutation.cart_item_id().as_str(), "7");

        assert!(item.settle(&request, &MutationOutcome::default()).is_some());
        assert_eq!(item.displayed(), 2);
    }

    #[test]
    fn foreign_outcomes_are_ignored() {
        let mut item = line(2);
        let mut other = OptimisticQuantity::new(CartItemId::new("8").unwrap(), 1);
        item.increment();
        let foreign = other.increment();

        assert_eq!(item.settle(&foreign, &MutationOutcome::default()), None);
        assert_eq!(item.displayed(), 3);
        assert!(item.is_pending());
    }
}
