//! Order types and the checkout state machine.

use crate::basket::BasketView;
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId, SellerId, ShopperId};
use crate::money::Money;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Order status. Orders are written once at checkout and never mutated,
/// so the only state this system produces is `Placed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed at checkout.
    #[default]
    Placed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "Placed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "placed" => Some(OrderStatus::Placed),
            _ => None,
        }
    }
}

/// The immutable record of a completed purchase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Shopper the order belongs to.
    pub shopper_id: ShopperId,
    /// Calendar date the order was placed.
    pub order_date: NaiveDate,
    /// Order status.
    pub status: OrderStatus,
}

/// One finalized purchase line, one per prior basket line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Owning order.
    pub order_id: OrderId,
    /// Product purchased.
    pub product_id: ProductId,
    /// Seller the product was bought from.
    pub seller_id: SellerId,
    /// Quantity purchased.
    pub quantity: i64,
    /// Price copied verbatim from the basket line.
    pub price: Money,
    /// Line status.
    pub status: OrderStatus,
}

/// States of one checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckoutState {
    /// Entry state; the caller holds a basket id.
    #[default]
    Idle,
    /// The basket snapshot has been produced for review.
    PreviewShown,
    /// Awaiting an explicit affirmative confirmation.
    ConfirmationRequested,
    /// The commit sequence ran as a single atomic unit.
    Committed,
    /// Terminal; no side effects beyond what already existed.
    Aborted,
}

impl CheckoutState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Idle => "idle",
            CheckoutState::PreviewShown => "preview_shown",
            CheckoutState::ConfirmationRequested => "confirmation_requested",
            CheckoutState::Committed => "committed",
            CheckoutState::Aborted => "aborted",
        }
    }

    /// Check if this attempt has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutState::Committed | CheckoutState::Aborted)
    }
}

/// One checkout attempt:
/// `Idle -> PreviewShown -> ConfirmationRequested -> {Committed | Aborted}`.
///
/// The flow never touches storage itself; the caller runs the atomic
/// commit between an affirmative confirmation and `commit()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CheckoutFlow {
    state: CheckoutState,
}

impl CheckoutFlow {
    /// Start a new attempt in `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> CheckoutState {
        self.state
    }

    fn transition(
        &mut self,
        expected: CheckoutState,
        next: CheckoutState,
    ) -> Result<CheckoutState, CommerceError> {
        if self.state != expected {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.state.as_str(),
                to: next.as_str(),
            });
        }
        self.state = next;
        Ok(next)
    }

    /// Present the basket snapshot for review.
    ///
    /// An empty basket aborts the attempt immediately: there is nothing
    /// to convert and no writes are issued.
    pub fn show_preview(&mut self, snapshot: &BasketView) -> Result<CheckoutState, CommerceError> {
        if snapshot.is_empty() {
            self.transition(CheckoutState::Idle, CheckoutState::Aborted)?;
            return Ok(CheckoutState::Aborted);
        }
        self.transition(CheckoutState::Idle, CheckoutState::PreviewShown)
    }

    /// Ask for explicit confirmation of the previewed snapshot.
    pub fn request_confirmation(&mut self) -> Result<CheckoutState, CommerceError> {
        self.transition(
            CheckoutState::PreviewShown,
            CheckoutState::ConfirmationRequested,
        )
    }

    /// A non-affirmative response; terminal with no state change anywhere.
    pub fn decline(&mut self) -> Result<CheckoutState, CommerceError> {
        self.transition(CheckoutState::ConfirmationRequested, CheckoutState::Aborted)
    }

    /// Record that the atomic commit sequence succeeded.
    pub fn commit(&mut self) -> Result<CheckoutState, CommerceError> {
        self.transition(
            CheckoutState::ConfirmationRequested,
            CheckoutState::Committed,
        )
    }

    /// Abort from any non-terminal state (used when the commit sequence
    /// fails and has been rolled back).
    pub fn abort(&mut self) -> CheckoutState {
        if !self.state.is_terminal() {
            self.state = CheckoutState::Aborted;
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basket::BasketItemView;

    fn nonempty_view() -> BasketView {
        let unit_price = Money::from_pence(500);
        BasketView {
            items: vec![BasketItemView {
                product_id: ProductId::new(1),
                seller_id: SellerId::new(1),
                product: "Test Product".into(),
                seller: "Test Seller".into(),
                quantity: 2,
                unit_price,
                line_total: unit_price.try_multiply(2).unwrap(),
            }],
        }
    }

    #[test]
    fn test_happy_path_to_committed() {
        let mut flow = CheckoutFlow::new();
        assert_eq!(flow.state(), CheckoutState::Idle);

        assert_eq!(
            flow.show_preview(&nonempty_view()).unwrap(),
            CheckoutState::PreviewShown
        );
        assert_eq!(
            flow.request_confirmation().unwrap(),
            CheckoutState::ConfirmationRequested
        );
        assert_eq!(flow.commit().unwrap(), CheckoutState::Committed);
        assert!(flow.state().is_terminal());
    }

    #[test]
    fn test_decline_aborts() {
        let mut flow = CheckoutFlow::new();
        flow.show_preview(&nonempty_view()).unwrap();
        flow.request_confirmation().unwrap();
        assert_eq!(flow.decline().unwrap(), CheckoutState::Aborted);
    }

    #[test]
    fn test_empty_basket_aborts_immediately() {
        let mut flow = CheckoutFlow::new();
        assert_eq!(
            flow.show_preview(&BasketView::default()).unwrap(),
            CheckoutState::Aborted
        );
        // Terminal: a later confirmation request is an invalid transition.
        assert!(flow.request_confirmation().is_err());
    }

    #[test]
    fn test_commit_requires_confirmation() {
        let mut flow = CheckoutFlow::new();
        let err = flow.commit().unwrap_err();
        assert!(matches!(
            err,
            CommerceError::InvalidCheckoutTransition { from: "idle", .. }
        ));

        flow.show_preview(&nonempty_view()).unwrap();
        assert!(flow.commit().is_err());
    }

    #[test]
    fn test_abort_is_idempotent() {
        let mut flow = CheckoutFlow::new();
        flow.show_preview(&nonempty_view()).unwrap();
        assert_eq!(flow.abort(), CheckoutState::Aborted);
        assert_eq!(flow.abort(), CheckoutState::Aborted);
    }

    #[test]
    fn test_order_status_round_trip() {
        assert_eq!(OrderStatus::Placed.as_str(), "Placed");
        assert_eq!(OrderStatus::from_str("placed"), Some(OrderStatus::Placed));
        assert_eq!(OrderStatus::from_str("Placed"), Some(OrderStatus::Placed));
        assert_eq!(OrderStatus::from_str("shipped"), None);
    }
}
