//! One customer's pass through checkout.

use crate::cart::CartStore;
use crate::checkout::{CheckoutError, CheckoutState, CheckoutStep, StepInput};
use crate::error::CommerceError;
use crate::orders::{Order, OrderDraft};
use crate::premium::PremiumSelections;
use crate::pricing::{PricingPolicy, ShippingSpeed, Totals};
use crate::services::{OrderApi, ServiceError};

/// Shown when the order service rejects an order.
pub const SUBMIT_FAILED_MESSAGE: &str = "We couldn't place your order. Please try again.";

/// Checkout state plus the choices that feed pricing: shipping speed and
/// promo code. Also tracks whether a submission is in flight.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    state: CheckoutState,
    policy: PricingPolicy,
    speed: ShippingSpeed,
    promo_code: Option<String>,
    error: Option<String>,
    submitting: bool,
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self::with_policy(PricingPolicy::default())
    }

    pub fn with_policy(policy: PricingPolicy) -> Self {
        Self {
            state: CheckoutState::new(),
            policy,
            speed: ShippingSpeed::Standard,
            promo_code: None,
            error: None,
            submitting: false,
        }
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn step(&self) -> CheckoutStep {
        self.state.step()
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    pub fn speed(&self) -> ShippingSpeed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: ShippingSpeed) {
        self.speed = speed;
    }

    pub fn promo_code(&self) -> Option<&str> {
        self.promo_code.as_deref()
    }

    /// Remember the entered code. Returns whether it matches a known
    /// promotion; unknown codes are kept and simply discount nothing.
    pub fn apply_promo(&mut self, code: impl Into<String>) -> bool {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            self.promo_code = None;
            return false;
        }
        let known = self.policy.promos.lookup(trimmed).is_some();
        self.promo_code = Some(trimmed.to_string());
        known
    }

    pub fn clear_promo(&mut self) {
        self.promo_code = None;
    }

    /// Message from the last failed submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Premium selections made so far, empty before that step.
    pub fn premium(&self) -> PremiumSelections {
        self.state.premium().cloned().unwrap_or_default()
    }

    /// Totals for `cart` under the current choices.
    pub fn totals(&self, cart: &CartStore) -> Result<Totals, CommerceError> {
        self.policy
            .totals(cart, self.speed, self.promo_code(), &self.premium())
    }

    /// Validate `input` and move forward. The state is unchanged on error.
    pub fn advance(&mut self, input: StepInput) -> Result<CheckoutStep, CheckoutError> {
        let next = self.state.advance(input)?;
        tracing::debug!(from = self.step().as_str(), to = next.step().as_str(), "checkout advanced");
        self.state = next;
        Ok(self.step())
    }

    /// Go back one step.
    pub fn back(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.state = self.state.back()?;
        Ok(self.step())
    }

    /// Mark a submission as started and assemble its order request.
    ///
    /// Fails unless at review with a non-empty cart and no submission
    /// already in flight. Pair with [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self, cart: &CartStore) -> Result<OrderDraft, CheckoutError> {
        if self.submitting {
            return Err(CheckoutError::SubmissionInProgress);
        }
        let CheckoutState::Review {
            shipping,
            premium,
            payment,
        } = &self.state
        else {
            return Err(CheckoutError::NotReady(self.step().as_str()));
        };
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let totals = self.policy.totals(cart, self.speed, self.promo_code(), premium)?;
        let draft = OrderDraft::new(
            cart,
            shipping,
            payment.summary(),
            premium,
            self.speed,
            self.promo_code(),
            totals,
        );
        self.submitting = true;
        self.error = None;
        Ok(draft)
    }

    /// Record the order service's answer.
    ///
    /// Success moves to `Submitted`; the caller then clears the cart.
    /// Failure stays at review with a generic message for display.
    pub fn finish_submit(
        &mut self,
        result: Result<Order, ServiceError>,
    ) -> Result<&Order, CheckoutError> {
        self.submitting = false;
        match result {
            Ok(order) => {
                tracing::info!(order_id = %order.id, "order placed");
                self.state = CheckoutState::Submitted {
                    order: Box::new(order),
                };
                self.state
                    .order()
                    .ok_or(CheckoutError::NotReady(CheckoutStep::Submitted.as_str()))
            }
            Err(e) => {
                tracing::warn!(error = %e, status = ?e.status, "order submission failed");
                self.error = Some(SUBMIT_FAILED_MESSAGE.to_string());
                Err(CheckoutError::SubmissionFailed(SUBMIT_FAILED_MESSAGE.to_string()))
            }
        }
    }

    /// Submit the order and clear `cart` on success.
    pub async fn submit<A>(
        &mut self,
        cart: &mut CartStore,
        orders: &A,
    ) -> Result<&Order, CheckoutError>
    where
        A: OrderApi + ?Sized,
    {
        let draft = self.begin_submit(cart)?;
        let result = orders.create_order(&draft).await;
        if result.is_ok() {
            cart.clear();
        }
        self.finish_submit(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Customizations;
    use crate::catalog::Product;
    use crate::checkout::{PaymentForm, ShippingForm};
    use crate::ids::OrderId;
    use crate::money::Money;

    fn cart() -> CartStore {
        let mut cart = CartStore::default();
        cart.add_item(
            &Product::new("ring-1", "Solitaire", Money::usd(5_000)),
            2,
            Customizations::new(),
        )
        .unwrap();
        cart
    }

    fn reviewed() -> CheckoutSession {
        let mut session = CheckoutSession::new();
        session
            .advance(StepInput::Shipping(ShippingForm {
                full_name: "Grace Hopper".to_string(),
                email: "grace@example.com".to_string(),
                phone: "555-0100".to_string(),
                address: "1 Navy Way".to_string(),
                city: "Arlington".to_string(),
                state: "VA".to_string(),
                zip: "22202".to_string(),
                country: String::new(),
            }))
            .unwrap();
        session
            .advance(StepInput::PremiumServices(
                PremiumSelections::new().with_gift_message("For you"),
            ))
            .unwrap();
        session
            .advance(StepInput::Payment(PaymentForm {
                card_name: "Grace Hopper".to_string(),
                card_number: "4242424242424242".to_string(),
                expiry: "12/29".to_string(),
                cvv: "123".to_string(),
            }))
            .unwrap();
        session
    }

    fn placed() -> Order {
        serde_json::from_value(serde_json::json!({"_id": "ord-9", "total": 119.99})).unwrap()
    }

    #[test]
    fn test_totals_follow_choices() {
        let mut session = CheckoutSession::new();
        let cart = cart();
        assert_eq!(session.totals(&cart).unwrap().total, Money::usd(11_999));

        session.set_speed(ShippingSpeed::Express);
        assert!(session.apply_promo(" discount20 "));
        let t = session.totals(&cart).unwrap();
        assert_eq!(t.shipping, Money::usd(1_999));
        assert_eq!(t.discount, Money::usd(2_000));
    }

    #[test]
    fn test_unknown_promo_kept_but_worthless() {
        let mut session = CheckoutSession::new();
        assert!(!session.apply_promo("NOPE"));
        assert_eq!(session.promo_code(), Some("NOPE"));
        assert_eq!(session.totals(&cart()).unwrap().discount, Money::usd(0));
    }

    #[test]
    fn test_draft_contents() {
        let mut session = reviewed();
        session.apply_promo("DISCOUNT20");
        let draft = session.begin_submit(&cart()).unwrap();

        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.items[0].quantity, 2);
        assert_eq!(draft.billing_address, draft.shipping_address);
        assert_eq!(draft.payment.last_four, "4242");
        assert_eq!(draft.premium_services.gift_message.as_deref(), Some("For you"));
        assert_eq!(draft.promo_code.as_deref(), Some("DISCOUNT20"));
        assert_eq!(draft.totals.discount, Money::usd(2_000));
        assert!(session.is_submitting());
    }

    #[test]
    fn test_second_begin_rejected_while_in_flight() {
        let mut session = reviewed();
        session.begin_submit(&cart()).unwrap();
        assert!(matches!(
            session.begin_submit(&cart()),
            Err(CheckoutError::SubmissionInProgress)
        ));
    }

    #[test]
    fn test_submit_requires_review() {
        let mut session = CheckoutSession::new();
        assert!(matches!(
            session.begin_submit(&cart()),
            Err(CheckoutError::NotReady("shipping"))
        ));
        assert!(!session.is_submitting());
    }

    #[test]
    fn test_empty_cart_rejected() {
        let mut session = reviewed();
        assert!(matches!(
            session.begin_submit(&CartStore::default()),
            Err(CheckoutError::EmptyCart)
        ));
        assert!(!session.is_submitting());
    }

    #[test]
    fn test_finish_success() {
        let mut session = reviewed();
        session.begin_submit(&cart()).unwrap();
        let order = session.finish_submit(Ok(placed())).unwrap();
        assert_eq!(order.id, OrderId::new("ord-9"));
        assert_eq!(session.step(), CheckoutStep::Submitted);
        assert!(!session.is_submitting());
        assert!(session.back().is_err());
    }

    #[test]
    fn test_finish_failure_stays_in_review() {
        let mut session = reviewed();
        session.begin_submit(&cart()).unwrap();
        let err = session
            .finish_submit(Err(ServiceError::new("card declined by issuer")))
            .unwrap_err();
        assert!(matches!(err, CheckoutError::SubmissionFailed(_)));
        assert_eq!(session.step(), CheckoutStep::Review);
        assert_eq!(session.error(), Some(SUBMIT_FAILED_MESSAGE));
        assert!(!session.is_submitting());

        // Retry is allowed and clears the old message.
        session.begin_submit(&cart()).unwrap();
        assert_eq!(session.error(), None);
    }
}
