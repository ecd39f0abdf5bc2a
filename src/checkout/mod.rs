//! Checkout flow
//!
//! An explicit state machine for the Shipping -> Payment -> Processing ->
//! Confirmed steps, with an Aborted path when the cart empties mid-flow.
//! Every transition is guarded: an illegal action returns an error and
//! leaves the step unchanged. Order creation itself is the backend's job;
//! the flow emits the request payload and consumes the confirmation.

pub mod forms;

pub use forms::{CardBrand, PaymentInfo, ShippingInfo};

use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::events::{CheckoutEvent, DomainEvent};
use crate::payment::{authorize, Authorization};
use crate::services::orders::{CreateOrderRequest, PaymentData, PlacedOrder};
use crate::store::CartStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckoutStep {
    Shipping,
    Payment,
    Processing,
    Confirmed,
    Aborted,
}

impl CheckoutStep {
    pub fn name(self) -> &'static str {
        match self {
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Processing => "processing",
            CheckoutStep::Confirmed => "confirmed",
            CheckoutStep::Aborted => "aborted",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, CheckoutStep::Confirmed | CheckoutStep::Aborted)
    }
}

/// Navigation signal surfaced to the embedding router.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Redirect {
    Catalog,
    Login,
    Orders,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("insufficient stock for: {0}")]
    OutOfStock(String),
    #[error("{action} is not allowed from the {step} step")]
    IllegalTransition { step: &'static str, action: &'static str },
    #[error("validation failed")]
    Invalid(#[from] ValidationErrors),
    #[error("payment was not approved")]
    PaymentNotApproved,
    #[error("order placement already in flight")]
    PlacementInFlight,
}

impl CheckoutError {
    /// Where the router should send the user, when the error implies it.
    pub fn redirect(&self) -> Option<Redirect> {
        match self {
            CheckoutError::EmptyCart | CheckoutError::OutOfStock(_) => Some(Redirect::Catalog),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    shipping: Option<ShippingInfo>,
    payment: Option<PaymentInfo>,
    authorization: Option<Authorization>,
    order: Option<PlacedOrder>,
    placing: bool,
    events: Vec<DomainEvent>,
}

impl CheckoutFlow {
    /// Entry guard. Refuses an empty cart and a cart failing the advisory
    /// stock check; both errors carry a catalog redirect.
    pub fn begin(store: &CartStore) -> Result<Self, CheckoutError> {
        if store.cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let check = store.validate_stock();
        if !check.valid {
            return Err(CheckoutError::OutOfStock(check.offending.join(", ")));
        }
        let mut flow = Self {
            step: CheckoutStep::Shipping,
            shipping: None,
            payment: None,
            authorization: None,
            order: None,
            placing: false,
            events: Vec::new(),
        };
        flow.raise(CheckoutEvent::StepEntered { step: CheckoutStep::Shipping });
        Ok(flow)
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn shipping(&self) -> Option<&ShippingInfo> {
        self.shipping.as_ref()
    }

    pub fn authorization(&self) -> Option<&Authorization> {
        self.authorization.as_ref()
    }

    pub fn order(&self) -> Option<&PlacedOrder> {
        self.order.as_ref()
    }

    /// Detects a cart emptied behind the flow's back (e.g. cleared from
    /// another view) and force-aborts. Returns the redirect to surface.
    pub fn ensure_cart_nonempty(&mut self, store: &CartStore) -> Option<Redirect> {
        if self.step.is_terminal() || !store.cart().is_empty() {
            return None;
        }
        self.step = CheckoutStep::Aborted;
        self.raise(CheckoutEvent::Aborted);
        Some(Redirect::Catalog)
    }

    /// Field errors keep the flow in Shipping; valid data advances to
    /// Payment.
    pub fn submit_shipping(&mut self, info: ShippingInfo) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Shipping, "submit shipping")?;
        info.validate()?;
        self.shipping = Some(info);
        self.enter(CheckoutStep::Payment);
        Ok(())
    }

    /// Backward navigation, only legal from Payment. Once a payment has
    /// been attempted the flow never goes back.
    pub fn back(&mut self) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Payment, "back")?;
        self.enter(CheckoutStep::Shipping);
        Ok(())
    }

    /// Validates the card form, runs the simulated authorization and moves
    /// to Processing holding the result, approved or declined.
    pub fn submit_payment(&mut self, info: PaymentInfo) -> Result<&Authorization, CheckoutError> {
        self.expect_step(CheckoutStep::Payment, "submit payment")?;
        info.validate()?;
        let auth = authorize(&info.digits());
        match &auth.transaction_id {
            Some(id) => self.raise(CheckoutEvent::PaymentAuthorized { transaction_id: id.clone() }),
            None => self.raise(CheckoutEvent::PaymentDeclined { reason: auth.message.clone() }),
        }
        self.payment = Some(info);
        self.enter(CheckoutStep::Processing);
        Ok(&*self.authorization.insert(auth))
    }

    /// Only available after a declined authorization: clears the card data
    /// and the result, and returns to Payment for another attempt.
    pub fn retry_payment(&mut self) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Processing, "retry payment")?;
        if self.authorization.as_ref().is_some_and(|a| a.approved) {
            return Err(CheckoutError::IllegalTransition {
                step: self.step.name(),
                action: "retry payment",
            });
        }
        self.payment = None;
        self.authorization = None;
        self.enter(CheckoutStep::Payment);
        Ok(())
    }

    /// Builds the order-creation payload and marks a placement in flight,
    /// so a double submit cannot create two orders. On backend failure call
    /// `order_failed` to re-arm the retry; the existing authorization is
    /// reused, never re-run.
    pub fn order_request(&mut self, store: &CartStore) -> Result<CreateOrderRequest, CheckoutError> {
        self.expect_step(CheckoutStep::Processing, "create order")?;
        let auth = self.authorization.as_ref().ok_or(CheckoutError::PaymentNotApproved)?;
        let transaction_id = auth
            .transaction_id
            .clone()
            .ok_or(CheckoutError::PaymentNotApproved)?;
        if self.placing {
            return Err(CheckoutError::PlacementInFlight);
        }
        let payment = self.payment.as_ref().ok_or(CheckoutError::PaymentNotApproved)?;
        let card_type = auth.card_brand.map_or_else(String::new, |b| b.to_string());
        let payload = store.prepare_order_payload(
            self.shipping.as_ref().ok_or(CheckoutError::IllegalTransition {
                step: self.step.name(),
                action: "create order",
            })?,
            PaymentData { transaction_id, card_type, card_number: payment.digits() },
        );
        self.placing = true;
        Ok(payload)
    }

    /// The backend call failed or rejected the order: stay in Processing
    /// and allow another attempt.
    pub fn order_failed(&mut self) {
        self.placing = false;
    }

    /// The backend confirmed the order: enter Confirmed and clear the cart.
    /// Confirmed is reachable exactly once per flow, so the clear runs
    /// exactly once.
    pub fn complete(&mut self, order: PlacedOrder, store: &mut CartStore) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Processing, "complete")?;
        if !self.authorization.as_ref().is_some_and(|a| a.approved) {
            return Err(CheckoutError::PaymentNotApproved);
        }
        self.raise(CheckoutEvent::OrderPlaced { order_id: order.id });
        self.order = Some(order);
        self.placing = false;
        store.clear();
        self.enter(CheckoutStep::Confirmed);
        Ok(())
    }

    /// Navigation hint for the terminal states.
    pub fn redirect(&self) -> Option<Redirect> {
        match self.step {
            CheckoutStep::Confirmed => Some(Redirect::Orders),
            CheckoutStep::Aborted => Some(Redirect::Catalog),
            _ => None,
        }
    }

    /// Drains the events raised since the last call.
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn raise(&mut self, event: CheckoutEvent) {
        self.events.push(DomainEvent::Checkout(event));
    }

    fn enter(&mut self, step: CheckoutStep) {
        self.step = step;
        self.raise(CheckoutEvent::StepEntered { step });
    }

    fn expect_step(&self, expected: CheckoutStep, action: &'static str) -> Result<(), CheckoutError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CheckoutError::IllegalTransition { step: self.step.name(), action })
        }
    }
}
