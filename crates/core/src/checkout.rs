//! Order-submission workflow.
//!
//! Three pieces cooperate here:
//!
//! - [`CustomerInfo`] and the validation gate, which must pass before any
//!   network traffic is attempted;
//! - the order projection ([`OrderLine`] / [`project_order`]), turning the
//!   cart into the id-quantity pairs the backend wants;
//! - the [`Submission`] state machine, whose `Submitting` state doubles as
//!   the double-submit guard.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::types::ProductId;

/// Customer contact details collected by the order form.
///
/// Fields are kept as the raw strings the user typed; validation happens
/// only at submission time, never per keystroke.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl CustomerInfo {
    /// Names of the required fields that are empty or whitespace-only.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for (name, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
        ] {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        missing
    }
}

/// Why an order was rejected before reaching the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required customer fields are blank.
    #[error("please fill in the required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The cart holds no line items.
    #[error("the cart is empty")]
    EmptyCart,
}

/// The validation gate.
///
/// All four customer fields must be non-empty and the cart must contain at
/// least one line item. Blank fields are reported before the empty cart so
/// the user fixes the form they are looking at first. Neither input is
/// mutated; a rejection leaves cart and form state exactly as they were.
///
/// # Errors
///
/// Returns [`ValidationError`] naming the blank fields, or `EmptyCart`.
pub fn validate_order(customer: &CustomerInfo, cart: &Cart) -> Result<(), ValidationError> {
    let missing = customer.missing_fields();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    Ok(())
}

/// One id-quantity pair of the order projection.
///
/// Field names are the wire contract of the `/orders` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: ProductId,
    pub qty: u32,
}

/// Project the cart into order lines, preserving insertion order.
#[must_use]
pub fn project_order(cart: &Cart) -> Vec<OrderLine> {
    cart.lines()
        .map(|line| OrderLine {
            id: line.product.id.clone(),
            qty: line.quantity,
        })
        .collect()
}

/// States of the order-submission workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    /// Editable; no request outstanding.
    #[default]
    Draft,
    /// A request is in flight; further submissions are rejected.
    Submitting,
    /// The last attempt was accepted by the backend.
    Submitted,
}

/// Attempted a transition the current state does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// `begin` was called while a request was already in flight.
    #[error("an order submission is already in progress")]
    AlreadySubmitting,
    /// `complete` or `fail` was called with no request in flight.
    #[error("no order submission is in progress")]
    NotSubmitting,
}

/// The submission state machine: `Draft -> Submitting -> Draft | Submitted`.
///
/// Held in the session next to the cart. `Submitted` is terminal only for
/// that attempt; the user may start a new one (the cart is deliberately not
/// cleared on success).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    state: SubmissionState,
}

impl Submission {
    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SubmissionState {
        self.state
    }

    /// Start an attempt. Rejected while another attempt is in flight.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::AlreadySubmitting`] if a request is
    /// outstanding.
    pub fn begin(&mut self) -> Result<(), TransitionError> {
        match self.state {
            SubmissionState::Submitting => Err(TransitionError::AlreadySubmitting),
            SubmissionState::Draft | SubmissionState::Submitted => {
                self.state = SubmissionState::Submitting;
                Ok(())
            }
        }
    }

    /// Record backend acceptance.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NotSubmitting`] unless a request is
    /// outstanding.
    pub fn complete(&mut self) -> Result<(), TransitionError> {
        self.transition_from_submitting(SubmissionState::Submitted)
    }

    /// Record backend rejection or a transport failure; the order becomes
    /// editable again.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NotSubmitting`] unless a request is
    /// outstanding.
    pub fn fail(&mut self) -> Result<(), TransitionError> {
        self.transition_from_submitting(SubmissionState::Draft)
    }

    fn transition_from_submitting(
        &mut self,
        next: SubmissionState,
    ) -> Result<(), TransitionError> {
        if self.state == SubmissionState::Submitting {
            self.state = next;
            Ok(())
        } else {
            Err(TransitionError::NotSubmitting)
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{CurrencyCode, Price, Product};

    fn filled_customer() -> CustomerInfo {
        CustomerInfo {
            name: "Olena K".to_owned(),
            email: "olena@example.com".to_owned(),
            phone: "+380501234567".to_owned(),
            address: "Kyiv, Khreshchatyk 1".to_owned(),
        }
    }

    fn cart_with(ids: &[(&str, u32)]) -> Cart {
        let mut cart = Cart::new();
        for (id, qty) in ids {
            cart.add_item(Product {
                id: ProductId::new(*id),
                title: (*id).to_owned(),
                price: Price::new(Decimal::from(10), CurrencyCode::UAH),
                image_url: String::new(),
            });
            cart.set_quantity(&ProductId::new(*id), *qty);
        }
        cart
    }

    #[test]
    fn test_gate_accepts_complete_order() {
        assert!(validate_order(&filled_customer(), &cart_with(&[("a", 1)])).is_ok());
    }

    #[test]
    fn test_gate_rejects_blank_fields_by_name() {
        let mut customer = filled_customer();
        customer.email = String::new();
        customer.phone = "   ".to_owned();

        let err = validate_order(&customer, &cart_with(&[("a", 1)])).expect_err("rejected");
        assert_eq!(err, ValidationError::MissingFields(vec!["email", "phone"]));
    }

    #[test]
    fn test_gate_rejects_empty_cart() {
        let err = validate_order(&filled_customer(), &Cart::new()).expect_err("rejected");
        assert_eq!(err, ValidationError::EmptyCart);
    }

    #[test]
    fn test_gate_reports_fields_before_empty_cart() {
        let mut customer = filled_customer();
        customer.name = String::new();

        let err = validate_order(&customer, &Cart::new()).expect_err("rejected");
        assert_eq!(err, ValidationError::MissingFields(vec!["name"]));
    }

    #[test]
    fn test_projection_preserves_order_and_quantities() {
        let cart = cart_with(&[("b", 2), ("a", 7)]);

        let lines = project_order(&cart);
        assert_eq!(
            lines,
            vec![
                OrderLine {
                    id: ProductId::new("b"),
                    qty: 2
                },
                OrderLine {
                    id: ProductId::new("a"),
                    qty: 7
                },
            ]
        );
    }

    #[test]
    fn test_submission_happy_path() {
        let mut submission = Submission::default();
        assert_eq!(submission.state(), SubmissionState::Draft);

        submission.begin().expect("begin from draft");
        assert_eq!(submission.state(), SubmissionState::Submitting);

        submission.complete().expect("complete from submitting");
        assert_eq!(submission.state(), SubmissionState::Submitted);
    }

    #[test]
    fn test_submission_failure_returns_to_draft() {
        let mut submission = Submission::default();
        submission.begin().expect("begin");
        submission.fail().expect("fail");
        assert_eq!(submission.state(), SubmissionState::Draft);
    }

    #[test]
    fn test_double_submit_is_rejected() {
        let mut submission = Submission::default();
        submission.begin().expect("first click");

        assert_eq!(
            submission.begin(),
            Err(TransitionError::AlreadySubmitting),
            "second click while in flight must be rejected"
        );
        assert_eq!(submission.state(), SubmissionState::Submitting);
    }

    #[test]
    fn test_new_attempt_allowed_after_success() {
        let mut submission = Submission::default();
        submission.begin().expect("begin");
        submission.complete().expect("complete");

        submission.begin().expect("a fresh attempt after success");
        assert_eq!(submission.state(), SubmissionState::Submitting);
    }

    #[test]
    fn test_complete_and_fail_require_in_flight_request() {
        let mut submission = Submission::default();
        assert_eq!(submission.complete(), Err(TransitionError::NotSubmitting));
        assert_eq!(submission.fail(), Err(TransitionError::NotSubmitting));
    }
}
