//! Checkout flow state machine.
//!
//! Each state carries the data validated so far, so a `Review` state cannot
//! exist without a shipping address and payment details. Data from later
//! steps that the customer backed out of is kept in [`Resume`] to prefill
//! the forms on the way forward again.

use crate::checkout::{PaymentDetails, PaymentForm, ShippingAddress, ShippingForm, ValidationErrors};
use crate::error::CommerceError;
use crate::orders::Order;
use crate::premium::PremiumSelections;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckoutStep {
    /// Shipping address.
    Shipping,
    /// Packaging, insurance and gift message.
    PremiumServices,
    /// Payment details.
    Payment,
    /// Order review before submission.
    Review,
    /// Order placed.
    Submitted,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::PremiumServices => "premium_services",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Review => "review",
            CheckoutStep::Submitted => "submitted",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Shipping => "Shipping",
            CheckoutStep::PremiumServices => "Premium Services",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Review => "Review",
            CheckoutStep::Submitted => "Confirmation",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Shipping => 1,
            CheckoutStep::PremiumServices => 2,
            CheckoutStep::Payment => 3,
            CheckoutStep::Review => 4,
            CheckoutStep::Submitted => 5,
        }
    }
}

/// Input submitted at a step.
#[derive(Debug, Clone)]
pub enum StepInput {
    Shipping(ShippingForm),
    PremiumServices(PremiumSelections),
    Payment(PaymentForm),
}

impl StepInput {
    /// The step this input belongs to.
    pub fn step(&self) -> CheckoutStep {
        match self {
            StepInput::Shipping(_) => CheckoutStep::Shipping,
            StepInput::PremiumServices(_) => CheckoutStep::PremiumServices,
            StepInput::Payment(_) => CheckoutStep::Payment,
        }
    }
}

/// Checkout errors.
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// One or more fields failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Input for one step arrived while at another.
    #[error("cannot accept {input} input at the {at} step")]
    InvalidTransition {
        at: &'static str,
        input: &'static str,
    },

    /// No earlier step to return to.
    #[error("cannot go back from the {0} step")]
    CannotGoBack(&'static str),

    /// Submit attempted before reaching review.
    #[error("order can only be submitted from review, not {0}")]
    NotReady(&'static str),

    #[error("cart is empty")]
    EmptyCart,

    #[error("an order submission is already in progress")]
    SubmissionInProgress,

    /// The order service rejected the order; the message is for display.
    #[error("{0}")]
    SubmissionFailed(String),

    /// Pricing the cart failed.
    #[error(transparent)]
    Pricing(#[from] CommerceError),
}

/// Later-step data kept when backing out, for prefilling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resume {
    pub shipping: Option<ShippingAddress>,
    pub premium: Option<PremiumSelections>,
    pub payment: Option<PaymentDetails>,
}

/// Where the checkout is, with everything validated so far.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutState {
    Shipping {
        resume: Resume,
    },
    PremiumServices {
        shipping: ShippingAddress,
        resume: Resume,
    },
    Payment {
        shipping: ShippingAddress,
        premium: PremiumSelections,
        resume: Resume,
    },
    Review {
        shipping: ShippingAddress,
        premium: PremiumSelections,
        payment: PaymentDetails,
    },
    Submitted {
        order: Box<Order>,
    },
}

impl Default for CheckoutState {
    fn default() -> Self {
        CheckoutState::Shipping {
            resume: Resume::default(),
        }
    }
}

impl CheckoutState {
    /// Initial state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> CheckoutStep {
        match self {
            CheckoutState::Shipping { .. } => CheckoutStep::Shipping,
            CheckoutState::PremiumServices { .. } => CheckoutStep::PremiumServices,
            CheckoutState::Payment { .. } => CheckoutStep::Payment,
            CheckoutState::Review { .. } => CheckoutStep::Review,
            CheckoutState::Submitted { .. } => CheckoutStep::Submitted,
        }
    }

    /// Validate `input` for the current step and move to the next one.
    ///
    /// On error the current state is unchanged.
    pub fn advance(&self, input: StepInput) -> Result<CheckoutState, CheckoutError> {
        match (self, input) {
            (CheckoutState::Shipping { resume }, StepInput::Shipping(form)) => {
                let shipping = form.validate()?;
                Ok(CheckoutState::PremiumServices {
                    shipping,
                    resume: Resume {
                        shipping: None,
                        ..resume.clone()
                    },
                })
            }
            (CheckoutState::PremiumServices { shipping, resume }, StepInput::PremiumServices(premium)) => {
                Ok(CheckoutState::Payment {
                    shipping: shipping.clone(),
                    premium,
                    resume: Resume {
                        premium: None,
                        ..resume.clone()
                    },
                })
            }
            (
                CheckoutState::Payment {
                    shipping, premium, ..
                },
                StepInput::Payment(form),
            ) => {
                let payment = form.validate()?;
                Ok(CheckoutState::Review {
                    shipping: shipping.clone(),
                    premium: premium.clone(),
                    payment,
                })
            }
            (state, input) => Err(CheckoutError::InvalidTransition {
                at: state.step().as_str(),
                input: input.step().as_str(),
            }),
        }
    }

    /// Return to the previous step without re-validating anything.
    pub fn back(&self) -> Result<CheckoutState, CheckoutError> {
        match self {
            CheckoutState::Shipping { .. } | CheckoutState::Submitted { .. } => {
                Err(CheckoutError::CannotGoBack(self.step().as_str()))
            }
            CheckoutState::PremiumServices { shipping, resume } => Ok(CheckoutState::Shipping {
                resume: Resume {
                    shipping: Some(shipping.clone()),
                    ..resume.clone()
                },
            }),
            CheckoutState::Payment {
                shipping,
                premium,
                resume,
            } => Ok(CheckoutState::PremiumServices {
                shipping: shipping.clone(),
                resume: Resume {
                    premium: Some(premium.clone()),
                    ..resume.clone()
                },
            }),
            CheckoutState::Review {
                shipping,
                premium,
                payment,
            } => Ok(CheckoutState::Payment {
                shipping: shipping.clone(),
                premium: premium.clone(),
                resume: Resume {
                    payment: Some(payment.clone()),
                    ..Resume::default()
                },
            }),
        }
    }

    /// Validated shipping address, if this step has one.
    pub fn shipping(&self) -> Option<&ShippingAddress> {
        match self {
            CheckoutState::PremiumServices { shipping, .. }
            | CheckoutState::Payment { shipping, .. }
            | CheckoutState::Review { shipping, .. } => Some(shipping),
            CheckoutState::Shipping { .. } | CheckoutState::Submitted { .. } => None,
        }
    }

    /// Premium selections chosen so far.
    pub fn premium(&self) -> Option<&PremiumSelections> {
        match self {
            CheckoutState::Payment { premium, .. } | CheckoutState::Review { premium, .. } => {
                Some(premium)
            }
            _ => None,
        }
    }

    /// Data kept from later steps, for prefilling the current form.
    pub fn resume(&self) -> Option<&Resume> {
        match self {
            CheckoutState::Shipping { resume }
            | CheckoutState::PremiumServices { resume, .. }
            | CheckoutState::Payment { resume, .. } => Some(resume),
            _ => None,
        }
    }

    /// The placed order, once submitted.
    pub fn order(&self) -> Option<&Order> {
        match self {
            CheckoutState::Submitted { order } => Some(order),
            _ => None,
        }
    }
}
