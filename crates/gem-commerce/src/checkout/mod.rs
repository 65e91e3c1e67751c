//! Checkout module.
//!
//! Forms and their validation, the step state machine, and the session that
//! prices the cart and submits the order.

mod address;
mod flow;
mod payment;
mod session;
mod validation;

pub use address::{ShippingAddress, ShippingForm};
pub use flow::{CheckoutError, CheckoutState, CheckoutStep, Resume, StepInput};
pub use payment::{PaymentDetails, PaymentForm, PaymentMethod, PaymentSummary};
pub use session::{CheckoutSession, SUBMIT_FAILED_MESSAGE};
pub use validation::{Field, FieldError, ValidationErrors};
