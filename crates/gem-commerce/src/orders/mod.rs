//! Orders: the draft assembled at checkout and the backend's placed order.

mod draft;
mod order;

pub use draft::{OrderDraft, OrderLine, PremiumRequest};
pub use order::{Order, OrderStatus, PaymentStatus};
