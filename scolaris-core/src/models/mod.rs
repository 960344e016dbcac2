//! School data models
//!
//! Each model is an [`Entity`](crate::sync::Entity) so it can be held by a
//! [`ListManager`](crate::sync::ListManager).

mod finance;
mod stock;
mod student;

pub use finance::{Expense, Fee, FeeBalance, FinanceSummary, Payment, PaymentMethod};
pub use stock::{reorder_list, StockItem};
pub use student::{EnrollmentStatus, Student};
