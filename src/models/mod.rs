//! Data models for wifi-billing-service.

pub mod bill;
pub mod member;
pub mod payment;

pub use bill::{Bill, BillCostUpdate, BillStatus, NewBill};
pub use member::{Member, MemberStatus, MemberUpdate, NewMember};
pub use payment::{NewPayment, Payment, PaymentUpdate};
