//! Accounting period closing.
//!
//! Periods are monthly or annual. Once closed, no voucher dated inside can
//! be approved; there is no reopening.

pub mod period;
pub mod service;

pub use period::{ClosingPeriod, PeriodKey, PeriodStatus, PeriodType};
pub use service::PeriodCloser;
