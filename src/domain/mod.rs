//! Transport-agnostic order types.
//!
//! - [`filter`] - listing filters and memo-table keys
//! - [`order`] - order summary/detail records
//! - [`item_name`] - quantity recovery from item names
//! - [`order_number`] - display codes within a listing
//! - [`page`] - listing pages and pagination windows
//! - [`delivery`], [`bill`] - delivery fees and slip contents

pub mod bill;
pub mod delivery;
pub mod error;
pub mod filter;
pub mod id;
pub mod item_name;
pub mod order;
pub mod order_number;
pub mod page;

pub use error::DomainError;
pub use filter::{CacheKey, DateFilter, FilterState, TypeFilter};
pub use id::OrderId;
pub use order::{LineItem, OrderDetail, OrderSummary, OrderType};
pub use page::{OrderPage, PAGE_SIZE};
