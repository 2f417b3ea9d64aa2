//! Request display: grouping selected items and formatting their labels.

mod formatter;
pub mod grouper;
mod types;

pub use formatter::CartItemFormatter;
pub use grouper::RequestItemGrouper;
pub use types::*;
