//! Tool definitions module.
//!
//! One file per Walmart operation. Each defines its parameters, its
//! descriptor, and a `prepare()` that turns validated arguments into an
//! outbound request.

pub mod category_search;
pub mod common;
pub mod product_search;
pub mod store_search;

pub use category_search::{CategorySearchParams, CategorySearchTool};
pub use common::{ApiSettings, PreparedCall};
pub use product_search::{ProductSearchParams, ProductSearchTool, SortOrder};
pub use store_search::{StoreSearchParams, StoreSearchTool};
