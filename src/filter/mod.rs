pub mod attribute;
pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod params;
pub mod recipe;
pub mod types;

pub use attribute::AttributeFilter;
pub use error::FilterError;
pub use filter::Filter;
pub use recipe::RecipeFilter;
pub use types::*;
