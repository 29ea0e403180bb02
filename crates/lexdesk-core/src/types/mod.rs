//! Validated value types.
//!
//! These types enforce their invariants at construction time,
//! ensuring invalid states are unrepresentable.

mod api_url;
mod resource;

pub use api_url::ApiUrl;
pub use resource::Resource;
