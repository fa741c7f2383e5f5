//! The category taxonomy: an authored tree of categories that posts are filed
//! against, and the resolution of post counts and category queries over it.

mod counts;
mod query;
mod tree;

pub use counts::*;
pub use query::*;
pub use tree::*;
