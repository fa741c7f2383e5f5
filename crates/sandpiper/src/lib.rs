#![doc = include_str!("../README.md")]

mod audit;
mod config;
pub mod content;
pub mod date;
mod feed;
pub mod html;
pub mod markdown;
mod permalink;
pub mod render;
pub mod routes;
mod search;
mod serve;
mod site;
mod sitemap;
pub mod storage;
pub mod taxonomy;

pub use audit::*;
pub use config::*;
pub use feed::*;
pub use permalink::*;
pub use search::*;
pub use serve::*;
pub use site::*;
pub use sitemap::*;
