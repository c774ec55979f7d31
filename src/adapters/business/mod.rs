//! Business API adapters.

mod http_business_api;

pub use http_business_api::HttpBusinessApi;
