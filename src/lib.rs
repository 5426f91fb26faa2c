pub mod driver;
pub mod export;
pub mod fetch;
pub mod http_client;
pub mod session;
pub mod stats;
