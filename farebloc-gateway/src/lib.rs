pub mod app_config;
pub mod http;
pub mod memory;

pub use app_config::AppConfig;
pub use http::HttpSeriesGateway;
pub use memory::InMemorySeriesGateway;
