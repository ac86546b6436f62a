//! ESP-IDF backed capabilities, only built for the device

pub mod http;
pub mod power;
pub mod wifi;

pub use http::HttpFetcher;
pub use power::EspPower;
pub use wifi::WifiConnection;
