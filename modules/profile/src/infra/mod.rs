pub mod http_data_client;

pub use http_data_client::HttpDataClient;
