pub mod aggregate;
pub mod config;
pub mod export;
pub mod http_client;
pub mod roster;
pub mod stats_fetch;
pub mod top_eleven_fetch;
