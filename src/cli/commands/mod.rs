//! CLI command implementations.

mod ask;
mod chat;
mod chunks;
mod config;
mod doctor;
mod search;

pub use ask::run_ask;
pub use chat::run_chat;
pub use chunks::run_chunks;
pub use config::run_config;
pub use doctor::run_doctor;
pub use search::run_search;
