pub mod gateway;
pub mod provider;
pub mod providers;

pub use gateway::{GatewaySettings, LlmGateway, StageSettings};
pub use providers::create_provider;
