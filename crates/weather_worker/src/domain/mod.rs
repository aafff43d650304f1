mod error;
mod message;
mod relay_service;
mod validate;
mod weather_provider;

pub use error::*;
pub use message::*;
pub use relay_service::*;
pub use validate::*;
pub use weather_provider::*;
