pub mod domain;
pub mod http;
pub mod nats;
pub mod weather_worker;

pub use domain::*;
pub use http::*;
pub use nats::*;
pub use weather_worker::*;
