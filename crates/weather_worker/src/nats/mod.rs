mod demo;
mod weather_request_processor;
mod weather_response_producer;

pub use demo::*;
pub use weather_request_processor::*;
pub use weather_response_producer::*;
