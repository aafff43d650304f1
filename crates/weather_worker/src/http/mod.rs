mod wttr_client;

pub use wttr_client::*;
