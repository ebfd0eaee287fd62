pub mod relay;
pub mod response;
pub mod sse;

pub use relay::{RelayLimits, spawn_relay};
pub use response::stream_response;
pub use sse::TokenStream;
