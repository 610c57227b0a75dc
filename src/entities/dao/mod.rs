//! Plain row structs shared between the store traits and their callers.

mod message;
mod setting;

pub use message::ChatMessage;
pub use setting::Setting;
