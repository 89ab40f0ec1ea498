pub mod history;
pub mod message;

pub use history::Conversation;
pub use message::{Message, Role};
