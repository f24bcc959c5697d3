pub mod ask;
pub mod conversation;

pub use ask::{AskRequest, AskResponse};
pub use conversation::{Conversation, SYSTEM_INSTRUCTION};
