pub mod errors;
pub mod message;
pub mod request;
pub mod streaming;

pub use errors::{CompletionError, PromptError};
pub use message::{AssistantContent, Message, MessageError};
pub use request::*;
pub use streaming::*;
