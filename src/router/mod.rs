mod conversation;
mod selector;

pub use conversation::{ConversationRouter, RouteOutcome};
pub use selector::{tokenize, KeywordSelector, RouteDecision, RouteSelector};
