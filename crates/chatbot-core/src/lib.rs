pub mod budget;
pub mod config;
pub mod conversation;

pub use budget::{
    BudgetError, ContextStrategy, HeuristicTokenCounter, PreparedContext, SuffixWindowStrategy,
    TokenCounter,
};
pub use config::{ConfigError, ModelProvider};
pub use conversation::{Conversation, Message, Role};
