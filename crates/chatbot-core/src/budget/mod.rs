//! Token budget management for outgoing requests.
//!
//! The conversation history grows without bound; the pieces here decide how
//! much of it fits into a single request.
//!
//! - [`counter`]: cheap heuristic token estimation behind the [`TokenCounter`] trait
//! - [`strategy`]: the [`ContextStrategy`] trait and the recent-suffix window
//! - [`types`]: [`PreparedContext`] and [`BudgetError`]

pub mod counter;
pub mod strategy;
pub mod types;

pub use counter::{HeuristicTokenCounter, SharedTokenCounter, TokenCounter};
pub use strategy::{ContextStrategy, SuffixWindowStrategy};
pub use types::{BudgetError, PreparedContext};
