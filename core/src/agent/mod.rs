//! Agent bootstrap and the conversation runtime seam

pub mod bootstrap;
pub mod prompt;
pub mod runtime;

pub use bootstrap::AgentBuilder;
pub use prompt::{build_instructions, build_session_instruction};
pub use runtime::{AgentSetup, ConversationRuntime};
