pub mod dispatch;
pub mod parse;
pub mod provider;
pub mod providers;
pub mod runner;

pub use dispatch::{Dispatcher, ModelId};
pub use parse::OutputShape;
pub use provider::{CliAdapter, LlmError, Message, ProviderKind, QueryResponse, Role};
pub use runner::{CommandRunner, ProcessRunner, RawOutput};
