pub mod adapters;
pub mod client;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use adapters::GeminiClient;
pub use config::{ServerArgs, Settings};
pub use core::checker::GrammarChecker;
pub use domain::model::{CheckRequest, CheckResult};
pub use domain::ports::TextGenerator;
pub use server::{router, AppState};
pub use utils::error::{GrammateError, Result};
