pub mod clients;
pub mod config;
pub mod core;
pub mod error;
pub mod quiz;
pub mod session;
pub mod status;

// Convenient re-exports
pub use config::{ApiEndpoint, QuizConfig, Translation};
pub use crate::core::{HttpTransport, VerseFetcher, VerseRecord};
pub use quiz::{Question, QuestionBuilder, QuestionKind};
pub use session::{HistoryEntry, SessionState};
pub use status::{check_api_status, ConnectionStatus};
