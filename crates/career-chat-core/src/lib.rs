pub mod api;
pub mod config;
pub mod controller;
pub mod message;
pub mod transcript;

// Re-export main types for convenience
pub use api::{ApiClient, ChatBackend, ChatRequest, ChatResponse, HealthStatus};
pub use config::Config;
pub use controller::{ChatController, Rejection, SendOutcome, FAILURE_MESSAGE};
pub use message::{Message, Role};
pub use transcript::Transcript;
