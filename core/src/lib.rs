// Core functionality shared by the J.A.R.V.I.S crates:
// - chat-completion client for the Groq API
// - request/response data structures
// - configuration loading
// - shared error types

// Export client module - completion capability and Groq client
pub mod client;
pub use client::*;

// Export types module - request/response data structures
pub mod types;
pub use types::*;

// Export config module - configuration loading
pub mod config;
pub use config::*;

// Export errors module - shared error types
pub mod errors;
pub use errors::*;
