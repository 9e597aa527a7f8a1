//! Remote completion providers.
//!
//! - **Groq** - OpenAI-compatible chat completions (Llama 3 family)

pub mod groq;

pub use groq::GroqClient;
