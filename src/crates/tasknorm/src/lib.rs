//! # tasknorm - task normalization pipeline
//!
//! Turns free-form task lines ("need 2 call bob abt the q3 deck!!") into
//! validated records: a 10-15 word actionable summary, one or more category
//! tags, a priority with the model's stated confidence, and timing.
//!
//! ## Pipeline
//!
//! For each task the [`TaskProcessor`] renders three fixed prompts
//! ([`prompts`]), sends them concurrently to an injected
//! [`llm::CompletionClient`], normalizes the raw completions
//! ([`normalize`]) and builds a [`TaskOutput`]. Construction is the
//! validation gate: a record that exists is a record that is valid.
//!
//! Batches ([`BatchRunner`]) run tasks on a bounded pool; one line failing
//! never stops the others.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llm::remote::GroqClient;
//! use std::sync::Arc;
//! use tasknorm::{AppConfig, TaskInput, TaskProcessor};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::from_env()?;
//! let client = GroqClient::new(config.completion_config())?;
//! let processor = TaskProcessor::new(Arc::new(client));
//!
//! let output = processor.process(&TaskInput::new("buy milk + eggs tmrw")?).await?;
//! println!("{} [{}]", output.summary(), output.priority());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod export;
pub mod normalize;
pub mod processor;
pub mod prompts;
pub mod schema;
pub mod stats;
pub mod text;
pub mod version;

mod error;

pub use batch::{parse_task_lines, BatchItem, BatchReport, BatchRunner};
pub use config::AppConfig;
pub use error::{Error, ProcessingError, Result, ValidationError};
pub use export::{ExportFormat, ExportRecord};
pub use processor::TaskProcessor;
pub use prompts::Extraction;
pub use schema::{Priority, TagCategory, TaskInput, TaskOutput};
pub use stats::BatchStats;
