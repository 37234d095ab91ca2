//! Client library for the taskdeck terminal to-do app
//!
//! This crate holds everything below the presentation layer:
//!
//! - Persisted session credential ([`SessionStore`])
//! - App configuration ([`Config`])
//! - HTTP clients for the auth and task endpoints ([`AuthClient`],
//!   [`TaskApiClient`])
//! - The local task collection with status/priority filtering ([`TaskList`])
//!
//! The task collection is a best-effort mirror of remote state: fetched
//! wholesale on session start, mutated incrementally as individual
//! operations succeed. A failed request leaves it untouched.
//!
//! # Examples
//!
//! ```rust,no_run
//! use taskdeck_client::{TaskApiClient, TaskList};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = TaskApiClient::builder("http://localhost:3000").build()?;
//!     client.set_bearer_token(Some("your_token"));
//!
//!     let mut list = TaskList::new();
//!     list.replace_all(client.list_tasks().await?);
//!
//!     for task in list.filtered() {
//!         println!("[{}] {} ({})", task.status, task.text, task.priority);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
mod http;
pub mod list;
pub mod session;
pub mod tasks;

pub use auth::AuthClient;
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use list::{PriorityFilter, StatusFilter, TaskList};
pub use session::SessionStore;
pub use tasks::{TaskApiClient, TaskApiClientBuilder};
