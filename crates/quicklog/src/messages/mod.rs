//! Built-in messages
//!
//! - [`BaseMessage`] - a block of text, wrapped to the terminal width
//! - [`TitleMessage`] - a boxed heading with an optional description
//! - [`ErrorMessage`] - an error, with an optional human explanation
//! - [`Loader`] - a live status line for long-running operations

pub mod base;
pub mod error;
pub mod loader;
pub mod title;

pub use base::BaseMessage;
pub use error::ErrorMessage;
pub use loader::{Loader, LoaderConfig, LoaderStatus};
pub use title::TitleMessage;
