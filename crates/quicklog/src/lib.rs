//! quicklog - Semantic log rendering for terminals and log pipelines
//!
//! Log events are values implementing [`Message`]: each one knows how to
//! render itself as human-readable terminal text and as a structured
//! [`Record`]. A [`Logger`] picks the form that fits its destination.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Messages   │  Title, Base, Error, Loader
//! └──────┬──────┘
//!        │ rendered by
//!        ▼
//! ┌─────────────┐
//! │   Logger    │  Terminal (text) or Json (records)
//! └──────┬──────┘
//!        │ writes to
//!        ▼
//! ┌─────────────┐
//! │ Destination │  stdout, stderr, in-memory capture
//! └─────────────┘
//! ```
//!
//! Long-running operations use a [`Loader`]: a live status line that
//! re-renders itself while the operation runs and streams its frames through
//! [`Frames`] until it is closed.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use quicklog::{Level, Loader, LoaderConfig, Logger, TerminalLogger, TitleMessage};
//!
//! let logger = TerminalLogger::new();
//! logger.log(Level::Info, &TitleMessage::new("Deploy").with_description("staging"));
//!
//! let loader = Arc::new(Loader::new("Uploading artifacts", LoaderConfig::default()));
//! let mut session = logger.log_animated(loader.clone());
//! loader.update("Restarting services");
//! loader.success("Deployed");
//! session.close();
//! ```

pub mod destination;
pub mod duration;
pub mod frames;
pub mod level;
pub mod loggers;
pub mod message;
pub mod messages;
pub mod settings;
pub mod theme;

// Re-export main types for convenience
pub use destination::{Capture, Destination};
pub use frames::Frames;
pub use level::Level;
pub use loggers::{AnimatedSession, JsonLogger, Logger, TerminalLogger};
pub use message::{AnimatedMessage, Message, Record};
pub use messages::{BaseMessage, ErrorMessage, Loader, LoaderConfig, LoaderStatus, TitleMessage};
pub use settings::{Settings, settings};
