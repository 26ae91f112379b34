//! Pluggable PII detection: detector definitions indexed by language and
//! country, resolved into executable tasks and run over chunked documents.

pub mod category;
pub mod cli;
pub mod config;
pub mod context;
pub mod definition;
pub mod detectors;
pub mod document;
pub mod entity;
pub mod error;
pub mod finder;
pub mod resolver;
pub mod task;

pub use category::PiiCategory;
pub use definition::{DefinitionStore, DetectorDefinition, TaskSpec};
pub use document::{SourceDocument, TextDocument};
pub use entity::{PiiCollection, PiiEntity};
pub use error::{PiiError, Result};
pub use finder::{FinderOptions, PiiFinder, TaskSelection};
