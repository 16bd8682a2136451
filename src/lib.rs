//! Fill missing, fuzzy and stale gettext translations through a
//! machine-translation backend.

pub mod config;
pub mod error;
pub mod model;
pub mod parsers;
pub mod services;

pub use error::{CatalogError, ConfigError, TranslateError, UpdateError};
pub use model::catalog::Catalog;
pub use model::entry::CatalogEntry;
pub use services::report::{FileReport, RunReport};
pub use services::translate::{GoogleConfig, GoogleTranslator, Translator};
pub use services::updater::{CatalogUpdater, UpdateOptions};
