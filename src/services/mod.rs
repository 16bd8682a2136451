pub mod encoding;
pub mod rebuild;
pub mod report;
pub mod store;
pub mod translate;
pub mod updater;
pub mod walk;
