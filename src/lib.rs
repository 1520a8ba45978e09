// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod document;
pub mod error;
pub mod estimator;
pub mod extension;
pub mod notice;
pub mod refresher;
pub mod runtime;
pub mod settings;
pub mod settings_form;
pub mod status;
pub mod ui;

pub use estimator::{estimate, WordCounter};
pub use extension::Extension;
