#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Node configuration documents, profiles, and the engine that applies them.
//!
//! Layout: `model.rs` (documents, values, apply payloads), `validate.rs`
//! (path and value parsing helpers), `defaults.rs` (default node settings),
//! `profile.rs` (`ProfileRegistry`), `engine.rs` (`ProfileEngine`), `redact.rs`
//! (`Redactor`), `store.rs` (`ConfigStore` implementations), `service.rs`
//! (`ConfigService`).

pub mod defaults;
pub mod engine;
pub mod error;
pub mod model;
pub mod profile;
pub mod redact;
pub mod service;
pub mod store;
pub mod validate;

pub use defaults::default_document;
pub use engine::ProfileEngine;
pub use error::{ConfigError, ConfigResult};
pub use model::{ApplyOptions, ApplyResult, ConfigDocument, ConfigValue, ValueHint};
pub use profile::{Profile, ProfileRegistry, Transform};
pub use redact::{PRIVATE_KEY_PATH, Redactor, SensitiveRule};
pub use service::ConfigService;
pub use store::{CONFIG_FILE_NAME, ConfigStore, FileConfigStore, MemoryConfigStore};
