//! Runtime settings for the binary and the HTTP server.
//!
//! Read from an optional settings file (`viewurl.toml` unless a path is given)
//! and overridden by `VIEWURL_*` environment variables, e.g.
//! `VIEWURL_SCHEMA_FILE=schema.json VIEWURL_BIND=0.0.0.0:9090`.

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::Result;
use crate::hooks::StaticHooks;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Path of the schema JSON document.
    pub schema_file: String,
    pub bind: String,
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub log_filter: String,
    /// Items, parts, named spans and hash keys known up front.
    #[serde(default)]
    pub hooks: StaticHooks,
}

impl Settings {
    /// Loads `path`, or `viewurl.toml` if present, then applies the environment.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(path) => File::with_name(path),
            None => File::with_name("viewurl").required(false),
        };
        Self::build(Self::defaults()?.add_source(file))
    }
    /// Settings from TOML text, with environment overrides applied on top.
    pub fn from_toml(toml: &str) -> Result<Self> {
        Self::build(Self::defaults()?.add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("bind", DEFAULT_BIND)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?)
    }
    fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let settings = builder
            .add_source(Environment::with_prefix("VIEWURL"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
