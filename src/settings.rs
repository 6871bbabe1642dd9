//! Type-level configuration of models.
//!
//! A [`ModelConfig`] is handed to a model type when it is built. The plain
//! parts can be layered from a config file and `BASEMODEL_*` environment
//! variables; the observer is injected in code.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{ModelError, Result};
use crate::observer::MutationObserver;

pub const DEFAULT_PREFIX: &str = "_";
pub const DEFAULT_KEY_FIELD: &str = "id";

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Names raw slot access: `<prefix><field>` reads and writes the backing
    /// store of `field` without coercion.
    pub prefix: String,
    /// Attribute that identifies an instance, used by `key` and `wrap`.
    pub key_field: String,
    #[serde(skip)]
    pub observer: Option<Rc<dyn MutationObserver>>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_owned(),
            key_field: DEFAULT_KEY_FIELD.to_owned(),
            observer: None,
        }
    }
}

impl ModelConfig {
    /// Defaults, then the file at `path` (if given), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("prefix", DEFAULT_PREFIX)?
            .set_default("key_field", DEFAULT_KEY_FIELD)?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let config: ModelConfig = builder
            .add_source(Environment::with_prefix("BASEMODEL"))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
    pub fn with_key_field(mut self, key_field: impl Into<String>) -> Self {
        self.key_field = key_field.into();
        self
    }
    pub fn with_observer(mut self, observer: Rc<dyn MutationObserver>) -> Self {
        self.observer = Some(observer);
        self
    }
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(ModelError::Config("prefix must not be empty".into()));
        }
        if self.key_field.is_empty() {
            return Err(ModelError::Config("key_field must not be empty".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("prefix", &self.prefix)
            .field("key_field", &self.key_field)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
