use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("key is undefined (no value for `{field}`)")]
    KeyUndefined { field: String },
    #[error("template must be a String")]
    TemplateNotString,
    #[error("data must be an Object with keys as template marks")]
    DataNotObject,
    #[error("field `{field}` collides with the backing-store prefix `{prefix}`")]
    PrefixCollision { field: String, prefix: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;

// Helper conversions
impl From<config::ConfigError> for ModelError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
