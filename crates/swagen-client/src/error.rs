use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("no emitter registered for calling convention `{0}`")]
    UnsupportedConvention(String),

    #[error("template rendering failed: {0}")]
    Template(#[from] minijinja::Error),

    #[error("failed to serialize template value: {0}")]
    Serialize(#[from] serde_json::Error),
}
