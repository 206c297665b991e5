pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("class not found in registry: {name}")]
    NotFound { name: String },

    #[error("class record has an empty name")]
    EmptyName,

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}
