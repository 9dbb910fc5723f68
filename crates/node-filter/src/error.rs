#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("unterminated group for '{key}' near byte {position}")]
    UnterminatedGroup { key: String, position: usize },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;

impl From<serde_json::Error> for FilterError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
