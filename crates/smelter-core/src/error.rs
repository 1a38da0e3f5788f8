use thiserror::Error;

pub type Result<T> = std::result::Result<T, SmeltError>;

#[derive(Debug, Error)]
pub enum SmeltError {
    #[error("recipe document error: {0}")]
    RecipeDoc(String),

    #[error("pe format error: {0}")]
    PeFormat(String),

    #[error("no icon resources: {0}")]
    NoIcons(String),

    #[error("icon format error: {0}")]
    IconFormat(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
