use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("{0}")]
    Engine(#[from] engine::EngineError),
    #[error("store error: {0}")]
    Store(#[from] storage::StoreError),
    #[error("export error: {0}")]
    Export(#[from] export::ExportError),
    #[error("{0}")]
    Notify(#[from] notify::NotifyError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no {kind} matches `{query}`")]
    NotFound { kind: &'static str, query: String },
    #[error("`{query}` matches {matches} {kind}s, be more specific")]
    Ambiguous {
        kind: &'static str,
        query: String,
        matches: usize,
    },
    #[error("{0}")]
    Input(String),
}
