//! 文件操作错误定义

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Failed to encode captured room: {0}")]
    EncodingFailure(String),

    #[error("Failed to decode captured room: {0}")]
    DecodingFailure(String),

    #[error("The captured room data could not be read.")]
    MissingGeometry,

    #[error("Unsupported version: {0}")]
    UnsupportedVersion(String),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("3D model export failed: {0}")]
    ModelExport(String),
}
