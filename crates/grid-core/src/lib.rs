//! # Grid Core
//!
//! 表格視圖行快取的核心資料模型與類型定義

pub mod cell;
pub mod changeset;
pub mod config;
pub mod field;
pub mod reason;
pub mod row;

// Re-export 主要類型
pub use cell::{GridCell, GridCellId, GridCellMap};
pub use changeset::{InsertedRow, RowsChangeset, RowsVisibilityChangeset, UpdatedRow};
pub use config::RowCacheConfig;
pub use field::{FieldEvent, FieldInfo, FieldType};
pub use reason::{ChangeReason, DeletedRow, UpdatedIndex, UpdatedIndexMap};
pub use row::RowRecord;

/// 行快取錯誤類型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("找不到行: {0}")]
    RowNotFound(String),

    #[error("傳輸錯誤: {0}")]
    Transport(String),

    #[error("找不到欄位: {0}")]
    FieldNotFound(String),

    #[error("欄位已存在: {0}")]
    DuplicateField(String),

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("序列化錯誤: {0}")]
    Serialization(String),

    #[error("行快取已釋放")]
    Disposed,
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
