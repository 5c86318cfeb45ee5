//! 遠端變更集模型

use serde::{Deserialize, Serialize};

use crate::row::RowRecord;

/// 插入的行（目標位置 + 行資料）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertedRow {
    /// 目標位置（刪除之後的序列中的索引）
    pub index: usize,

    /// 行資料
    pub row: RowRecord,
}

impl InsertedRow {
    pub fn new(index: usize, row: RowRecord) -> Self {
        Self { index, row }
    }
}

/// 更新的行（新行資料 + 變更的欄位）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedRow {
    /// 新行資料
    pub row: RowRecord,

    /// 變更的欄位ID
    #[serde(default)]
    pub field_ids: Vec<String>,
}

impl UpdatedRow {
    pub fn new(row: RowRecord) -> Self {
        Self {
            row,
            field_ids: Vec::new(),
        }
    }

    /// 建構器模式：設置變更的欄位
    pub fn with_field_ids(mut self, field_ids: Vec<String>) -> Self {
        self.field_ids = field_ids;
        self
    }
}

/// 行變更集（刪除 → 插入 → 更新）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowsChangeset {
    /// 刪除的行ID
    #[serde(default)]
    pub deleted_rows: Vec<String>,

    /// 插入的行
    #[serde(default)]
    pub inserted_rows: Vec<InsertedRow>,

    /// 更新的行
    #[serde(default)]
    pub updated_rows: Vec<UpdatedRow>,
}

impl RowsChangeset {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：加入刪除
    pub fn with_deleted(mut self, row_id: impl Into<String>) -> Self {
        self.deleted_rows.push(row_id.into());
        self
    }

    /// 建構器模式：加入插入
    pub fn with_inserted(mut self, index: usize, row: RowRecord) -> Self {
        self.inserted_rows.push(InsertedRow::new(index, row));
        self
    }

    /// 建構器模式：加入更新
    pub fn with_updated(mut self, updated: UpdatedRow) -> Self {
        self.updated_rows.push(updated);
        self
    }

    /// 從 JSON 解析變更集
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.deleted_rows.is_empty() && self.inserted_rows.is_empty() && self.updated_rows.is_empty()
    }
}

/// 行可見性變更集（隱藏 → 顯示）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowsVisibilityChangeset {
    /// 變為隱藏的行ID
    #[serde(default)]
    pub invisible_rows: Vec<String>,

    /// 變為可見的行
    #[serde(default)]
    pub visible_rows: Vec<InsertedRow>,
}

impl RowsVisibilityChangeset {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：加入隱藏
    pub fn with_invisible(mut self, row_id: impl Into<String>) -> Self {
        self.invisible_rows.push(row_id.into());
        self
    }

    /// 建構器模式：加入顯示
    pub fn with_visible(mut self, index: usize, row: RowRecord) -> Self {
        self.visible_rows.push(InsertedRow::new(index, row));
        self
    }

    /// 從 JSON 解析變更集
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.invisible_rows.is_empty() && self.visible_rows.is_empty()
    }
}
