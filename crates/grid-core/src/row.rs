//! 行資料模型

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 預設行高
pub const DEFAULT_ROW_HEIGHT: u32 = 36;

/// 行記錄（表格中的一行）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRecord {
    /// 行ID（在快取內唯一）
    pub id: String,

    /// 行高
    #[serde(default = "default_height")]
    pub height: u32,

    /// 儲存格原始資料（欄位ID → 資料）
    /// - Some: 行資料已載入
    /// - None: 佔位行，資料尚未從遠端拉取
    #[serde(default)]
    pub cells: Option<HashMap<String, String>>,
}

fn default_height() -> u32 {
    DEFAULT_ROW_HEIGHT
}

impl RowRecord {
    /// 創建已載入（但沒有任何儲存格資料）的行
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            height: DEFAULT_ROW_HEIGHT,
            cells: Some(HashMap::new()),
        }
    }

    /// 創建佔位行（只有ID，資料待拉取）
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            height: DEFAULT_ROW_HEIGHT,
            cells: None,
        }
    }

    /// 建構器模式：設置行高
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    /// 建構器模式：設置儲存格資料
    ///
    /// 佔位行設置資料後即視為已載入
    pub fn with_cell(mut self, field_id: impl Into<String>, data: impl Into<String>) -> Self {
        self.cells
            .get_or_insert_with(HashMap::new)
            .insert(field_id.into(), data.into());
        self
    }

    /// 行資料是否已載入
    pub fn is_loaded(&self) -> bool {
        self.cells.is_some()
    }

    /// 獲取某欄位的儲存格資料
    pub fn cell_data(&self, field_id: &str) -> Option<&str> {
        self.cells
            .as_ref()
            .and_then(|cells| cells.get(field_id))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_row() {
        let row = RowRecord::new("row-1")
            .with_height(48)
            .with_cell("name", "Alice");

        assert_eq!(row.id, "row-1");
        assert_eq!(row.height, 48);
        assert!(row.is_loaded());
        assert_eq!(row.cell_data("name"), Some("Alice"));
        assert_eq!(row.cell_data("age"), None);
    }

    #[test]
    fn test_placeholder_row() {
        let row = RowRecord::placeholder("row-2");
        assert!(!row.is_loaded());
        assert_eq!(row.cell_data("name"), None);

        // 設置資料後變為已載入
        let row = row.with_cell("name", "Bob");
        assert!(row.is_loaded());
    }

    #[test]
    fn test_deserialize_row_defaults() {
        let row: RowRecord = serde_json::from_str(r#"{"id":"row-3"}"#).unwrap();
        assert_eq!(row.height, DEFAULT_ROW_HEIGHT);
        assert!(!row.is_loaded());
    }
}
