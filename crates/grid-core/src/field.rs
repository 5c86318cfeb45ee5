//! 欄位模型

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 欄位類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// 文字
    RichText,
    /// 數字
    Number,
    /// 日期時間
    DateTime,
    /// 單選
    SingleSelect,
    /// 多選
    MultiSelect,
    /// 勾選框
    Checkbox,
    /// 網址
    Url,
}

/// 欄位描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    /// 欄位ID
    pub id: String,

    /// 欄位名稱
    pub name: String,

    /// 欄位類型
    pub field_type: FieldType,

    /// 是否顯示
    pub visibility: bool,

    /// 欄寬
    pub width: u32,
}

impl FieldInfo {
    /// 創建新的欄位（預設可見）
    pub fn new(id: impl Into<String>, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type,
            visibility: true,
            width: 150,
        }
    }

    /// 建構器模式：設置可見性
    pub fn with_visibility(mut self, visibility: bool) -> Self {
        self.visibility = visibility;
        self
    }

    /// 建構器模式：設置欄寬
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }
}

/// 欄位結構變更通知
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    /// 整個欄位列表被替換
    FieldsChanged(Arc<[FieldInfo]>),

    /// 單一欄位內容變更（欄位ID）
    FieldChanged(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_builder() {
        let field = FieldInfo::new("f1", "Name", FieldType::RichText)
            .with_visibility(false)
            .with_width(200);

        assert_eq!(field.id, "f1");
        assert_eq!(field.field_type, FieldType::RichText);
        assert!(!field.visibility);
        assert_eq!(field.width, 200);
    }
}
