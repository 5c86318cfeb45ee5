//! 儲存格模型

use serde::{Deserialize, Serialize};

use crate::field::FieldInfo;

/// 儲存格識別（視圖 + 欄位 + 行）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCellId {
    pub view_id: String,
    pub field_id: String,
    pub row_id: String,
}

/// 需要顯示的儲存格
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    /// 視圖ID
    pub view_id: String,

    /// 行ID
    pub row_id: String,

    /// 所屬欄位
    pub field: FieldInfo,

    /// 原始資料（行未提供時為 None）
    pub data: Option<String>,
}

impl GridCell {
    /// 獲取儲存格識別
    pub fn cell_id(&self) -> GridCellId {
        GridCellId {
            view_id: self.view_id.clone(),
            field_id: self.field.id.clone(),
            row_id: self.row_id.clone(),
        }
    }
}

/// 欄位ID → 儲存格（保持欄位順序）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCellMap {
    cells: Vec<GridCell>,
}

impl GridCellMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入儲存格；同一欄位已存在時覆蓋
    pub fn insert(&mut self, cell: GridCell) {
        match self.cells.iter_mut().find(|c| c.field.id == cell.field.id) {
            Some(existing) => *existing = cell,
            None => self.cells.push(cell),
        }
    }

    pub fn get(&self, field_id: &str) -> Option<&GridCell> {
        self.cells.iter().find(|c| c.field.id == field_id)
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.get(field_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GridCell> {
        self.cells.iter()
    }

    /// 按順序列出欄位ID
    pub fn field_ids(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.field.id.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a GridCellMap {
    type Item = &'a GridCell;
    type IntoIter = std::slice::Iter<'a, GridCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
