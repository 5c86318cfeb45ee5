//! 行變更原因

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::row::RowRecord;

/// 被刪除的行（刪除當下的索引 + 行資料）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedRow {
    pub index: usize,
    pub row: RowRecord,
}

/// 被更新的行（更新當下的索引）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedIndex {
    pub index: usize,
    pub row_id: String,
}

impl UpdatedIndex {
    pub fn new(index: usize, row_id: impl Into<String>) -> Self {
        Self {
            index,
            row_id: row_id.into(),
        }
    }
}

/// 行ID → 更新索引（保持插入順序）
///
/// 以列表保存順序，另以行ID → 列表位置的索引做查詢；
/// 序列化時只寫出列表，反序列化時重建索引。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<UpdatedIndex>", into = "Vec<UpdatedIndex>")]
pub struct UpdatedIndexMap {
    entries: Vec<UpdatedIndex>,
    slots: HashMap<String, usize>,
}

impl UpdatedIndexMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入更新索引；同一行再次出現時覆蓋索引但保留原順序
    pub fn insert(&mut self, updated: UpdatedIndex) {
        match self.slots.get(&updated.row_id) {
            Some(&slot) => self.entries[slot].index = updated.index,
            None => {
                self.slots.insert(updated.row_id.clone(), self.entries.len());
                self.entries.push(updated);
            }
        }
    }

    pub fn get(&self, row_id: &str) -> Option<&UpdatedIndex> {
        self.slots.get(row_id).map(|&slot| &self.entries[slot])
    }

    pub fn contains(&self, row_id: &str) -> bool {
        self.slots.contains_key(row_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UpdatedIndex> {
        self.entries.iter()
    }

    pub fn row_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.row_id.as_str()).collect()
    }
}

impl FromIterator<UpdatedIndex> for UpdatedIndexMap {
    fn from_iter<I: IntoIterator<Item = UpdatedIndex>>(iter: I) -> Self {
        let mut map = UpdatedIndexMap::new();
        for updated in iter {
            map.insert(updated);
        }
        map
    }
}

impl From<Vec<UpdatedIndex>> for UpdatedIndexMap {
    fn from(entries: Vec<UpdatedIndex>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<UpdatedIndexMap> for Vec<UpdatedIndex> {
    fn from(map: UpdatedIndexMap) -> Self {
        map.entries
    }
}

impl PartialEq for UpdatedIndexMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for UpdatedIndexMap {}

impl<'a> IntoIterator for &'a UpdatedIndexMap {
    type Item = &'a UpdatedIndex;
    type IntoIter = std::slice::Iter<'a, UpdatedIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// 最近一次變更的原因
///
/// 每次通知都會整個替換，不做合併。帶索引的變更在發出時就攜帶索引值，
/// 監聽者不應在事後自行重新計算。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeReason {
    /// 初始載入
    #[default]
    Initial,

    /// 插入一行
    Inserted { index: usize, row_id: String },

    /// 刪除一行
    Deleted(DeletedRow),

    /// 批次更新
    Updated(UpdatedIndexMap),

    /// 欄位結構變更
    FieldSetChanged,

    /// 單行移動
    Moved { row_id: String, from: usize, to: usize },
}

impl ChangeReason {
    /// 日誌用的變更名稱
    pub fn label(&self) -> &'static str {
        match self {
            ChangeReason::Initial => "initial",
            ChangeReason::Inserted { .. } => "inserted",
            ChangeReason::Deleted(_) => "deleted",
            ChangeReason::Updated(_) => "updated",
            ChangeReason::FieldSetChanged => "field_set_changed",
            ChangeReason::Moved { .. } => "moved",
        }
    }

    /// 此變更是否為包含指定行的更新
    pub fn is_update_for(&self, row_id: &str) -> bool {
        match self {
            ChangeReason::Updated(map) => map.contains(row_id),
            ChangeReason::Initial
            | ChangeReason::Inserted { .. }
            | ChangeReason::Deleted(_)
            | ChangeReason::FieldSetChanged
            | ChangeReason::Moved { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updated_map_preserves_order() {
        let map: UpdatedIndexMap = vec![
            UpdatedIndex::new(5, "c"),
            UpdatedIndex::new(1, "a"),
            UpdatedIndex::new(3, "b"),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.row_ids(), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_updated_map_overwrite_keeps_position() {
        let mut map = UpdatedIndexMap::new();
        map.insert(UpdatedIndex::new(0, "a"));
        map.insert(UpdatedIndex::new(1, "b"));
        map.insert(UpdatedIndex::new(7, "a"));

        assert_eq!(map.len(), 2);
        assert_eq!(map.row_ids(), vec!["a", "b"]);
        assert_eq!(map.get("a").unwrap().index, 7);
    }

    #[test]
    fn test_updated_map_lookup_in_large_batch() {
        let map: UpdatedIndexMap = (0..10_000)
            .map(|i| UpdatedIndex::new(i, format!("row-{}", i)))
            .collect();

        assert_eq!(map.len(), 10_000);
        assert_eq!(map.get("row-9999").map(|u| u.index), Some(9999));
        assert!(map.contains("row-0"));
        assert!(!map.contains("row-10000"));
        assert_eq!(map.row_ids()[4321], "row-4321");
    }

    #[test]
    fn test_updated_map_json_rebuilds_lookup() {
        let mut map = UpdatedIndexMap::new();
        map.insert(UpdatedIndex::new(4, "b"));
        map.insert(UpdatedIndex::new(2, "a"));

        let json = serde_json::to_string(&map).unwrap();
        let parsed: UpdatedIndexMap = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, map);
        assert_eq!(parsed.row_ids(), vec!["b", "a"]);
        assert_eq!(parsed.get("a").map(|u| u.index), Some(2));
    }

    #[test]
    fn test_is_update_for() {
        let mut map = UpdatedIndexMap::new();
        map.insert(UpdatedIndex::new(0, "r"));

        assert!(ChangeReason::Updated(map).is_update_for("r"));
        assert!(!ChangeReason::Updated(UpdatedIndexMap::new()).is_update_for("r"));
        assert!(!ChangeReason::FieldSetChanged.is_update_for("r"));
        assert!(!ChangeReason::Inserted {
            index: 0,
            row_id: "r".to_string()
        }
        .is_update_for("r"));
    }

    #[test]
    fn test_default_reason_is_initial() {
        assert_eq!(ChangeReason::default(), ChangeReason::Initial);
        assert_eq!(ChangeReason::default().label(), "initial");
    }
}
