//! 儲存格快取

use std::collections::HashMap;

/// 儲存格快取鍵（欄位 + 行）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellCacheKey {
    pub field_id: String,
    pub row_id: String,
}

impl CellCacheKey {
    pub fn new(field_id: impl Into<String>, row_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            row_id: row_id.into(),
        }
    }
}

/// 儲存格快取
///
/// 依欄位分組保存，方便整個欄位失效
#[derive(Debug, Clone)]
pub struct CellCache<V = String> {
    fields: HashMap<String, HashMap<String, V>>,
}

impl<V> CellCache<V> {
    /// 創建新的快取
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// 以欄位數預留容量
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: HashMap::with_capacity(capacity),
        }
    }

    /// 寫入儲存格，返回舊值
    pub fn insert(&mut self, key: CellCacheKey, value: V) -> Option<V> {
        self.fields
            .entry(key.field_id)
            .or_default()
            .insert(key.row_id, value)
    }

    pub fn get(&self, key: &CellCacheKey) -> Option<&V> {
        self.fields.get(&key.field_id)?.get(&key.row_id)
    }

    pub fn contains(&self, key: &CellCacheKey) -> bool {
        self.get(key).is_some()
    }

    /// 移除單一儲存格
    pub fn remove(&mut self, key: &CellCacheKey) -> Option<V> {
        let rows = self.fields.get_mut(&key.field_id)?;
        let removed = rows.remove(&key.row_id);
        if rows.is_empty() {
            self.fields.remove(&key.field_id);
        }
        removed
    }

    /// 移除某欄位的所有儲存格，返回移除數量
    pub fn remove_field(&mut self, field_id: &str) -> usize {
        self.fields
            .remove(field_id)
            .map(|rows| rows.len())
            .unwrap_or(0)
    }

    /// 移除某行在所有欄位上的儲存格，返回移除數量
    pub fn remove_row(&mut self, row_id: &str) -> usize {
        let mut removed = 0;
        self.fields.retain(|_, rows| {
            if rows.remove(row_id).is_some() {
                removed += 1;
            }
            !rows.is_empty()
        });
        removed
    }

    /// 快取的儲存格總數
    pub fn len(&self) -> usize {
        self.fields.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 清空快取（保留已分配的容量）
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// 釋放所有快取
    pub fn dispose(&mut self) {
        self.fields.clear();
        self.fields.shrink_to_fit();
    }
}

impl<V> Default for CellCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
