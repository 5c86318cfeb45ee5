//! 有序行儲存

use grid_core::{DeletedRow, RowRecord, UpdatedIndex, UpdatedIndexMap};
use std::collections::HashMap;

/// 有序行儲存
///
/// 行的順序即為顯示順序，行ID在任何時刻都唯一。
/// `positions` 是行ID → 索引的伴隨索引，每次結構性變更後從受影響的位置開始重建；
/// 原地更新不改變位置，因此不需重建。
#[derive(Debug, Clone, Default)]
pub struct OrderedRowStore {
    rows: Vec<RowRecord>,
    positions: HashMap<String, usize>,
}

impl OrderedRowStore {
    /// 創建空的行儲存
    pub fn new() -> Self {
        Self::default()
    }

    /// 以初始行創建（重複的ID只保留第一筆）
    pub fn with_rows(rows: Vec<RowRecord>) -> Self {
        let mut store = Self::new();
        store.replace_all(rows);
        store
    }

    /// 追加到末尾
    ///
    /// 行ID已存在時原地替換，保持唯一性
    pub fn add(&mut self, record: RowRecord) {
        if let Some(&index) = self.positions.get(&record.id) {
            tracing::debug!("行 {} 已存在，原地替換（索引 {}）", record.id, index);
            self.rows[index] = record;
            return;
        }

        self.positions.insert(record.id.clone(), self.rows.len());
        self.rows.push(record);
    }

    /// 在指定位置插入
    ///
    /// 索引會被限制在 `[0, len]` 內。返回實際插入的索引；
    /// 行ID已存在時不做任何變更並返回 `None`。
    pub fn insert(&mut self, index: usize, record: RowRecord) -> Option<usize> {
        if self.positions.contains_key(&record.id) {
            tracing::warn!("拒絕插入重複的行: {}", record.id);
            return None;
        }

        let index = index.min(self.rows.len());
        self.positions.insert(record.id.clone(), index);
        self.rows.insert(index, record);
        self.reindex_from(index + 1);

        Some(index)
    }

    /// 依行ID移除，返回被移除的行及其原索引
    pub fn remove(&mut self, row_id: &str) -> Option<DeletedRow> {
        let index = self.positions.remove(row_id)?;
        let row = self.rows.remove(index);
        self.reindex_from(index);

        Some(DeletedRow { index, row })
    }

    /// 批次原地更新
    ///
    /// 每筆輸入先經 `map_fn` 轉為行記錄；行存在則原地替換並記錄索引，
    /// 不存在則略過（不會因更新而插入）。返回的映射保持輸入順序。
    pub fn update_rows<I, P, M>(&mut self, items: I, mut map_fn: M) -> UpdatedIndexMap
    where
        I: IntoIterator<Item = P>,
        M: FnMut(P) -> RowRecord,
    {
        let mut updated = UpdatedIndexMap::new();

        for item in items {
            let record = map_fn(item);
            match self.positions.get(&record.id) {
                Some(&index) => {
                    updated.insert(UpdatedIndex::new(index, record.id.clone()));
                    self.rows[index] = record;
                }
                None => {
                    tracing::debug!("更新的行 {} 不在儲存中，略過", record.id);
                }
            }
        }

        updated
    }

    /// 移動單行到新位置（目標索引限制在範圍內）
    ///
    /// 返回 `(原索引, 新索引)`
    pub fn move_row(&mut self, row_id: &str, to: usize) -> Option<(usize, usize)> {
        let from = *self.positions.get(row_id)?;
        let to = to.min(self.rows.len() - 1);

        if from != to {
            let row = self.rows.remove(from);
            self.rows.insert(to, row);
            self.reindex_from(from.min(to));
        }

        Some((from, to))
    }

    /// 整體替換（初始載入）
    pub fn replace_all(&mut self, rows: Vec<RowRecord>) {
        self.clear();
        self.rows.reserve(rows.len());

        for row in rows {
            if self.positions.contains_key(&row.id) {
                tracing::warn!("初始載入包含重複的行 {}，略過", row.id);
                continue;
            }
            self.positions.insert(row.id.clone(), self.rows.len());
            self.rows.push(row);
        }
    }

    pub fn get(&self, row_id: &str) -> Option<&RowRecord> {
        self.positions.get(row_id).map(|&index| &self.rows[index])
    }

    pub fn index_of(&self, row_id: &str) -> Option<usize> {
        self.positions.get(row_id).copied()
    }

    pub fn contains(&self, row_id: &str) -> bool {
        self.positions.contains_key(row_id)
    }

    /// 當前順序的唯讀視圖
    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    pub fn row_ids(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.id.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RowRecord> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.positions.clear();
    }

    /// 重建 `start` 之後的伴隨索引
    fn reindex_from(&mut self, start: usize) {
        for (offset, row) in self.rows[start..].iter().enumerate() {
            if let Some(position) = self.positions.get_mut(&row.id) {
                *position = start + offset;
            }
        }
        debug_assert_eq!(self.positions.len(), self.rows.len());
    }
}
