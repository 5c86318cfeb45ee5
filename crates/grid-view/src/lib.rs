//! # Grid View
//!
//! 行快取控制器：接收遠端變更集、維護有序行儲存、
//! 通知行變更與行監聽器，並在需要時背景拉取缺少的行。

pub mod controller;
pub mod fetcher;
pub mod field_notifier;
pub mod listener;

#[cfg(test)]
mod test_utils;

pub use controller::{RowCache, RowCacheHandle};
pub use fetcher::RowFetcher;
pub use field_notifier::{FieldNotifier, FieldSubscription};
pub use listener::{CellUpdatedCallback, ListenWhen, RowListener, RowListenerId};

/// 一次變更集套用的結果統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangesetSummary {
    /// 實際刪除的行數
    pub deleted: usize,

    /// 實際插入的行數
    pub inserted: usize,

    /// 實際更新的行數
    pub updated: usize,
}

impl ChangesetSummary {
    /// 總變更數
    pub fn total(&self) -> usize {
        self.deleted + self.inserted + self.updated
    }

    /// 是否沒有任何變更
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
