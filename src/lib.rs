//! # Grid
//!
//! 表格視圖的記憶體行快取。
//!
//! - [`grid_core`]：資料模型、變更集、錯誤與配置
//! - [`grid_cache`]：有序行儲存、變更通知器、儲存格快取與產生器
//! - [`grid_view`]：行快取控制器、行監聽器、欄位通知器與遠端拉取邊界

pub use grid_cache;
pub use grid_core;
pub use grid_view;

pub use grid_cache::{CellCache, CellCacheKey, ListenerHandle};
pub use grid_core::{
    ChangeReason, DeletedRow, FieldEvent, FieldInfo, FieldType, GridCell, GridCellMap, GridError,
    InsertedRow, Result, RowCacheConfig, RowRecord, RowsChangeset, RowsVisibilityChangeset,
    UpdatedIndex, UpdatedIndexMap, UpdatedRow,
};
pub use grid_view::{
    ChangesetSummary, FieldNotifier, RowCache, RowCacheHandle, RowFetcher, RowListener,
    RowListenerId,
};
