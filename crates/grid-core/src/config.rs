//! 行快取配置

use serde::{Deserialize, Serialize};

use crate::{GridError, Result};

/// 行快取配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCacheConfig {
    /// 視圖ID
    pub view_id: String,

    /// 行不在快取（或只是佔位行）時是否向遠端拉取
    #[serde(default = "default_true")]
    pub fetch_missing_rows: bool,

    /// 同一行已有拉取進行中時，是否略過重複拉取
    #[serde(default = "default_true")]
    pub dedupe_inflight_fetches: bool,

    /// 刪除（或隱藏）行時是否一併清除該行的儲存格快取
    #[serde(default = "default_true")]
    pub purge_cells_on_delete: bool,

    /// 儲存格快取的初始容量（欄位數）
    #[serde(default)]
    pub cell_cache_capacity: usize,
}

fn default_true() -> bool {
    true
}

impl RowCacheConfig {
    /// 創建新的行快取配置
    pub fn new(view_id: impl Into<String>) -> Self {
        Self {
            view_id: view_id.into(),
            fetch_missing_rows: true,
            dedupe_inflight_fetches: true,
            purge_cells_on_delete: true,
            cell_cache_capacity: 0,
        }
    }

    /// 從 JSON 載入配置並驗證
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RowCacheConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置是否拉取缺失的行
    pub fn with_fetch_missing_rows(mut self, enabled: bool) -> Self {
        self.fetch_missing_rows = enabled;
        self
    }

    /// 建構器模式：設置是否略過重複拉取
    pub fn with_dedupe_inflight_fetches(mut self, enabled: bool) -> Self {
        self.dedupe_inflight_fetches = enabled;
        self
    }

    /// 建構器模式：設置刪除時是否清除儲存格快取
    pub fn with_purge_cells_on_delete(mut self, enabled: bool) -> Self {
        self.purge_cells_on_delete = enabled;
        self
    }

    /// 建構器模式：設置儲存格快取初始容量
    pub fn with_cell_cache_capacity(mut self, capacity: usize) -> Self {
        self.cell_cache_capacity = capacity;
        self
    }

    /// 驗證配置
    pub fn validate(&self) -> Result<()> {
        if self.view_id.trim().is_empty() {
            return Err(GridError::InvalidConfig("view_id 不可為空".to_string()));
        }
        Ok(())
    }
}
