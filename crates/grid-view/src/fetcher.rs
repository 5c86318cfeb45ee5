//! 遠端行資料拉取

use grid_core::{GridError, Result, RowRecord, RowsChangeset, RowsVisibilityChangeset};
use std::future::Future;
use tokio::sync::mpsc;

/// 依ID拉取行資料的遠端來源
///
/// 失敗時返回 `GridError::RowNotFound` 或 `GridError::Transport`；
/// 行快取只記錄錯誤，不會重試，也不會傳給呼叫者。
pub trait RowFetcher: Send + Sync + 'static {
    fn fetch_row(
        &self,
        view_id: &str,
        row_id: &str,
    ) -> impl Future<Output = Result<RowRecord>> + Send;
}

/// 送入行快取訊息佇列的訊息
#[derive(Debug)]
pub(crate) enum CacheMessage {
    /// 遠端行變更
    RowsChanged(RowsChangeset),

    /// 遠端行可見性變更
    VisibilityChanged(RowsVisibilityChangeset),

    /// 行資料拉取完成
    RowFetched {
        row_id: String,
        result: Result<RowRecord>,
    },
}

/// 進行中的拉取
///
/// 拉取任務在送出結果前被丟棄（例如執行環境關閉）時，
/// 改送出 `GridError::Transport`，讓行快取清除進行中的標記。
pub(crate) struct PendingFetch {
    row_id: String,
    tx: mpsc::UnboundedSender<CacheMessage>,
    completed: bool,
}

impl PendingFetch {
    pub(crate) fn new(row_id: impl Into<String>, tx: mpsc::UnboundedSender<CacheMessage>) -> Self {
        Self {
            row_id: row_id.into(),
            tx,
            completed: false,
        }
    }

    pub(crate) fn row_id(&self) -> &str {
        &self.row_id
    }

    /// 送出拉取結果
    pub(crate) fn complete(mut self, result: Result<RowRecord>) {
        self.completed = true;
        self.send(result);
    }

    fn send(&self, result: Result<RowRecord>) {
        // 行快取已釋放時接收端已關閉，結果直接丟棄
        let _ = self.tx.send(CacheMessage::RowFetched {
            row_id: self.row_id.clone(),
            result,
        });
    }
}

impl Drop for PendingFetch {
    fn drop(&mut self) {
        if !self.completed {
            tracing::warn!("拉取行 {} 的任務在完成前被丟棄", self.row_id);
            self.send(Err(GridError::Transport(format!(
                "拉取行 {} 已中止",
                self.row_id
            ))));
        }
    }
}
