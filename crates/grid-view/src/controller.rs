//! 行快取控制器

use grid_cache::{
    CellCache, CellCacheKey, CellMaterializer, ChangeNotifier, ListenerHandle, OrderedRowStore,
};
use grid_core::{
    ChangeReason, FieldEvent, FieldInfo, GridCellMap, GridError, InsertedRow, Result,
    RowCacheConfig, RowRecord, RowsChangeset, RowsVisibilityChangeset, UpdatedIndex,
    UpdatedIndexMap, UpdatedRow,
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::fetcher::{CacheMessage, PendingFetch, RowFetcher};
use crate::field_notifier::{FieldNotifier, FieldSubscription};
use crate::listener::{RowListener, RowListenerId};
use crate::ChangesetSummary;

/// 可跨任務傳遞的行快取句柄
///
/// 傳輸層透過句柄把變更集送入行快取的訊息佇列，
/// 由持有行快取的執行環境依序處理。
#[derive(Debug, Clone)]
pub struct RowCacheHandle {
    tx: mpsc::UnboundedSender<CacheMessage>,
}

impl RowCacheHandle {
    /// 送出行變更集
    pub fn send_rows_changed(&self, changeset: RowsChangeset) -> Result<()> {
        self.tx
            .send(CacheMessage::RowsChanged(changeset))
            .map_err(|_| GridError::Disposed)
    }

    /// 送出行可見性變更集
    pub fn send_visibility_changed(&self, changeset: RowsVisibilityChangeset) -> Result<()> {
        self.tx
            .send(CacheMessage::VisibilityChanged(changeset))
            .map_err(|_| GridError::Disposed)
    }

    /// 行快取是否已釋放
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

enum Inbound {
    Field(FieldEvent),
    Message(CacheMessage),
}

/// 行快取控制器
///
/// 把遠端變更集轉為有序行儲存的變更，並為每個邏輯變更發出一次通知。
/// 所有變更都在同一個執行環境中以 `&mut self` 依序進行；
/// 監聽回呼只拿到共享參考，無法在通知期間反過來修改行快取。
pub struct RowCache<F: RowFetcher> {
    config: RowCacheConfig,
    store: OrderedRowStore,
    materializer: CellMaterializer,
    cell_cache: CellCache,
    notifier: ChangeNotifier,
    row_listeners: Vec<(RowListenerId, RowListener)>,
    next_listener_id: u64,
    fetcher: Arc<F>,
    inflight: HashSet<String>,
    mailbox_tx: mpsc::UnboundedSender<CacheMessage>,
    mailbox_rx: mpsc::UnboundedReceiver<CacheMessage>,
    field_subscription: Option<FieldSubscription>,
    disposed: bool,
}

impl<F: RowFetcher> RowCache<F> {
    /// 創建行快取並訂閱欄位結構變更
    pub fn new(config: RowCacheConfig, fetcher: Arc<F>, fields: &mut FieldNotifier) -> Result<Self> {
        config.validate()?;

        tracing::info!(
            "建立行快取：視圖 {}，欄位 {} 個",
            config.view_id,
            fields.field_count()
        );

        let (mailbox_tx, mailbox_rx) = mpsc::unbounded_channel();
        let materializer = CellMaterializer::new(config.view_id.clone(), fields.snapshot());
        let cell_cache = CellCache::with_capacity(config.cell_cache_capacity);

        Ok(Self {
            config,
            store: OrderedRowStore::new(),
            materializer,
            cell_cache,
            notifier: ChangeNotifier::new(),
            row_listeners: Vec::new(),
            next_listener_id: 1,
            fetcher,
            inflight: HashSet::new(),
            mailbox_tx,
            mailbox_rx,
            field_subscription: Some(fields.subscribe()),
            disposed: false,
        })
    }

    /// 初始載入：整體替換行並發出 `Initial`
    pub fn initialize_rows(&mut self, rows: Vec<RowRecord>) {
        if self.is_disposed_for("initialize_rows") {
            return;
        }

        tracing::info!("初始載入 {} 行", rows.len());
        self.store.replace_all(rows);
        self.cell_cache.clear();
        self.emit(ChangeReason::Initial);
    }

    /// 套用行變更集
    ///
    /// 依序執行：刪除 → 插入 → 更新。插入與更新的索引是相對於刪除之後的序列，
    /// 所以順序不可調換。
    pub fn apply_rows_changed(&mut self, changeset: RowsChangeset) -> ChangesetSummary {
        if self.is_disposed_for("apply_rows_changed") {
            return ChangesetSummary::default();
        }

        tracing::debug!(
            "套用行變更：刪除 {} 筆，插入 {} 筆，更新 {} 筆",
            changeset.deleted_rows.len(),
            changeset.inserted_rows.len(),
            changeset.updated_rows.len()
        );

        let RowsChangeset {
            deleted_rows,
            inserted_rows,
            updated_rows,
        } = changeset;

        let deleted = self.delete_rows(deleted_rows);
        let inserted = self.insert_rows(inserted_rows);
        let updated = self.update_rows(updated_rows);

        ChangesetSummary {
            deleted,
            inserted,
            updated,
        }
    }

    /// 套用行可見性變更集（隱藏即刪除，顯示即插入）
    pub fn apply_rows_visibility(&mut self, changeset: RowsVisibilityChangeset) -> ChangesetSummary {
        if self.is_disposed_for("apply_rows_visibility") {
            return ChangesetSummary::default();
        }

        tracing::debug!(
            "套用可見性變更：隱藏 {} 筆，顯示 {} 筆",
            changeset.invisible_rows.len(),
            changeset.visible_rows.len()
        );

        let RowsVisibilityChangeset {
            invisible_rows,
            visible_rows,
        } = changeset;

        let deleted = self.delete_rows(invisible_rows);
        let inserted = self.insert_rows(visible_rows);

        ChangesetSummary {
            deleted,
            inserted,
            updated: 0,
        }
    }

    /// 移動單行，返回實際的新索引
    pub fn move_row(&mut self, row_id: &str, to_index: usize) -> Option<usize> {
        if self.is_disposed_for("move_row") {
            return None;
        }

        let (from, to) = self.store.move_row(row_id, to_index)?;
        if from != to {
            self.emit(ChangeReason::Moved {
                row_id: row_id.to_string(),
                from,
                to,
            });
        }
        Some(to)
    }

    /// 獲取一行需要顯示的儲存格
    ///
    /// 行不在快取或尚未載入時，背景拉取該行並立即返回（可能為空的）映射；
    /// 拉取完成後會發出 `Updated`，呼叫者應在那之後重新讀取。
    pub fn load_grid_cells(&mut self, row_id: &str) -> GridCellMap {
        let row = self.store.get(row_id);
        let resident = row.map(RowRecord::is_loaded).unwrap_or(false);
        let cells = self.materializer.make_cells(row);

        if !resident {
            self.request_row(row_id);
        }

        cells
    }

    /// 註冊行變更回呼（每次變更呼叫一次）
    ///
    /// 已釋放時不註冊，返回 `None`
    pub fn on_rows_changed<C>(&mut self, callback: C) -> Option<ListenerHandle>
    where
        C: FnMut(&ChangeReason) + Send + 'static,
    {
        if self.is_disposed_for("on_rows_changed") {
            return None;
        }
        Some(self.notifier.subscribe(callback))
    }

    /// 移除行變更回呼
    pub fn remove_rows_changed_listener(&mut self, handle: ListenerHandle) -> bool {
        self.notifier.unsubscribe(handle)
    }

    /// 註冊行監聽器
    ///
    /// 已釋放時不註冊，返回 `None`
    pub fn add_listener(&mut self, listener: RowListener) -> Option<RowListenerId> {
        if self.is_disposed_for("add_listener") {
            return None;
        }

        let id = RowListenerId(self.next_listener_id);
        self.next_listener_id += 1;

        tracing::trace!("註冊行監聽器 {:?}：行 {}", id, listener.row_id());
        self.row_listeners.push((id, listener));
        Some(id)
    }

    /// 移除行監聽器
    pub fn remove_row_listener(&mut self, id: RowListenerId) -> bool {
        let before = self.row_listeners.len();
        self.row_listeners.retain(|(listener_id, _)| *listener_id != id);
        before != self.row_listeners.len()
    }

    /// 不等待地處理所有已到達的欄位事件與訊息，返回處理數量
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;

        while !self.disposed {
            let Some(event) = self
                .field_subscription
                .as_mut()
                .and_then(FieldSubscription::try_recv)
            else {
                break;
            };
            self.handle_field_event(event);
            processed += 1;
        }

        while !self.disposed {
            let Ok(message) = self.mailbox_rx.try_recv() else {
                break;
            };
            self.handle_message(message);
            processed += 1;
        }

        processed
    }

    /// 等待並處理下一個欄位事件或訊息
    ///
    /// 已釋放時返回 `false`
    pub async fn process_next(&mut self) -> bool {
        if self.disposed {
            return false;
        }

        let inbound = match self.field_subscription.as_mut() {
            Some(subscription) => tokio::select! {
                Some(event) = subscription.recv() => Inbound::Field(event),
                Some(message) = self.mailbox_rx.recv() => Inbound::Message(message),
                else => return false,
            },
            None => match self.mailbox_rx.recv().await {
                Some(message) => Inbound::Message(message),
                None => return false,
            },
        };

        match inbound {
            Inbound::Field(event) => self.handle_field_event(event),
            Inbound::Message(message) => self.handle_message(message),
        }
        true
    }

    /// 釋放行快取
    ///
    /// 依序釋放欄位訂閱、所有監聽、儲存格快取，並關閉訊息佇列。重複呼叫無作用。
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        self.field_subscription = None;
        self.notifier.clear();
        self.row_listeners.clear();
        self.cell_cache.dispose();
        self.mailbox_rx.close();
        self.inflight.clear();

        tracing::info!("行快取 {} 已釋放", self.config.view_id);
    }

    /// 可跨任務傳遞的句柄
    pub fn handle(&self) -> RowCacheHandle {
        RowCacheHandle {
            tx: self.mailbox_tx.clone(),
        }
    }

    /// 當前顯示順序的唯讀視圖
    pub fn visible_rows(&self) -> &[RowRecord] {
        self.store.rows()
    }

    pub fn row_ids(&self) -> Vec<&str> {
        self.store.row_ids()
    }

    pub fn row_count(&self) -> usize {
        self.store.len()
    }

    pub fn get_row(&self, row_id: &str) -> Option<&RowRecord> {
        self.store.get(row_id)
    }

    pub fn index_of(&self, row_id: &str) -> Option<usize> {
        self.store.index_of(row_id)
    }

    /// 最近一次的變更原因
    pub fn current_reason(&self) -> &ChangeReason {
        self.notifier.current()
    }

    /// 當前欄位快照
    pub fn fields(&self) -> &Arc<[FieldInfo]> {
        self.materializer.fields()
    }

    pub fn cell_cache(&self) -> &CellCache {
        &self.cell_cache
    }

    pub fn cell_cache_mut(&mut self) -> &mut CellCache {
        &mut self.cell_cache
    }

    pub fn config(&self) -> &RowCacheConfig {
        &self.config
    }

    /// 進行中的拉取數量
    pub fn pending_fetch_count(&self) -> usize {
        self.inflight.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn delete_rows(&mut self, row_ids: Vec<String>) -> usize {
        let mut deleted = 0;

        for row_id in row_ids {
            let Some(deleted_row) = self.store.remove(&row_id) else {
                tracing::debug!("刪除的行 {} 不在快取中，略過", row_id);
                continue;
            };

            if self.config.purge_cells_on_delete {
                self.cell_cache.remove_row(&row_id);
            }
            deleted += 1;
            self.emit(ChangeReason::Deleted(deleted_row));
        }

        deleted
    }

    fn insert_rows(&mut self, rows: Vec<InsertedRow>) -> usize {
        let mut inserted = 0;

        for InsertedRow { index, row } in rows {
            let row_id = row.id.clone();
            let Some(index) = self.store.insert(index, row) else {
                continue;
            };

            inserted += 1;
            self.emit(ChangeReason::Inserted { index, row_id });
        }

        inserted
    }

    fn update_rows(&mut self, rows: Vec<UpdatedRow>) -> usize {
        if rows.is_empty() {
            return 0;
        }

        for updated in &rows {
            for field_id in &updated.field_ids {
                let key = CellCacheKey::new(field_id.as_str(), updated.row.id.as_str());
                self.cell_cache.remove(&key);
            }
        }

        let updated = self.store.update_rows(rows, |updated| updated.row);
        let count = updated.len();
        if !updated.is_empty() {
            self.emit(ChangeReason::Updated(updated));
        }

        count
    }

    fn request_row(&mut self, row_id: &str) {
        if self.disposed || !self.config.fetch_missing_rows {
            return;
        }

        if self.config.dedupe_inflight_fetches && self.inflight.contains(row_id) {
            tracing::trace!("行 {} 已在拉取中", row_id);
            return;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!("沒有可用的 tokio 執行環境，略過拉取行 {}", row_id);
                return;
            }
        };

        tracing::debug!("行 {} 不在快取中，開始拉取", row_id);
        self.inflight.insert(row_id.to_string());

        let fetcher = Arc::clone(&self.fetcher);
        let view_id = self.config.view_id.clone();
        let pending = PendingFetch::new(row_id, self.mailbox_tx.clone());

        runtime.spawn(async move {
            let result = fetcher.fetch_row(&view_id, pending.row_id()).await;
            pending.complete(result);
        });
    }

    fn handle_message(&mut self, message: CacheMessage) {
        match message {
            CacheMessage::RowsChanged(changeset) => {
                self.apply_rows_changed(changeset);
            }
            CacheMessage::VisibilityChanged(changeset) => {
                self.apply_rows_visibility(changeset);
            }
            CacheMessage::RowFetched { row_id, result } => {
                self.inflight.remove(&row_id);
                match result {
                    Ok(row) if row.id == row_id => self.refresh_row(row),
                    Ok(row) => {
                        tracing::warn!("拉取行 {} 卻收到行 {}，捨棄", row_id, row.id);
                    }
                    Err(err) => {
                        tracing::error!("拉取行 {} 失敗: {}", row_id, err);
                    }
                }
            }
        }
    }

    /// 以拉取結果原地替換行
    ///
    /// 行在拉取期間被刪除時直接捨棄結果
    fn refresh_row(&mut self, row: RowRecord) {
        let Some(index) = self.store.index_of(&row.id) else {
            tracing::debug!("行 {} 已不在快取中，捨棄拉取結果", row.id);
            return;
        };

        let row_id = row.id.clone();
        self.store.remove(&row_id);
        let index = self.store.insert(index, row).unwrap_or(index);
        self.cell_cache.remove_row(&row_id);

        let mut updated = UpdatedIndexMap::new();
        updated.insert(UpdatedIndex::new(index, row_id));
        self.emit(ChangeReason::Updated(updated));
    }

    fn handle_field_event(&mut self, event: FieldEvent) {
        match event {
            FieldEvent::FieldsChanged(fields) => {
                let removed = self.materializer.set_fields(fields);
                for field_id in &removed {
                    self.cell_cache.remove_field(field_id);
                }

                tracing::debug!("欄位結構變更，移除欄位 {:?}", removed);
                self.emit(ChangeReason::FieldSetChanged);
            }
            FieldEvent::FieldChanged(field_id) => {
                let purged = self.cell_cache.remove_field(&field_id);
                tracing::debug!("欄位 {} 變更，清除 {} 個儲存格快取", field_id, purged);
            }
        }
    }

    /// 發出變更：先通知行變更回呼，再評估行監聽器
    fn emit(&mut self, reason: ChangeReason) {
        if self.disposed {
            return;
        }

        tracing::debug!("視圖 {} 行變更: {}", self.config.view_id, reason.label());
        self.notifier.notify(reason);

        let reason = self.notifier.current();
        for (_, listener) in self.row_listeners.iter_mut() {
            if !listener.should_fire(reason) {
                continue;
            }
            let cells = self.materializer.make_cells(self.store.get(listener.row_id()));
            listener.fire(&cells, reason);
        }
    }

    fn is_disposed_for(&self, operation: &str) -> bool {
        if self.disposed {
            tracing::debug!("行快取已釋放，忽略 {}", operation);
        }
        self.disposed
    }
}

impl<F: RowFetcher> Drop for RowCache<F> {
    fn drop(&mut self) {
        self.dispose();
    }
}
