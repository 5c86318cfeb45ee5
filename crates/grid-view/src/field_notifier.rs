//! 欄位結構通知器

use grid_core::{FieldEvent, FieldInfo, GridError, Result};
use std::sync::Arc;
use tokio::sync::mpsc;

/// 欄位訂閱
///
/// 丟棄訂閱即取消；通知器會在下一次廣播時清除已關閉的訂閱
#[derive(Debug)]
pub struct FieldSubscription {
    rx: mpsc::UnboundedReceiver<FieldEvent>,
}

impl FieldSubscription {
    /// 等待下一個欄位事件，通知器被丟棄後返回 `None`
    pub async fn recv(&mut self) -> Option<FieldEvent> {
        self.rx.recv().await
    }

    /// 不等待地取出一個已到達的事件
    pub fn try_recv(&mut self) -> Option<FieldEvent> {
        self.rx.try_recv().ok()
    }
}

/// 欄位結構通知器
///
/// 保存有序欄位列表，並在欄位變更時廣播給所有訂閱者
#[derive(Debug, Default)]
pub struct FieldNotifier {
    fields: Vec<FieldInfo>,
    subscribers: Vec<mpsc::UnboundedSender<FieldEvent>>,
}

impl FieldNotifier {
    pub fn new(fields: Vec<FieldInfo>) -> Self {
        Self {
            fields,
            subscribers: Vec::new(),
        }
    }

    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// 當前欄位的唯讀快照
    pub fn snapshot(&self) -> Arc<[FieldInfo]> {
        self.fields.clone().into()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, field_id: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.id == field_id)
    }

    /// 訂閱欄位事件
    pub fn subscribe(&mut self) -> FieldSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        FieldSubscription { rx }
    }

    /// 仍有效的訂閱數
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.iter().filter(|tx| !tx.is_closed()).count()
    }

    /// 整體替換欄位列表
    pub fn set_fields(&mut self, fields: Vec<FieldInfo>) {
        self.fields = fields;
        self.broadcast_fields();
    }

    /// 新增欄位（`index` 為 `None` 時追加到末尾）
    pub fn insert_field(&mut self, index: Option<usize>, field: FieldInfo) -> Result<()> {
        if self.field(&field.id).is_some() {
            return Err(GridError::DuplicateField(field.id));
        }

        let index = index.unwrap_or(self.fields.len()).min(self.fields.len());
        tracing::debug!("新增欄位 {} 於索引 {}", field.id, index);
        self.fields.insert(index, field);
        self.broadcast_fields();
        Ok(())
    }

    /// 更新欄位內容
    ///
    /// 先發出單一欄位變更，再發出整體欄位變更
    pub fn update_field(&mut self, field: FieldInfo) -> Result<()> {
        let existing = self
            .fields
            .iter_mut()
            .find(|f| f.id == field.id)
            .ok_or_else(|| GridError::FieldNotFound(field.id.clone()))?;

        let field_id = field.id.clone();
        *existing = field;

        tracing::debug!("更新欄位 {}", field_id);
        self.broadcast(FieldEvent::FieldChanged(field_id));
        self.broadcast_fields();
        Ok(())
    }

    /// 刪除欄位，返回被刪除的欄位
    pub fn delete_field(&mut self, field_id: &str) -> Result<FieldInfo> {
        let index = self
            .fields
            .iter()
            .position(|f| f.id == field_id)
            .ok_or_else(|| GridError::FieldNotFound(field_id.to_string()))?;

        let removed = self.fields.remove(index);
        tracing::debug!("刪除欄位 {}", field_id);
        self.broadcast_fields();
        Ok(removed)
    }

    fn broadcast_fields(&mut self) {
        let snapshot = self.snapshot();
        self.broadcast(FieldEvent::FieldsChanged(snapshot));
    }

    fn broadcast(&mut self, event: FieldEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
