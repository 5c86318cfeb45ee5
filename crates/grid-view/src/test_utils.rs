//! 測試輔助

use grid_core::{ChangeReason, FieldInfo, FieldType, GridError, Result, RowRecord};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::controller::RowCache;
use crate::fetcher::RowFetcher;
use crate::field_notifier::FieldNotifier;

/// 記憶體中的行來源，記錄被呼叫的次數
#[derive(Debug, Default)]
pub struct MockRowFetcher {
    rows: Mutex<HashMap<String, RowRecord>>,
    calls: AtomicUsize,
}

impl MockRowFetcher {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_rows(rows: Vec<RowRecord>) -> Arc<Self> {
        let fetcher = Self::default();
        {
            let mut map = fetcher.rows.lock().unwrap();
            for row in rows {
                map.insert(row.id.clone(), row);
            }
        }
        Arc::new(fetcher)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RowFetcher for MockRowFetcher {
    fn fetch_row(
        &self,
        _view_id: &str,
        row_id: &str,
    ) -> impl Future<Output = Result<RowRecord>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = self
            .rows
            .lock()
            .unwrap()
            .get(row_id)
            .cloned()
            .ok_or_else(|| GridError::RowNotFound(row_id.to_string()));
        async move { result }
    }
}

/// 兩個欄位：可見的 name 與隱藏的 status
pub fn field_notifier() -> FieldNotifier {
    FieldNotifier::new(vec![
        FieldInfo::new("name", "Name", FieldType::RichText),
        FieldInfo::new("status", "Status", FieldType::SingleSelect).with_visibility(false),
    ])
}

/// 記錄所有行變更原因
pub fn record_reasons<F: RowFetcher>(cache: &mut RowCache<F>) -> Arc<Mutex<Vec<ChangeReason>>> {
    let reasons = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reasons);
    cache.on_rows_changed(move |reason: &ChangeReason| sink.lock().unwrap().push(reason.clone()));
    reasons
}
