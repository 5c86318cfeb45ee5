//! 行監聽器

use grid_core::{ChangeReason, GridCellMap};

/// 儲存格更新回呼（最新的儲存格 + 觸發原因）
pub type CellUpdatedCallback = Box<dyn FnMut(&GridCellMap, &ChangeReason) + Send>;

/// 監聽條件
pub type ListenWhen = Box<dyn Fn(&ChangeReason) -> bool + Send>;

/// 行監聽器ID，用於移除監聽
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowListenerId(pub(crate) u64);

/// 針對單一行的監聽器
///
/// 只在「更新包含此行」或「欄位結構變更」時觸發，
/// 並且（若有設置）`listen_when` 必須通過。
pub struct RowListener {
    row_id: String,
    on_cell_updated: CellUpdatedCallback,
    listen_when: Option<ListenWhen>,
}

impl RowListener {
    /// 創建新的行監聽器
    pub fn new<C>(row_id: impl Into<String>, on_cell_updated: C) -> Self
    where
        C: FnMut(&GridCellMap, &ChangeReason) + Send + 'static,
    {
        Self {
            row_id: row_id.into(),
            on_cell_updated: Box::new(on_cell_updated),
            listen_when: None,
        }
    }

    /// 建構器模式：設置監聽條件
    pub fn with_listen_when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&ChangeReason) -> bool + Send + 'static,
    {
        self.listen_when = Some(Box::new(predicate));
        self
    }

    pub fn row_id(&self) -> &str {
        &self.row_id
    }

    /// 此變更是否應觸發監聽器
    pub fn should_fire(&self, reason: &ChangeReason) -> bool {
        if let Some(listen_when) = &self.listen_when {
            if !listen_when(reason) {
                return false;
            }
        }

        match reason {
            ChangeReason::Updated(_) => reason.is_update_for(&self.row_id),
            ChangeReason::FieldSetChanged => true,
            ChangeReason::Initial
            | ChangeReason::Inserted { .. }
            | ChangeReason::Deleted(_)
            | ChangeReason::Moved { .. } => false,
        }
    }

    pub(crate) fn fire(&mut self, cells: &GridCellMap, reason: &ChangeReason) {
        (self.on_cell_updated)(cells, reason);
    }
}

impl std::fmt::Debug for RowListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowListener")
            .field("row_id", &self.row_id)
            .field("listen_when", &self.listen_when.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_core::{DeletedRow, RowRecord, UpdatedIndex, UpdatedIndexMap};
    use rstest::rstest;

    fn updated(ids: &[&str]) -> ChangeReason {
        ChangeReason::Updated(
            ids.iter()
                .enumerate()
                .map(|(index, id)| UpdatedIndex::new(index, *id))
                .collect(),
        )
    }

    #[rstest]
    #[case(updated(&["r"]), true)]
    #[case(updated(&["a", "r"]), true)]
    #[case(updated(&["a", "b"]), false)]
    #[case(ChangeReason::Updated(UpdatedIndexMap::new()), false)]
    #[case(ChangeReason::FieldSetChanged, true)]
    #[case(ChangeReason::Initial, false)]
    #[case(ChangeReason::Inserted { index: 0, row_id: "r".to_string() }, false)]
    #[case(ChangeReason::Deleted(DeletedRow { index: 0, row: RowRecord::new("r") }), false)]
    #[case(ChangeReason::Moved { row_id: "r".to_string(), from: 0, to: 1 }, false)]
    fn test_should_fire(#[case] reason: ChangeReason, #[case] expected: bool) {
        let listener = RowListener::new("r", |_cells: &GridCellMap, _reason: &ChangeReason| {});
        assert_eq!(listener.should_fire(&reason), expected);
    }

    #[test]
    fn test_listen_when_filters() {
        let listener = RowListener::new("r", |_cells: &GridCellMap, _reason: &ChangeReason| {})
            .with_listen_when(|reason| !matches!(reason, ChangeReason::FieldSetChanged));

        assert!(!listener.should_fire(&ChangeReason::FieldSetChanged));
        assert!(listener.should_fire(&updated(&["r"])));
    }
}
