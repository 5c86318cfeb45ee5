//! 儲存格產生器

use grid_core::{FieldInfo, GridCell, GridCellMap, RowRecord};
use std::collections::HashSet;
use std::sync::Arc;

/// 儲存格產生器
///
/// 依當前欄位快照為一行產生需要顯示的儲存格。欄位快照只讀，
/// 欄位結構變更時整體替換。
#[derive(Debug, Clone)]
pub struct CellMaterializer {
    view_id: String,
    fields: Arc<[FieldInfo]>,
}

impl CellMaterializer {
    pub fn new(view_id: impl Into<String>, fields: Arc<[FieldInfo]>) -> Self {
        Self {
            view_id: view_id.into(),
            fields,
        }
    }

    pub fn view_id(&self) -> &str {
        &self.view_id
    }

    /// 當前欄位快照
    pub fn fields(&self) -> &Arc<[FieldInfo]> {
        &self.fields
    }

    /// 可見欄位（保持順序）
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldInfo> {
        self.fields.iter().filter(|field| field.visibility)
    }

    /// 替換欄位快照，返回已不存在的欄位ID
    pub fn set_fields(&mut self, fields: Arc<[FieldInfo]>) -> Vec<String> {
        let remaining: HashSet<&str> = fields.iter().map(|field| field.id.as_str()).collect();
        let removed = self
            .fields
            .iter()
            .filter(|field| !remaining.contains(field.id.as_str()))
            .map(|field| field.id.clone())
            .collect();

        self.fields = fields;
        removed
    }

    /// 為一行產生儲存格
    ///
    /// 行不存在或尚未載入時返回空映射
    pub fn make_cells(&self, row: Option<&RowRecord>) -> GridCellMap {
        let mut cells = GridCellMap::new();

        let Some(row) = row.filter(|row| row.is_loaded()) else {
            return cells;
        };

        for field in self.visible_fields() {
            cells.insert(GridCell {
                view_id: self.view_id.clone(),
                row_id: row.id.clone(),
                field: field.clone(),
                data: row.cell_data(&field.id).map(str::to_string),
            });
        }

        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_core::FieldType;

    fn fields() -> Arc<[FieldInfo]> {
        vec![
            FieldInfo::new("name", "Name", FieldType::RichText),
            FieldInfo::new("secret", "Secret", FieldType::RichText).with_visibility(false),
            FieldInfo::new("done", "Done", FieldType::Checkbox),
        ]
        .into()
    }

    #[test]
    fn test_make_cells_visible_only() {
        let materializer = CellMaterializer::new("view", fields());
        let row = RowRecord::new("r1")
            .with_cell("name", "Alice")
            .with_cell("secret", "xyz");

        let cells = materializer.make_cells(Some(&row));

        assert_eq!(cells.field_ids(), vec!["name", "done"]);
        assert_eq!(cells.get("name").unwrap().data.as_deref(), Some("Alice"));
        assert_eq!(cells.get("done").unwrap().data, None);
        assert_eq!(cells.get("name").unwrap().row_id, "r1");
    }

    #[test]
    fn test_make_cells_absent_or_placeholder() {
        let materializer = CellMaterializer::new("view", fields());

        assert!(materializer.make_cells(None).is_empty());
        assert!(materializer
            .make_cells(Some(&RowRecord::placeholder("r1")))
            .is_empty());
    }

    #[test]
    fn test_set_fields_reports_removed() {
        let mut materializer = CellMaterializer::new("view", fields());

        let removed = materializer.set_fields(
            vec![FieldInfo::new("name", "Name", FieldType::RichText)].into(),
        );

        assert_eq!(removed, vec!["secret".to_string(), "done".to_string()]);
        assert_eq!(materializer.fields().len(), 1);
    }
}
