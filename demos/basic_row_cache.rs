//! # 行快取基本範例
//!
//! 展示行快取的完整流程：
//! - 初始載入（含尚未載入資料的佔位行）
//! - 套用遠端變更集
//! - 行監聽器與背景拉取

use grid::*;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// 範例用的遠端行來源
struct InMemoryRows {
    rows: HashMap<String, RowRecord>,
}

impl RowFetcher for InMemoryRows {
    fn fetch_row(
        &self,
        _view_id: &str,
        row_id: &str,
    ) -> impl Future<Output = Result<RowRecord>> + Send {
        let result = self
            .rows
            .get(row_id)
            .cloned()
            .ok_or_else(|| GridError::RowNotFound(row_id.to_string()));
        async move { result }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("===== 行快取範例 =====\n");

    // 步驟 1: 欄位與遠端來源
    let mut fields = FieldNotifier::new(vec![
        FieldInfo::new("name", "Name", FieldType::RichText),
        FieldInfo::new("amount", "Amount", FieldType::Number),
    ]);

    let remote = InMemoryRows {
        rows: HashMap::from([(
            "row-3".to_string(),
            RowRecord::new("row-3")
                .with_cell("name", "Carol")
                .with_cell("amount", "300"),
        )]),
    };

    // 步驟 2: 建立行快取並初始載入
    let config = RowCacheConfig::from_json(r#"{ "view_id": "demo-grid" }"#)?;
    let mut cache = RowCache::new(config, Arc::new(remote), &mut fields)?;

    cache.on_rows_changed(|reason: &ChangeReason| {
        println!("[rows changed] {}", reason.label());
    });
    cache.add_listener(RowListener::new(
        "row-3",
        |cells: &GridCellMap, reason: &ChangeReason| {
            let name = cells.get("name").and_then(|cell| cell.data.as_deref());
            println!("[row-3] {} -> name = {:?}", reason.label(), name);
        },
    ));

    cache.initialize_rows(vec![
        RowRecord::new("row-1").with_cell("name", "Alice"),
        RowRecord::new("row-2").with_cell("name", "Bob"),
        RowRecord::placeholder("row-3"),
    ]);
    println!("初始行: {:?}\n", cache.row_ids());

    // 步驟 3: 套用遠端變更集
    let changeset = RowsChangeset::from_json(
        r#"{
            "deleted_rows": ["row-1"],
            "inserted_rows": [{ "index": 0, "row": { "id": "row-0", "cells": { "name": "Zed" } } }],
            "updated_rows": [{ "row": { "id": "row-2", "cells": { "name": "Bobby" } }, "field_ids": ["name"] }]
        }"#,
    )?;
    let summary = cache.apply_rows_changed(changeset);
    println!("變更統計: {:?}", summary);
    println!("目前行: {:?}\n", cache.row_ids());

    // 步驟 4: 讀取佔位行，背景拉取後重新讀取
    let cells = cache.load_grid_cells("row-3");
    println!("row-3 載入前儲存格數: {}", cells.len());

    cache.process_next().await;

    let cells = cache.load_grid_cells("row-3");
    for cell in &cells {
        println!("  {} = {:?}", cell.field.name, cell.data);
    }

    cache.dispose();
    println!("\n===== 完成 =====");
    Ok(())
}
