//! # Grid Cache
//!
//! 有序行儲存、變更通知與儲存格快取

pub mod cell_cache;
pub mod materializer;
pub mod notifier;
pub mod row_store;

// Re-export 主要類型
pub use cell_cache::{CellCache, CellCacheKey};
pub use materializer::CellMaterializer;
pub use notifier::{ChangeCallback, ChangeNotifier, ListenerHandle};
pub use row_store::OrderedRowStore;
