//! # Sourcing Core
//!
//! 核心資料模型與類型定義

pub mod config;
pub mod order;
pub mod sourcing;
pub mod stock;
pub mod warehouse;

// Re-export 主要類型
pub use config::{PackLineConfig, SearchMode, SourcingConfig, WarehouseConfig, DEFAULT_MAX_WAREHOUSES, HARD_MAX_WAREHOUSES};
pub use order::ShopOrder;
pub use sourcing::{LostSalesRecord, SourcingOption, WarehouseOrderLine};
pub use stock::StockAllocation;
pub use warehouse::{PackLine, PackLineKey, PackLineKind, Warehouse, WarehouseCatalog};

/// 訂單分配錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum SourcingError {
    #[error("倉庫 {warehouse} 的庫存分配超出容量（庫存品項: {stocked}, 容量限制: {capacity}），請在容量內分配庫存")]
    StockCapacityExceeded {
        warehouse: String,
        stocked: usize,
        capacity: usize,
    },

    #[error("倉庫數量 {count} 超過排列搜尋上限 {max}")]
    TooManyWarehouses { count: usize, max: usize },

    #[error("重複的倉庫名稱: {0}")]
    DuplicateWarehouse(String),

    #[error("倉庫 {warehouse} 有重複的包裝線: {pack_line}")]
    DuplicatePackLine { warehouse: String, pack_line: String },

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("找不到包裝線: {0}")]
    UnknownPackLine(String),

    #[error("包裝線 {pack_line} 產能透支：可用 {available}, 扣減 {requested}")]
    CapacityOverdrawn {
        pack_line: String,
        available: u32,
        requested: u32,
    },
}

pub type Result<T> = std::result::Result<T, SourcingError>;
