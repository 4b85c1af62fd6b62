//! 訂單分配配置模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::warehouse::PackLineKind;
use crate::{Result, SourcingError};

/// 排列搜尋的預設倉庫上限（8! = 40320 種排列）
pub const DEFAULT_MAX_WAREHOUSES: usize = 8;

/// 倉庫數的硬上限（10! = 3628800 種排列），`max_warehouses` 設得再高也不會超過
pub const HARD_MAX_WAREHOUSES: usize = 10;

/// 排列評估模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// 單執行緒依序評估
    #[default]
    Sequential,
    /// 使用 rayon 並行評估（僅讀取產能帳本）
    Parallel,
}

/// 包裝線配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackLineConfig {
    /// 包裝線名稱
    pub name: String,

    /// 包裝線類型（mono / multi）
    #[serde(rename = "type")]
    pub kind: PackLineKind,

    /// 每日可處理件數
    pub capacity: u32,

    /// 每件包裝成本
    pub cost_per_product: Decimal,
}

impl PackLineConfig {
    /// 創建新的包裝線配置
    pub fn new(name: impl Into<String>, kind: PackLineKind, capacity: u32, cost_per_product: Decimal) -> Self {
        Self {
            name: name.into(),
            kind,
            capacity,
            cost_per_product,
        }
    }

    pub fn mono(name: impl Into<String>, capacity: u32, cost_per_product: Decimal) -> Self {
        Self::new(name, PackLineKind::Mono, capacity, cost_per_product)
    }

    pub fn multi(name: impl Into<String>, capacity: u32, cost_per_product: Decimal) -> Self {
        Self::new(name, PackLineKind::Multi, capacity, cost_per_product)
    }
}

/// 倉庫配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseConfig {
    /// 倉庫名稱
    pub name: String,

    /// 包裝線（宣告順序即為選線順序）
    #[serde(default)]
    pub pack_lines: Vec<PackLineConfig>,

    /// 每筆出貨成本
    pub cost_per_shipment: Decimal,

    /// 可存放的品項數上限
    pub stock_capacity: usize,
}

impl WarehouseConfig {
    /// 創建新的倉庫配置
    pub fn new(name: impl Into<String>, cost_per_shipment: Decimal, stock_capacity: usize) -> Self {
        Self {
            name: name.into(),
            pack_lines: Vec::new(),
            cost_per_shipment,
            stock_capacity,
        }
    }

    /// 建構器模式：添加包裝線
    pub fn with_pack_line(mut self, pack_line: PackLineConfig) -> Self {
        self.pack_lines.push(pack_line);
        self
    }
}

/// 訂單分配全域配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcingConfig {
    /// 倉庫網路
    pub warehouses: Vec<WarehouseConfig>,

    /// 缺貨懲罰（每件未能分配的商品）
    pub lost_sales_penalty: Decimal,

    /// 排列搜尋允許的最大倉庫數（實際上限不超過 [`HARD_MAX_WAREHOUSES`]）
    #[serde(default = "default_max_warehouses")]
    pub max_warehouses: usize,

    /// 排列評估模式
    #[serde(default)]
    pub search_mode: SearchMode,
}

fn default_max_warehouses() -> usize {
    DEFAULT_MAX_WAREHOUSES
}

impl SourcingConfig {
    /// 創建新的配置
    pub fn new(lost_sales_penalty: Decimal) -> Self {
        Self {
            warehouses: Vec::new(),
            lost_sales_penalty,
            max_warehouses: DEFAULT_MAX_WAREHOUSES,
            search_mode: SearchMode::Sequential,
        }
    }

    /// 參考倉庫網路：warehouseA / warehouseB，缺貨懲罰 10
    pub fn reference() -> Self {
        Self::new(Decimal::from(10))
            .with_warehouse(
                WarehouseConfig::new("warehouseA", Decimal::from(5), 600)
                    .with_pack_line(PackLineConfig::mono("monoManual", 100, Decimal::new(7, 1)))
                    .with_pack_line(PackLineConfig::multi("multiManual", 200, Decimal::new(9, 1))),
            )
            .with_warehouse(
                WarehouseConfig::new("warehouseB", Decimal::from(6), 600)
                    .with_pack_line(PackLineConfig::mono("monoManual", 300, Decimal::new(5, 1)))
                    .with_pack_line(PackLineConfig::multi("multiManual", 200, Decimal::new(7, 1))),
            )
    }

    /// 建構器模式：添加倉庫
    pub fn with_warehouse(mut self, warehouse: WarehouseConfig) -> Self {
        self.warehouses.push(warehouse);
        self
    }

    /// 建構器模式：設置排列搜尋上限
    pub fn with_max_warehouses(mut self, max_warehouses: usize) -> Self {
        self.max_warehouses = max_warehouses;
        self
    }

    /// 實際生效的倉庫上限
    pub fn effective_max_warehouses(&self) -> usize {
        self.max_warehouses.min(HARD_MAX_WAREHOUSES)
    }

    /// 建構器模式：設置評估模式
    pub fn with_search_mode(mut self, search_mode: SearchMode) -> Self {
        self.search_mode = search_mode;
        self
    }

    /// 從 JSON 字串載入並驗證
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SourcingError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 從 JSON 檔案載入並驗證
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SourcingError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    /// 驗證配置
    pub fn validate(&self) -> Result<()> {
        if self.warehouses.is_empty() {
            return Err(SourcingError::InvalidConfig("至少需要一個倉庫".to_string()));
        }

        let max = self.effective_max_warehouses();
        if self.warehouses.len() > max {
            return Err(SourcingError::TooManyWarehouses {
                count: self.warehouses.len(),
                max,
            });
        }

        if self.lost_sales_penalty < Decimal::ZERO {
            return Err(SourcingError::InvalidConfig(format!(
                "缺貨懲罰不可為負: {}",
                self.lost_sales_penalty
            )));
        }

        let mut names = HashSet::new();
        for warehouse in &self.warehouses {
            if !names.insert(warehouse.name.as_str()) {
                return Err(SourcingError::DuplicateWarehouse(warehouse.name.clone()));
            }

            if warehouse.cost_per_shipment < Decimal::ZERO {
                return Err(SourcingError::InvalidConfig(format!(
                    "倉庫 {} 的出貨成本不可為負",
                    warehouse.name
                )));
            }

            let mut line_names = HashSet::new();
            for pack_line in &warehouse.pack_lines {
                if !line_names.insert(pack_line.name.as_str()) {
                    return Err(SourcingError::DuplicatePackLine {
                        warehouse: warehouse.name.clone(),
                        pack_line: pack_line.name.clone(),
                    });
                }
                if pack_line.cost_per_product < Decimal::ZERO {
                    return Err(SourcingError::InvalidConfig(format!(
                        "包裝線 {}/{} 的單件成本不可為負",
                        warehouse.name, pack_line.name
                    )));
                }
            }
        }

        Ok(())
    }
}
