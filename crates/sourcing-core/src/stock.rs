//! 庫存分配快照（商品 → 存放倉庫）

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// 庫存分配
///
/// 唯讀快照：記錄每個商品實際存放於哪些倉庫。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAllocation {
    allocation: BTreeMap<String, BTreeSet<String>>,
}

impl StockAllocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由（商品, 倉庫）配對建立
    pub fn from_pairs<P, W>(pairs: impl IntoIterator<Item = (P, W)>) -> Self
    where
        P: Into<String>,
        W: Into<String>,
    {
        let mut stock = Self::new();
        for (product_id, warehouse) in pairs {
            stock.allocate(product_id, warehouse);
        }
        stock
    }

    /// 登記商品存放於倉庫
    pub fn allocate(&mut self, product_id: impl Into<String>, warehouse: impl Into<String>) {
        self.allocation
            .entry(product_id.into())
            .or_default()
            .insert(warehouse.into());
    }

    /// 存放該商品的倉庫
    pub fn warehouses_for(&self, product_id: &str) -> Option<&BTreeSet<String>> {
        self.allocation.get(product_id)
    }

    /// 指定倉庫存放的所有商品
    pub fn products_at(&self, warehouse: &str) -> BTreeSet<String> {
        self.allocation
            .iter()
            .filter(|(_, warehouses)| warehouses.contains(warehouse))
            .map(|(product_id, _)| product_id.clone())
            .collect()
    }

    /// 商品數量
    pub fn product_count(&self) -> usize {
        self.allocation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocation.is_empty()
    }
}
