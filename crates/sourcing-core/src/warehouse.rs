//! 倉庫與包裝線模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::config::{SourcingConfig, WarehouseConfig};
use crate::stock::StockAllocation;
use crate::{Result, SourcingError};

/// 包裝線類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackLineKind {
    /// 單品包裝（每個商品一筆出貨行）
    Mono,
    /// 多品合併包裝
    Multi,
}

/// 包裝線識別鍵（倉庫, 包裝線）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PackLineKey {
    pub warehouse: String,
    pub pack_line: String,
}

impl PackLineKey {
    pub fn new(warehouse: impl Into<String>, pack_line: impl Into<String>) -> Self {
        Self {
            warehouse: warehouse.into(),
            pack_line: pack_line.into(),
        }
    }
}

impl fmt::Display for PackLineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.warehouse, self.pack_line)
    }
}

/// 包裝線（建立後不可變）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackLine {
    key: PackLineKey,
    kind: PackLineKind,
    capacity: u32,
    cost_per_product: Decimal,
}

impl PackLine {
    pub fn new(key: PackLineKey, kind: PackLineKind, capacity: u32, cost_per_product: Decimal) -> Self {
        Self {
            key,
            kind,
            capacity,
            cost_per_product,
        }
    }

    pub fn key(&self) -> &PackLineKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.key.pack_line
    }

    pub fn kind(&self) -> PackLineKind {
        self.kind
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn cost_per_product(&self) -> Decimal {
        self.cost_per_product
    }
}

/// 倉庫（庫存分配後於模擬期間不可變）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    name: String,
    pack_lines: Vec<PackLine>,
    cost_per_shipment: Decimal,
    stock_capacity: usize,
    products_on_stock: BTreeSet<String>,
}

impl Warehouse {
    /// 由配置與庫存分配建立倉庫
    ///
    /// 若實際存放品項數超過 `stock_capacity` 則回傳 [`SourcingError::StockCapacityExceeded`]。
    pub fn from_config(config: &WarehouseConfig, stock: &StockAllocation) -> Result<Self> {
        let products_on_stock = stock.products_at(&config.name);

        if products_on_stock.len() > config.stock_capacity {
            return Err(SourcingError::StockCapacityExceeded {
                warehouse: config.name.clone(),
                stocked: products_on_stock.len(),
                capacity: config.stock_capacity,
            });
        }

        let pack_lines = config
            .pack_lines
            .iter()
            .map(|pl| {
                PackLine::new(
                    PackLineKey::new(config.name.clone(), pl.name.clone()),
                    pl.kind,
                    pl.capacity,
                    pl.cost_per_product,
                )
            })
            .collect();

        Ok(Self {
            name: config.name.clone(),
            pack_lines,
            cost_per_shipment: config.cost_per_shipment,
            stock_capacity: config.stock_capacity,
            products_on_stock,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost_per_shipment(&self) -> Decimal {
        self.cost_per_shipment
    }

    pub fn stock_capacity(&self) -> usize {
        self.stock_capacity
    }

    pub fn products_on_stock(&self) -> &BTreeSet<String> {
        &self.products_on_stock
    }

    /// 所有包裝線（宣告順序）
    pub fn pack_lines(&self) -> &[PackLine] {
        &self.pack_lines
    }

    /// 指定類型的包裝線（保留宣告順序）
    pub fn pack_lines_of(&self, kind: PackLineKind) -> impl Iterator<Item = &PackLine> {
        self.pack_lines.iter().filter(move |pl| pl.kind == kind)
    }

    pub fn stocks(&self, product_id: &str) -> bool {
        self.products_on_stock.contains(product_id)
    }
}

/// 倉庫目錄
///
/// 倉庫依名稱字典序排列，排列搜尋的列舉順序因此固定，成本相同時的選擇可重現。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseCatalog {
    warehouses: Vec<Warehouse>,
}

impl WarehouseCatalog {
    /// 由已驗證的配置與庫存分配建立目錄
    pub fn build(config: &SourcingConfig, stock: &StockAllocation) -> Result<Self> {
        config.validate()?;

        let mut warehouses = config
            .warehouses
            .iter()
            .map(|wh| Warehouse::from_config(wh, stock))
            .collect::<Result<Vec<_>>>()?;
        warehouses.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self { warehouses })
    }

    pub fn warehouses(&self) -> &[Warehouse] {
        &self.warehouses
    }

    pub fn len(&self) -> usize {
        self.warehouses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warehouses.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Warehouse> {
        self.warehouses.iter().find(|wh| wh.name == name)
    }

    /// 所有包裝線
    pub fn pack_lines(&self) -> impl Iterator<Item = &PackLine> {
        self.warehouses.iter().flat_map(|wh| wh.pack_lines.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PackLineConfig;

    fn stock() -> StockAllocation {
        StockAllocation::from_pairs([
            ("P1", "warehouseA"),
            ("P2", "warehouseA"),
            ("P2", "warehouseB"),
            ("P3", "warehouseB"),
        ])
    }

    #[test]
    fn test_warehouse_from_config() {
        let config = WarehouseConfig::new("warehouseA", Decimal::from(5), 10)
            .with_pack_line(PackLineConfig::multi("multi", 5, Decimal::ONE))
            .with_pack_line(PackLineConfig::mono("mono", 5, Decimal::ONE))
            .with_pack_line(PackLineConfig::multi("multi2", 5, Decimal::ONE));

        let warehouse = Warehouse::from_config(&config, &stock()).unwrap();

        assert_eq!(warehouse.name(), "warehouseA");
        assert_eq!(warehouse.products_on_stock().len(), 2);
        assert!(warehouse.stocks("P1"));
        assert!(!warehouse.stocks("P3"));

        let multi: Vec<_> = warehouse.pack_lines_of(PackLineKind::Multi).map(|pl| pl.name()).collect();
        assert_eq!(multi, vec!["multi", "multi2"]);
        assert_eq!(
            warehouse.pack_lines()[1].key(),
            &PackLineKey::new("warehouseA", "mono")
        );
    }

    #[test]
    fn test_stock_capacity_exceeded() {
        let config = WarehouseConfig::new("warehouseA", Decimal::from(5), 1);

        match Warehouse::from_config(&config, &stock()) {
            Err(SourcingError::StockCapacityExceeded {
                warehouse,
                stocked,
                capacity,
            }) => {
                assert_eq!(warehouse, "warehouseA");
                assert_eq!(stocked, 2);
                assert_eq!(capacity, 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_catalog_sorted_by_name() {
        let config = SourcingConfig::new(Decimal::from(10))
            .with_warehouse(WarehouseConfig::new("warehouseB", Decimal::from(6), 10))
            .with_warehouse(WarehouseConfig::new("warehouseA", Decimal::from(5), 10));

        let catalog = WarehouseCatalog::build(&config, &stock()).unwrap();
        let names: Vec<_> = catalog.warehouses().iter().map(|wh| wh.name()).collect();
        assert_eq!(names, vec!["warehouseA", "warehouseB"]);
        assert_eq!(catalog.get("warehouseB").unwrap().products_on_stock().len(), 2);
    }

    #[test]
    fn test_catalog_rejects_invalid_config() {
        let config = SourcingConfig::new(Decimal::from(10))
            .with_warehouse(WarehouseConfig::new("warehouseA", Decimal::from(5), 1));
        assert!(WarehouseCatalog::build(&config, &stock()).is_err());
    }

    #[test]
    fn test_pack_line_key_display() {
        assert_eq!(PackLineKey::new("wh", "line").to_string(), "wh/line");
    }
}
