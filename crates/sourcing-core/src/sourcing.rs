//! 分配結果模型

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::warehouse::PackLineKey;

/// 倉庫出貨行（一筆已承諾的包裝指派）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseOrderLine {
    /// 客戶訂單號
    pub shop_order_id: String,

    /// 包裝線（含倉庫）
    pub pack_line: PackLineKey,

    /// 出貨商品（非空）
    pub products: BTreeSet<String>,

    /// 倉庫包裝成本（單件成本 × 件數）
    pub warehouse_costs: Decimal,

    /// 出貨成本
    pub shipment_costs: Decimal,

    /// 下單時間
    pub order_datetime: NaiveDateTime,
}

impl WarehouseOrderLine {
    pub fn new(
        shop_order_id: String,
        pack_line: PackLineKey,
        products: BTreeSet<String>,
        warehouse_costs: Decimal,
        shipment_costs: Decimal,
        order_datetime: NaiveDateTime,
    ) -> Self {
        debug_assert!(!products.is_empty(), "出貨行至少要有一個商品");
        Self {
            shop_order_id,
            pack_line,
            products,
            warehouse_costs,
            shipment_costs,
            order_datetime,
        }
    }

    pub fn warehouse_id(&self) -> &str {
        &self.pack_line.warehouse
    }

    /// 件數 = 商品數
    pub fn quantity(&self) -> u32 {
        self.products.len() as u32
    }

    /// 總成本 = 倉庫成本 + 出貨成本
    pub fn total_costs(&self) -> Decimal {
        self.warehouse_costs + self.shipment_costs
    }
}

/// 缺貨記錄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostSalesRecord {
    pub shop_order_id: String,
    pub order_datetime: NaiveDateTime,
    /// 無法分配的商品（可為空）
    pub unsourceable_products: BTreeSet<String>,
}

impl LostSalesRecord {
    pub fn new(
        shop_order_id: String,
        order_datetime: NaiveDateTime,
        unsourceable_products: BTreeSet<String>,
    ) -> Self {
        Self {
            shop_order_id,
            order_datetime,
            unsourceable_products,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.unsourceable_products.is_empty()
    }

    pub fn len(&self) -> usize {
        self.unsourceable_products.len()
    }
}

/// 分配方案：一張訂單的完整候選解
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcingOption {
    /// 出貨行（依倉庫拜訪順序）
    pub warehouse_orders: Vec<WarehouseOrderLine>,

    /// 缺貨記錄
    pub lost_sales: LostSalesRecord,

    /// 缺貨懲罰（無缺貨時為 0）
    pub penalty: Decimal,
}

impl SourcingOption {
    /// 創建分配方案，懲罰 = 懲罰率 × 缺貨件數
    pub fn new(
        warehouse_orders: Vec<WarehouseOrderLine>,
        lost_sales: LostSalesRecord,
        lost_sales_penalty: Decimal,
    ) -> Self {
        let penalty = if lost_sales.is_empty() {
            Decimal::ZERO
        } else {
            lost_sales_penalty * Decimal::from(lost_sales.len())
        };

        Self {
            warehouse_orders,
            lost_sales,
            penalty,
        }
    }

    /// 總成本 = Σ 出貨行成本 + 懲罰
    pub fn total_costs(&self) -> Decimal {
        self.warehouse_orders
            .iter()
            .map(WarehouseOrderLine::total_costs)
            .sum::<Decimal>()
            + self.penalty
    }

    /// 已分配的商品
    pub fn sourced_products(&self) -> impl Iterator<Item = &String> {
        self.warehouse_orders.iter().flat_map(|line| line.products.iter())
    }

    pub fn shop_order_id(&self) -> &str {
        &self.lost_sales.shop_order_id
    }

    pub fn has_lost_sales(&self) -> bool {
        !self.lost_sales.is_empty()
    }
}
