//! 單一倉庫的包裝線指派

use rust_decimal::Decimal;
use sourcing_core::{PackLine, PackLineKind, ShopOrder, Warehouse, WarehouseOrderLine};
use std::collections::BTreeSet;

use crate::ledger::CapacityLedger;

/// 單一倉庫的包裝決策
#[derive(Debug, Clone, PartialEq)]
pub struct PackingDecision {
    /// 尚未分配、交給下一個倉庫的商品
    pub left_over: BTreeSet<String>,
    /// 在此倉庫產生的出貨行
    pub warehouse_orders: Vec<WarehouseOrderLine>,
}

/// 包裝線指派策略
///
/// 多品優先：可合併時先找第一條有產能的 multi 線，否則退回第一條有產能的 mono 線。
/// 同類型的包裝線依宣告順序取第一個符合者。
pub struct PackingPolicy;

impl PackingPolicy {
    /// 在指定倉庫包裝剩餘商品
    ///
    /// 產能只對照 `ledger` 檢查，不做任何扣減。
    pub fn pack_at_warehouse(
        remaining: &BTreeSet<String>,
        warehouse: &Warehouse,
        ledger: &CapacityLedger,
        order: &ShopOrder,
    ) -> PackingDecision {
        let (available, left_over): (BTreeSet<String>, BTreeSet<String>) = remaining
            .iter()
            .cloned()
            .partition(|product_id| warehouse.stocks(product_id));

        if available.is_empty() {
            return PackingDecision {
                left_over,
                warehouse_orders: Vec::new(),
            };
        }

        let amount = available.len() as u32;

        if available.len() > 1 {
            if let Some(pack_line) = Self::first_with_capacity(warehouse, PackLineKind::Multi, ledger, amount) {
                let line = WarehouseOrderLine::new(
                    order.order_id.clone(),
                    pack_line.key().clone(),
                    available,
                    pack_line.cost_per_product() * Decimal::from(amount),
                    warehouse.cost_per_shipment(),
                    order.order_datetime,
                );
                return PackingDecision {
                    left_over,
                    warehouse_orders: vec![line],
                };
            }
        }

        // mono 線一次檢查整批產能，再逐件產生出貨行；
        // 扣減時各行件數加總等於此處檢查的數量。
        if let Some(pack_line) = Self::first_with_capacity(warehouse, PackLineKind::Mono, ledger, amount) {
            let warehouse_orders = available
                .into_iter()
                .map(|product_id| {
                    WarehouseOrderLine::new(
                        order.order_id.clone(),
                        pack_line.key().clone(),
                        BTreeSet::from([product_id]),
                        pack_line.cost_per_product(),
                        warehouse.cost_per_shipment(),
                        order.order_datetime,
                    )
                })
                .collect();
            return PackingDecision {
                left_over,
                warehouse_orders,
            };
        }

        tracing::trace!(
            "倉庫 {} 無可用包裝線，{} 件商品留待後續倉庫",
            warehouse.name(),
            remaining.len()
        );

        PackingDecision {
            left_over: remaining.clone(),
            warehouse_orders: Vec::new(),
        }
    }

    fn first_with_capacity<'a>(
        warehouse: &'a Warehouse,
        kind: PackLineKind,
        ledger: &CapacityLedger,
        amount: u32,
    ) -> Option<&'a PackLine> {
        warehouse
            .pack_lines_of(kind)
            .find(|pl| ledger.is_available(pl.key(), amount))
    }
}
