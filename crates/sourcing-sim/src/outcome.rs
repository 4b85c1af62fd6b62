//! 模擬結果彙總

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sourcing_core::{SourcingOption, WarehouseOrderLine};
use std::fmt;
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

use crate::Result;

/// 缺貨明細（一個未分配商品一行）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostSalesRow {
    pub shop_order_id: String,
    pub order_datetime: NaiveDateTime,
    pub product_id: String,
}

/// 單日彙總
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayReport {
    pub date: NaiveDate,
    /// 訂單數
    pub orders: usize,
    /// 出貨行數
    pub warehouse_orders: usize,
    /// 缺貨商品數
    pub lost_products: usize,
    /// 當日總成本（含懲罰）
    pub total_costs: Decimal,
}

impl DayReport {
    fn from_options(date: NaiveDate, options: &[SourcingOption]) -> Self {
        Self {
            date,
            orders: options.len(),
            warehouse_orders: options.iter().map(|o| o.warehouse_orders.len()).sum(),
            lost_products: options.iter().map(|o| o.lost_sales.len()).sum(),
            total_costs: options.iter().map(SourcingOption::total_costs).sum(),
        }
    }
}

/// 結果摘要
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeSummary {
    pub warehouse_orders_sourced: usize,
    pub total_costs: Decimal,
    pub lost_sales_products: usize,
}

impl fmt::Display for OutcomeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "已分配出貨行: {}", self.warehouse_orders_sourced)?;
        writeln!(f, "總成本: {}", self.total_costs)?;
        write!(f, "缺貨: {} 件商品", self.lost_sales_products)
    }
}

/// 出貨行 CSV 記錄
#[derive(Debug, Serialize)]
struct WarehouseOrderRecord<'a> {
    shop_order_id: &'a str,
    warehouse_id: &'a str,
    pack_line: &'a str,
    products: String,
    quantity: u32,
    warehouse_costs: Decimal,
    shipment_costs: Decimal,
    total_costs: Decimal,
    order_datetime: NaiveDateTime,
}

/// 模擬結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// 模擬批次ID
    pub run_id: Uuid,

    /// 所有選定方案的出貨行
    pub warehouse_orders: Vec<WarehouseOrderLine>,

    /// 缺貨明細
    pub lost_sales: Vec<LostSalesRow>,

    /// 總成本（四捨五入至小數兩位）
    pub total_costs: Decimal,

    /// 每日彙總
    pub days: Vec<DayReport>,
}

impl SimulationOutcome {
    /// 由每日選定方案彙總
    pub fn from_days(days: Vec<(NaiveDate, Vec<SourcingOption>)>) -> Self {
        let reports = days
            .iter()
            .map(|(date, options)| DayReport::from_options(*date, options))
            .collect();

        let mut warehouse_orders = Vec::new();
        let mut lost_sales = Vec::new();
        let mut total_costs = Decimal::ZERO;

        for option in days.into_iter().flat_map(|(_, options)| options) {
            total_costs += option.total_costs();

            let record = option.lost_sales;
            lost_sales.extend(record.unsourceable_products.into_iter().map(|product_id| LostSalesRow {
                shop_order_id: record.shop_order_id.clone(),
                order_datetime: record.order_datetime,
                product_id,
            }));
            warehouse_orders.extend(option.warehouse_orders);
        }

        Self {
            run_id: Uuid::new_v4(),
            warehouse_orders,
            lost_sales,
            total_costs: total_costs.round_dp(2),
            days: reports,
        }
    }

    pub fn summary(&self) -> OutcomeSummary {
        OutcomeSummary {
            warehouse_orders_sourced: self.warehouse_orders.len(),
            total_costs: self.total_costs,
            lost_sales_products: self.lost_sales.len(),
        }
    }

    /// 輸出出貨行 CSV（多個商品以 `;` 串接）
    pub fn write_warehouse_orders_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for line in &self.warehouse_orders {
            writer.serialize(WarehouseOrderRecord {
                shop_order_id: &line.shop_order_id,
                warehouse_id: line.warehouse_id(),
                pack_line: &line.pack_line.pack_line,
                products: line.products.iter().cloned().collect::<Vec<_>>().join(";"),
                quantity: line.quantity(),
                warehouse_costs: line.warehouse_costs,
                shipment_costs: line.shipment_costs,
                total_costs: line.total_costs(),
                order_datetime: line.order_datetime,
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    /// 輸出缺貨明細 CSV
    pub fn write_lost_sales_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for row in &self.lost_sales {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// 於目錄下輸出 `warehouse_orders.csv` 與 `lost_sales.csv`
    pub fn export_csv(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        self.write_warehouse_orders_csv(std::fs::File::create(dir.join("warehouse_orders.csv"))?)?;
        self.write_lost_sales_csv(std::fs::File::create(dir.join("lost_sales.csv"))?)?;
        tracing::info!("模擬結果已輸出至 {}", dir.display());
        Ok(())
    }
}
