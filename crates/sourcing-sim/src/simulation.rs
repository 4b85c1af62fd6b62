//! 逐日模擬驅動

use sourcing_calc::{CapacityLedger, SourcingEngine};
use sourcing_core::{SourcingConfig, StockAllocation, WarehouseCatalog};

use crate::intake::{group_orders, OrderDay, OrderRow};
use crate::outcome::SimulationOutcome;
use crate::Result;

/// 模擬驅動
///
/// 持有倉庫目錄與產能帳本。同一天內的訂單依序分配、共用產能；每日結束後帳本恢復滿產能。
pub struct Simulation {
    config: SourcingConfig,
    catalog: WarehouseCatalog,
    ledger: CapacityLedger,
}

impl Simulation {
    /// 建立模擬；配置或庫存分配無效時直接失敗
    pub fn new(config: SourcingConfig, stock: &StockAllocation) -> Result<Self> {
        let catalog = WarehouseCatalog::build(&config, stock)?;
        let ledger = CapacityLedger::new(&catalog);

        Ok(Self {
            config,
            catalog,
            ledger,
        })
    }

    pub fn config(&self) -> &SourcingConfig {
        &self.config
    }

    pub fn catalog(&self) -> &WarehouseCatalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &CapacityLedger {
        &self.ledger
    }

    /// 分組訂單明細後執行模擬
    pub fn run(&mut self, rows: &[OrderRow]) -> Result<SimulationOutcome> {
        let days = group_orders(rows);
        self.run_days(&days)
    }

    /// 執行已分組的每日訂單
    pub fn run_days(&mut self, days: &[OrderDay]) -> Result<SimulationOutcome> {
        tracing::info!(
            "開始模擬：{} 天，倉庫 {} 個，包裝線 {} 條",
            days.len(),
            self.catalog.len(),
            self.ledger.len()
        );
        let start_time = std::time::Instant::now();

        // 前一次執行可能中途失敗，帳本仍殘留當日扣減
        self.ledger.reset_all();

        let engine = SourcingEngine::new(&self.catalog, &self.config)?;
        let mut selected_per_day = Vec::with_capacity(days.len());

        for day in days {
            let mut selected = Vec::with_capacity(day.orders.len());

            for order in &day.orders {
                let option = engine.source_order(order, &mut self.ledger)?;
                if option.has_lost_sales() {
                    tracing::warn!(
                        "訂單 {} 有 {} 件商品無法分配",
                        order.order_id,
                        option.lost_sales.len()
                    );
                }
                selected.push(option);
            }

            for (key, entry) in self.ledger.entries() {
                tracing::debug!("{} 包裝線 {} 使用率 {}", day.date, key, entry.utilization());
            }

            tracing::info!("{} 完成 {} 張訂單", day.date, selected.len());
            self.ledger.reset_all();
            selected_per_day.push((day.date, selected));
        }

        let outcome = SimulationOutcome::from_days(selected_per_day);
        tracing::info!(
            "模擬完成，耗時 {:?}，總成本 {}",
            start_time.elapsed(),
            outcome.total_costs
        );

        Ok(outcome)
    }
}

/// 以配置、庫存分配與訂單明細執行一次完整模擬
pub fn simulate(
    config: SourcingConfig,
    stock: &StockAllocation,
    rows: &[OrderRow],
) -> Result<SimulationOutcome> {
    Simulation::new(config, stock)?.run(rows)
}
