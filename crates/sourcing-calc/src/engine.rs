//! 訂單分配引擎

use rayon::prelude::*;
use rust_decimal::Decimal;
use sourcing_core::{
    LostSalesRecord, SearchMode, ShopOrder, SourcingConfig, SourcingError, SourcingOption,
    WarehouseCatalog,
};

use crate::ledger::CapacityLedger;
use crate::packing::PackingPolicy;
use crate::permutation::{lexicographic_permutations, permutation_count};

/// 訂單分配引擎
///
/// 對每張訂單窮舉所有倉庫拜訪順序，逐倉套用 [`PackingPolicy`]，
/// 取總成本最低的方案並扣減產能帳本。所有候選方案都對照同一份未修改的帳本評估。
pub struct SourcingEngine<'a> {
    /// 倉庫目錄（模擬期間不可變）
    catalog: &'a WarehouseCatalog,

    /// 缺貨懲罰率
    lost_sales_penalty: Decimal,

    /// 評估模式
    search_mode: SearchMode,

    /// 倉庫索引的字典序排列
    permutations: Vec<Vec<usize>>,
}

impl<'a> SourcingEngine<'a> {
    /// 創建引擎；倉庫數超過實際上限或排列數溢位時回傳配置錯誤
    pub fn new(catalog: &'a WarehouseCatalog, config: &SourcingConfig) -> sourcing_core::Result<Self> {
        let max = config.effective_max_warehouses();
        if catalog.len() > max || permutation_count(catalog.len()).is_none() {
            return Err(SourcingError::TooManyWarehouses {
                count: catalog.len(),
                max,
            });
        }

        let permutations = lexicographic_permutations(catalog.len());
        tracing::debug!(
            "分配引擎初始化：倉庫 {} 個，拜訪順序 {} 種",
            catalog.len(),
            permutations.len()
        );

        Ok(Self {
            catalog,
            lost_sales_penalty: config.lost_sales_penalty,
            search_mode: config.search_mode,
            permutations,
        })
    }

    pub fn catalog(&self) -> &WarehouseCatalog {
        self.catalog
    }

    pub fn permutation_count(&self) -> usize {
        self.permutations.len()
    }

    /// 分配一張訂單並扣減產能
    pub fn source_order(
        &self,
        order: &ShopOrder,
        ledger: &mut CapacityLedger,
    ) -> sourcing_core::Result<SourcingOption> {
        let options = self.evaluate_options(order, ledger);
        let selected = Self::select_cheapest(options).ok_or_else(|| {
            SourcingError::InvalidConfig("倉庫目錄沒有任何拜訪順序".to_string())
        })?;

        ledger.consume(&selected)?;

        tracing::debug!(
            "訂單 {} 分配完成：出貨行 {} 筆，缺貨 {} 件，總成本 {}",
            order.order_id,
            selected.warehouse_orders.len(),
            selected.lost_sales.len(),
            selected.total_costs()
        );

        Ok(selected)
    }

    /// 評估所有拜訪順序的候選方案（依列舉順序回傳，不修改帳本）
    pub fn evaluate_options(&self, order: &ShopOrder, ledger: &CapacityLedger) -> Vec<SourcingOption> {
        match self.search_mode {
            SearchMode::Sequential => self
                .permutations
                .iter()
                .map(|visit_order| self.evaluate_visit_order(visit_order, order, ledger))
                .collect(),
            SearchMode::Parallel => self
                .permutations
                .par_iter()
                .map(|visit_order| self.evaluate_visit_order(visit_order, order, ledger))
                .collect(),
        }
    }

    /// 依指定倉庫順序建立一個候選方案
    fn evaluate_visit_order(
        &self,
        visit_order: &[usize],
        order: &ShopOrder,
        ledger: &CapacityLedger,
    ) -> SourcingOption {
        let warehouses = self.catalog.warehouses();
        let mut to_be_sourced = order.products.clone();
        let mut warehouse_orders = Vec::new();

        for &index in visit_order {
            if to_be_sourced.is_empty() {
                break;
            }

            let decision =
                PackingPolicy::pack_at_warehouse(&to_be_sourced, &warehouses[index], ledger, order);
            to_be_sourced = decision.left_over;
            warehouse_orders.extend(decision.warehouse_orders);
        }

        SourcingOption::new(
            warehouse_orders,
            LostSalesRecord::new(order.order_id.clone(), order.order_datetime, to_be_sourced),
            self.lost_sales_penalty,
        )
    }

    /// 取總成本最低的方案；成本相同時保留先列舉者
    pub fn select_cheapest(options: Vec<SourcingOption>) -> Option<SourcingOption> {
        let mut options = options.into_iter();
        let mut cheapest = options.next()?;
        let mut cheapest_costs = cheapest.total_costs();

        for option in options {
            let costs = option.total_costs();
            if costs < cheapest_costs {
                cheapest = option;
                cheapest_costs = costs;
            }
        }

        Some(cheapest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use sourcing_core::{PackLineConfig, PackLineKey, StockAllocation, WarehouseConfig};

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 3)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn order(id: &str, products: &[&str]) -> ShopOrder {
        ShopOrder::new(id, datetime(), products.iter().copied())
    }

    /// 單一倉庫、單一 mono 線（產能 2，單件 1），出貨成本 5
    fn single_mono_config() -> (SourcingConfig, StockAllocation) {
        let config = SourcingConfig::new(Decimal::from(10)).with_warehouse(
            WarehouseConfig::new("A", Decimal::from(5), 10)
                .with_pack_line(PackLineConfig::mono("mono", 2, Decimal::ONE)),
        );
        let stock = StockAllocation::from_pairs([("P1", "A"), ("P2", "A"), ("P3", "A")]);
        (config, stock)
    }

    #[test]
    fn test_single_product_single_warehouse() {
        let (config, stock) = single_mono_config();
        let catalog = WarehouseCatalog::build(&config, &stock).unwrap();
        let mut ledger = CapacityLedger::new(&catalog);
        let engine = SourcingEngine::new(&catalog, &config).unwrap();

        let selected = engine.source_order(&order("SO-1", &["P1"]), &mut ledger).unwrap();

        assert_eq!(selected.warehouse_orders.len(), 1);
        assert_eq!(selected.total_costs(), Decimal::from(6));
        assert!(!selected.has_lost_sales());
        assert_eq!(ledger.available_capacity(&PackLineKey::new("A", "mono")), Some(1));
    }

    #[test]
    fn test_exhausted_line_becomes_lost_sales() {
        let (config, stock) = single_mono_config();
        let catalog = WarehouseCatalog::build(&config, &stock).unwrap();
        let mut ledger = CapacityLedger::new(&catalog);
        let engine = SourcingEngine::new(&catalog, &config).unwrap();

        engine.source_order(&order("SO-1", &["P1", "P2"]), &mut ledger).unwrap();
        assert_eq!(ledger.available_capacity(&PackLineKey::new("A", "mono")), Some(0));

        let selected = engine.source_order(&order("SO-2", &["P3"]), &mut ledger).unwrap();

        assert!(selected.warehouse_orders.is_empty());
        assert_eq!(
            selected.lost_sales.unsourceable_products.iter().collect::<Vec<_>>(),
            vec!["P3"]
        );
        assert_eq!(selected.penalty, Decimal::from(10));
        assert_eq!(selected.total_costs(), Decimal::from(10));
    }

    #[test]
    fn test_cheaper_warehouse_selected() {
        let config = SourcingConfig::new(Decimal::from(10))
            .with_warehouse(
                WarehouseConfig::new("A", Decimal::from(6), 10)
                    .with_pack_line(PackLineConfig::mono("mono", 5, Decimal::new(5, 1))),
            )
            .with_warehouse(
                WarehouseConfig::new("B", Decimal::from(5), 10)
                    .with_pack_line(PackLineConfig::mono("mono", 5, Decimal::ONE)),
            );
        let stock = StockAllocation::from_pairs([("P1", "A"), ("P1", "B")]);
        let catalog = WarehouseCatalog::build(&config, &stock).unwrap();
        let mut ledger = CapacityLedger::new(&catalog);
        let engine = SourcingEngine::new(&catalog, &config).unwrap();

        let selected = engine.source_order(&order("SO-1", &["P1"]), &mut ledger).unwrap();

        assert_eq!(selected.warehouse_orders.len(), 1);
        assert_eq!(selected.warehouse_orders[0].warehouse_id(), "B");
        assert_eq!(selected.total_costs(), Decimal::from(6));
        assert_eq!(ledger.available_capacity(&PackLineKey::new("A", "mono")), Some(5));
        assert_eq!(ledger.available_capacity(&PackLineKey::new("B", "mono")), Some(4));
    }

    #[test]
    fn test_multi_before_mono_commits_multi_line() {
        let config = SourcingConfig::reference();
        let stock = StockAllocation::from_pairs([("P1", "warehouseA"), ("P2", "warehouseA")]);
        let catalog = WarehouseCatalog::build(&config, &stock).unwrap();
        let mut ledger = CapacityLedger::new(&catalog);
        let engine = SourcingEngine::new(&catalog, &config).unwrap();

        let selected = engine.source_order(&order("SO-1", &["P1", "P2"]), &mut ledger).unwrap();

        assert_eq!(selected.warehouse_orders.len(), 1);
        assert_eq!(
            selected.warehouse_orders[0].pack_line,
            PackLineKey::new("warehouseA", "multiManual")
        );
        // 0.9 × 2 + 5
        assert_eq!(selected.total_costs(), Decimal::new(68, 1));
        assert_eq!(
            ledger.available_capacity(&PackLineKey::new("warehouseA", "multiManual")),
            Some(198)
        );
        assert_eq!(
            ledger.available_capacity(&PackLineKey::new("warehouseA", "monoManual")),
            Some(100)
        );
    }

    #[test]
    fn test_split_across_warehouses() {
        let config = SourcingConfig::reference();
        let stock = StockAllocation::from_pairs([("P1", "warehouseA"), ("P2", "warehouseB")]);
        let catalog = WarehouseCatalog::build(&config, &stock).unwrap();
        let mut ledger = CapacityLedger::new(&catalog);
        let engine = SourcingEngine::new(&catalog, &config).unwrap();

        let selected = engine.source_order(&order("SO-1", &["P1", "P2", "P3"]), &mut ledger).unwrap();

        // 兩倉各一筆 mono 出貨：(0.7 + 5) + (0.5 + 6)，P3 缺貨懲罰 10
        assert_eq!(selected.warehouse_orders.len(), 2);
        assert_eq!(selected.lost_sales.len(), 1);
        assert_eq!(selected.total_costs(), Decimal::new(222, 1));
    }

    #[test]
    fn test_evaluation_does_not_touch_ledger() {
        let config = SourcingConfig::reference();
        let stock = StockAllocation::from_pairs([("P1", "warehouseA"), ("P1", "warehouseB")]);
        let catalog = WarehouseCatalog::build(&config, &stock).unwrap();
        let ledger = CapacityLedger::new(&catalog);
        let engine = SourcingEngine::new(&catalog, &config).unwrap();

        let before = ledger.clone();
        let options = engine.evaluate_options(&order("SO-1", &["P1"]), &ledger);

        assert_eq!(options.len(), 2);
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_selected_option_is_cheapest() {
        let config = SourcingConfig::reference();
        let stock = StockAllocation::from_pairs([
            ("P1", "warehouseA"),
            ("P2", "warehouseA"),
            ("P2", "warehouseB"),
            ("P3", "warehouseB"),
        ]);
        let catalog = WarehouseCatalog::build(&config, &stock).unwrap();
        let mut ledger = CapacityLedger::new(&catalog);
        let engine = SourcingEngine::new(&catalog, &config).unwrap();
        let order = order("SO-1", &["P1", "P2", "P3"]);

        let options = engine.evaluate_options(&order, &ledger);
        let selected = engine.source_order(&order, &mut ledger).unwrap();

        for option in &options {
            assert!(selected.total_costs() <= option.total_costs());
        }
    }

    #[test]
    fn test_ties_resolve_to_first_permutation() {
        let warehouse = |name: &str| {
            WarehouseConfig::new(name, Decimal::from(5), 10)
                .with_pack_line(PackLineConfig::mono("mono", 5, Decimal::ONE))
        };
        let config = SourcingConfig::new(Decimal::from(10))
            .with_warehouse(warehouse("B"))
            .with_warehouse(warehouse("A"));
        let stock = StockAllocation::from_pairs([("P1", "A"), ("P1", "B")]);
        let catalog = WarehouseCatalog::build(&config, &stock).unwrap();
        let mut ledger = CapacityLedger::new(&catalog);
        let engine = SourcingEngine::new(&catalog, &config).unwrap();

        let selected = engine.source_order(&order("SO-1", &["P1"]), &mut ledger).unwrap();
        assert_eq!(selected.warehouse_orders[0].warehouse_id(), "A");
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = SourcingConfig::reference();
        let parallel = SourcingConfig::reference().with_search_mode(SearchMode::Parallel);
        let stock = StockAllocation::from_pairs([
            ("P1", "warehouseA"),
            ("P2", "warehouseA"),
            ("P2", "warehouseB"),
            ("P3", "warehouseB"),
        ]);
        let catalog = WarehouseCatalog::build(&sequential, &stock).unwrap();
        let ledger = CapacityLedger::new(&catalog);
        let order = order("SO-1", &["P1", "P2", "P3", "P4"]);

        let seq_options = SourcingEngine::new(&catalog, &sequential)
            .unwrap()
            .evaluate_options(&order, &ledger);
        let par_options = SourcingEngine::new(&catalog, &parallel)
            .unwrap()
            .evaluate_options(&order, &ledger);

        assert_eq!(seq_options, par_options);
    }

    #[test]
    fn test_engine_rejects_too_many_warehouses() {
        let config = SourcingConfig::reference();
        let catalog = WarehouseCatalog::build(&config, &StockAllocation::new()).unwrap();
        let strict = config.clone().with_max_warehouses(1);

        assert!(matches!(
            SourcingEngine::new(&catalog, &strict),
            Err(SourcingError::TooManyWarehouses { count: 2, max: 1 })
        ));
    }

    #[test]
    fn test_raised_max_warehouses_still_capped() {
        let mut config = SourcingConfig::new(Decimal::from(10)).with_max_warehouses(20);
        for i in 0..11 {
            config = config.with_warehouse(WarehouseConfig::new(format!("W{i:02}"), Decimal::ONE, 10));
        }

        assert!(matches!(
            WarehouseCatalog::build(&config, &StockAllocation::new()),
            Err(SourcingError::TooManyWarehouses { count: 11, max: 10 })
        ));

        // 低於硬上限時，放寬 max_warehouses 不影響正常建立
        let small = SourcingConfig::reference().with_max_warehouses(20);
        let catalog = WarehouseCatalog::build(&small, &StockAllocation::new()).unwrap();
        let engine = SourcingEngine::new(&catalog, &small).unwrap();
        assert_eq!(engine.permutation_count(), 2);
    }

    #[test]
    fn test_select_cheapest_empty() {
        assert!(SourcingEngine::select_cheapest(Vec::new()).is_none());
    }
}
