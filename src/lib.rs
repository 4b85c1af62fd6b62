//! # Sourcing
//!
//! 多倉訂單分配模擬：在包裝線產能限制下，以最低履約成本（包裝 + 出貨）分配每張訂單，
//! 無法分配的商品記為缺貨並計入懲罰。

pub use sourcing_calc::{CapacityLedger, PackingPolicy, SourcingEngine};
pub use sourcing_core::{
    LostSalesRecord, PackLineConfig, PackLineKey, PackLineKind, SearchMode, ShopOrder,
    SourcingConfig, SourcingError, SourcingOption, StockAllocation, WarehouseCatalog,
    WarehouseConfig, WarehouseOrderLine,
};
pub use sourcing_sim::{simulate, OrderRow, Simulation, SimulationError, SimulationOutcome};
