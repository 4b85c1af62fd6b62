//! # Sourcing Calculation Engine
//!
//! 訂單分配核心：產能帳本、倉庫拜訪順序搜尋、包裝線指派與最低成本選擇

pub mod engine;
pub mod ledger;
pub mod packing;
pub mod permutation;

// Re-export 主要類型
pub use engine::SourcingEngine;
pub use ledger::{CapacityEntry, CapacityLedger};
pub use packing::{PackingDecision, PackingPolicy};
