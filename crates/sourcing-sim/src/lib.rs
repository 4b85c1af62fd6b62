//! # Sourcing Simulation
//!
//! 逐日模擬：訂單分組、載入、模擬驅動與結果彙總

pub mod intake;
pub mod loading;
pub mod logging;
pub mod outcome;
pub mod simulation;

// Re-export 主要類型
pub use intake::{group_orders, OrderDay, OrderRow};
pub use outcome::{DayReport, LostSalesRow, OutcomeSummary, SimulationOutcome};
pub use simulation::{simulate, Simulation};

/// 模擬錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    Sourcing(#[from] sourcing_core::SourcingError),

    #[error("CSV 讀寫錯誤: {0}")]
    Csv(#[from] csv::Error),

    #[error("檔案讀寫錯誤: {0}")]
    Io(#[from] std::io::Error),

    #[error("缺少欄位: {0}")]
    MissingColumn(String),

    #[error("無效的時間格式: {0}")]
    InvalidDateTime(String),

    #[error("無效的布林值（第 {row} 行, 欄位 {column}）: {value}")]
    InvalidFlag {
        row: usize,
        column: String,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, SimulationError>;
