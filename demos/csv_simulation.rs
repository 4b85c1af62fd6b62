//! 從 CSV 與 JSON 檔案執行模擬
//!
//! 用法：`cargo run --example csv_simulation -- [資料目錄] [輸出目錄]`

use anyhow::Context;
use sourcing::{Simulation, SourcingConfig};
use sourcing_sim::loading::{load_orders, load_stock_allocation};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    sourcing_sim::logging::init();

    let mut args = std::env::args().skip(1);
    let data_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("demos/data"));
    let output_dir = args.next().map(PathBuf::from);

    let config = SourcingConfig::from_json_file(data_dir.join("config.json"))
        .context("讀取倉庫配置失敗")?;
    let stock = load_stock_allocation(data_dir.join("stock_allocation.csv"))
        .context("讀取庫存分配失敗")?;
    let rows = load_orders(data_dir.join("orders.csv")).context("讀取訂單失敗")?;

    tracing::info!("載入 {} 筆訂單明細，{} 個商品有庫存", rows.len(), stock.product_count());

    let mut simulation = Simulation::new(config, &stock)?;
    let outcome = simulation.run(&rows)?;

    for day in &outcome.days {
        println!(
            "{}: 訂單 {}，出貨行 {}，缺貨 {}，成本 {}",
            day.date, day.orders, day.warehouse_orders, day.lost_products, day.total_costs
        );
    }
    println!("\n{}", outcome.summary());

    if let Some(dir) = output_dir {
        outcome
            .export_csv(&dir)
            .with_context(|| format!("輸出結果至 {} 失敗", dir.display()))?;
    }

    Ok(())
}
