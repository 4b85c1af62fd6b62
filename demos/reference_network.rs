//! 參考網路分配示例

use chrono::NaiveDate;
use sourcing::{simulate, OrderRow, SourcingConfig, StockAllocation};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    sourcing_sim::logging::init();

    println!("=== 參考網路分配示例 ===\n");

    // warehouseA / warehouseB 各有單品線與多品線
    let config = SourcingConfig::reference();

    let stock = StockAllocation::from_pairs([
        ("P1", "warehouseA"),
        ("P2", "warehouseA"),
        ("P2", "warehouseB"),
        ("P3", "warehouseB"),
    ]);

    let monday = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
    let tuesday = NaiveDate::from_ymd_opt(2025, 11, 4).unwrap();
    let rows = vec![
        OrderRow::new("SO-001", "P1", monday.and_hms_opt(8, 0, 0).unwrap()),
        OrderRow::new("SO-001", "P2", monday.and_hms_opt(8, 0, 0).unwrap()),
        OrderRow::new("SO-002", "P3", monday.and_hms_opt(9, 15, 0).unwrap()),
        OrderRow::new("SO-003", "P2", tuesday.and_hms_opt(10, 0, 0).unwrap()),
        OrderRow::new("SO-003", "P4", tuesday.and_hms_opt(10, 0, 0).unwrap()),
    ];

    let outcome = simulate(config, &stock, &rows)?;

    println!("出貨行:");
    for line in &outcome.warehouse_orders {
        println!(
            "  - 訂單: {}, 包裝線: {}, 商品: {:?}, 成本: {}",
            line.shop_order_id,
            line.pack_line,
            line.products,
            line.total_costs()
        );
    }

    println!("\n缺貨:");
    for row in &outcome.lost_sales {
        println!("  - 訂單: {}, 商品: {}", row.shop_order_id, row.product_id);
    }

    println!("\n{}", outcome.summary());

    Ok(())
}
