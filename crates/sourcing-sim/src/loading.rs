//! CSV 載入：訂單明細與庫存分配表

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use sourcing_core::StockAllocation;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::intake::OrderRow;
use crate::{Result, SimulationError};

const PRODUCT_ID_COLUMN: &str = "product_id";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

/// 訂單 CSV 原始記錄
#[derive(Debug, Deserialize)]
struct RawOrderRecord {
    order_id: String,
    product_id: String,
    datetime: String,
}

/// 解析時間欄位
///
/// 支援 `YYYY-MM-DD HH:MM:SS`（可含小數秒、`T` 分隔）、RFC 3339 與純日期（視為午夜）。
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime);
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.naive_local());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| SimulationError::InvalidDateTime(value.to_string()))
}

/// 解析布林欄位（true/false、1/0、yes/no，不分大小寫；空白視為 false）
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" | "" => Some(false),
        _ => None,
    }
}

/// 讀取訂單明細（欄位: order_id, product_id, datetime）
pub fn read_orders<R: Read>(reader: R) -> Result<Vec<OrderRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.deserialize::<RawOrderRecord>() {
        let record = record?;
        rows.push(OrderRow {
            order_id: record.order_id,
            product_id: record.product_id,
            datetime: parse_datetime(&record.datetime)?,
        });
    }

    tracing::debug!("讀取訂單明細 {} 行", rows.len());
    Ok(rows)
}

/// 從檔案讀取訂單明細
pub fn load_orders(path: impl AsRef<Path>) -> Result<Vec<OrderRow>> {
    read_orders(File::open(path)?)
}

/// 讀取寬表格式的庫存分配
///
/// 第一列為表頭：`product_id` 欄加上每個倉庫一欄，儲存格為布林值。
pub fn read_stock_allocation<R: Read>(reader: R) -> Result<StockAllocation> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let product_column = headers
        .iter()
        .position(|h| h == PRODUCT_ID_COLUMN)
        .ok_or_else(|| SimulationError::MissingColumn(PRODUCT_ID_COLUMN.to_string()))?;

    let mut stock = StockAllocation::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let product_id = record.get(product_column).unwrap_or_default();
        if product_id.is_empty() {
            continue;
        }

        for (column, warehouse) in headers.iter().enumerate() {
            if column == product_column {
                continue;
            }

            let value = record.get(column).unwrap_or_default();
            let stocked = parse_flag(value).ok_or_else(|| SimulationError::InvalidFlag {
                // 含表頭的行號
                row: row_idx + 2,
                column: warehouse.clone(),
                value: value.to_string(),
            })?;

            if stocked {
                stock.allocate(product_id, warehouse.as_str());
            }
        }
    }

    tracing::debug!("讀取庫存分配 {} 個商品", stock.product_count());
    Ok(stock)
}

/// 從檔案讀取庫存分配
pub fn load_stock_allocation(path: impl AsRef<Path>) -> Result<StockAllocation> {
    read_stock_allocation(File::open(path)?)
}
