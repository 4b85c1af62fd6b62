//! 訂單明細分組（日期 → 訂單）

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sourcing_core::ShopOrder;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// 訂單明細（一行一個商品）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRow {
    pub order_id: String,
    pub product_id: String,
    pub datetime: NaiveDateTime,
}

impl OrderRow {
    pub fn new(order_id: impl Into<String>, product_id: impl Into<String>, datetime: NaiveDateTime) -> Self {
        Self {
            order_id: order_id.into(),
            product_id: product_id.into(),
            datetime,
        }
    }
}

/// 單日訂單
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDay {
    pub date: NaiveDate,
    /// 依首次出現順序排列
    pub orders: Vec<ShopOrder>,
}

/// 依（日期, 訂單號）分組
///
/// - 日期遞增
/// - 同日訂單保持首次出現順序
/// - 訂單時間取該訂單第一行的時間
/// - 商品去重
pub fn group_orders(rows: &[OrderRow]) -> Vec<OrderDay> {
    let mut days: BTreeMap<NaiveDate, (Vec<ShopOrder>, HashMap<String, usize>)> = BTreeMap::new();

    for row in rows {
        let (orders, index) = days.entry(row.datetime.date()).or_default();

        match index.get(&row.order_id).copied() {
            Some(position) => {
                orders[position].products.insert(row.product_id.clone());
            }
            None => {
                index.insert(row.order_id.clone(), orders.len());
                orders.push(ShopOrder {
                    order_id: row.order_id.clone(),
                    order_datetime: row.datetime,
                    products: BTreeSet::from([row.product_id.clone()]),
                });
            }
        }
    }

    days.into_iter()
        .map(|(date, (orders, _))| OrderDay { date, orders })
        .collect()
}
