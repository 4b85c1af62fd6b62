//! 客戶訂單模型

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 客戶訂單（已依日期與訂單號分組）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopOrder {
    /// 訂單號
    pub order_id: String,

    /// 下單時間
    pub order_datetime: NaiveDateTime,

    /// 請求的商品（已去重）
    pub products: BTreeSet<String>,
}

impl ShopOrder {
    /// 創建新的訂單
    pub fn new<I, P>(order_id: impl Into<String>, order_datetime: NaiveDateTime, products: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            order_id: order_id.into(),
            order_datetime,
            products: products.into_iter().map(Into::into).collect(),
        }
    }

    /// 下單日期
    pub fn order_date(&self) -> NaiveDate {
        self.order_datetime.date()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_order_deduplicates_products() {
        let datetime = NaiveDate::from_ymd_opt(2025, 11, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let order = ShopOrder::new("SO-001", datetime, ["P1", "P2", "P1"]);

        assert_eq!(order.order_id, "SO-001");
        assert_eq!(order.product_count(), 2);
        assert_eq!(order.order_date(), NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
    }
}
