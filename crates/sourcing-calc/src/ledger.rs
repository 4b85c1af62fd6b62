//! 包裝線產能帳本

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sourcing_core::{PackLineKey, SourcingError, SourcingOption, WarehouseCatalog};
use std::collections::BTreeMap;

/// 單條包裝線的產能記錄
///
/// 不變式：`0 <= available_capacity <= capacity`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityEntry {
    capacity: u32,
    available_capacity: u32,
}

impl CapacityEntry {
    fn new(capacity: u32) -> Self {
        Self {
            capacity,
            available_capacity: capacity,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn available_capacity(&self) -> u32 {
        self.available_capacity
    }

    /// 已使用產能
    pub fn consumed(&self) -> u32 {
        self.capacity - self.available_capacity
    }

    /// 使用率（0 ~ 1）
    pub fn utilization(&self) -> Decimal {
        if self.capacity == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.consumed()) / Decimal::from(self.capacity)
    }

    pub fn is_available(&self, amount: u32) -> bool {
        self.available_capacity >= amount
    }

    fn reset(&mut self) {
        self.available_capacity = self.capacity;
    }
}

/// 產能帳本
///
/// 只能透過 [`is_available`](Self::is_available)、[`consume`](Self::consume)
/// 與 [`reset_all`](Self::reset_all) 讀寫，不對外暴露內部映射。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityLedger {
    entries: BTreeMap<PackLineKey, CapacityEntry>,
}

impl CapacityLedger {
    /// 為目錄中每條包裝線建立滿產能記錄
    pub fn new(catalog: &WarehouseCatalog) -> Self {
        let entries = catalog
            .pack_lines()
            .map(|pl| (pl.key().clone(), CapacityEntry::new(pl.capacity())))
            .collect();
        Self { entries }
    }

    /// 可用產能是否足夠（未知的包裝線一律不可用）
    pub fn is_available(&self, key: &PackLineKey, amount: u32) -> bool {
        self.entries
            .get(key)
            .map(|entry| entry.is_available(amount))
            .unwrap_or(false)
    }

    pub fn available_capacity(&self, key: &PackLineKey) -> Option<u32> {
        self.entries.get(key).map(CapacityEntry::available_capacity)
    }

    /// 扣減選定方案的產能
    ///
    /// 先檢查全部出貨行再一次寫入；任何一條包裝線不足即回傳錯誤且帳本不變。
    /// 產能不足代表呼叫端略過了可用性檢查，屬於程式錯誤。
    pub fn consume(&mut self, option: &SourcingOption) -> sourcing_core::Result<()> {
        let mut requested: BTreeMap<&PackLineKey, u32> = BTreeMap::new();
        for line in &option.warehouse_orders {
            *requested.entry(&line.pack_line).or_insert(0) += line.quantity();
        }

        for (&key, &amount) in &requested {
            let entry = self
                .entries
                .get(key)
                .ok_or_else(|| SourcingError::UnknownPackLine(key.to_string()))?;

            if !entry.is_available(amount) {
                debug_assert!(false, "包裝線 {} 產能透支", key);
                return Err(SourcingError::CapacityOverdrawn {
                    pack_line: key.to_string(),
                    available: entry.available_capacity,
                    requested: amount,
                });
            }
        }

        for (key, amount) in requested {
            if let Some(entry) = self.entries.get_mut(key) {
                entry.available_capacity -= amount;
            }
        }

        Ok(())
    }

    /// 所有包裝線恢復滿產能（每日切換時呼叫）
    pub fn reset_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.reset();
        }
    }

    /// 唯讀檢視所有記錄
    pub fn entries(&self) -> impl Iterator<Item = (&PackLineKey, &CapacityEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
