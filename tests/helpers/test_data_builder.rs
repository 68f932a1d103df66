// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;
use serde_json::Value;
use tray_allocator::{PlantRecord, TrayAssignment};

// ==========================================
// PlantRecord 构建器
// ==========================================

pub struct PlantBuilder {
    plant: PlantRecord,
}

impl PlantBuilder {
    pub fn new(strain_number: u32) -> Self {
        let mut plant = PlantRecord::new(strain_number);
        plant.id = Some(strain_number.to_string());
        Self { plant }
    }

    pub fn keeper(mut self) -> Self {
        self.plant.is_keeper_pheno = true;
        self
    }

    pub fn clone_candidate(mut self) -> Self {
        self.plant.is_candidate_for_cloning = true;
        self
    }

    pub fn germinated(mut self, year: i32, month: u32, day: u32) -> Self {
        self.plant.germination_date = NaiveDate::from_ymd_opt(year, month, day);
        self
    }

    pub fn attribute(mut self, key: &str, value: Value) -> Self {
        self.plant.attributes.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> PlantRecord {
        self.plant
    }
}

// ==========================================
// 批量构建
// ==========================================

/// 编号 1..=count 的普通植株
pub fn standard_plants(count: u32) -> Vec<PlantRecord> {
    (1..=count).map(|n| PlantBuilder::new(n).build()).collect()
}

/// 全部分配到同一托盘类型
pub fn assign_all(count: usize, tray_type: &str) -> Vec<TrayAssignment> {
    (0..count)
        .map(|_| TrayAssignment::new(tray_type, "manual"))
        .collect()
}
