// ==========================================
// 种植托盘分配引擎 - 分配结果领域模型
// ==========================================
// 职责: 分配方案、落位植株、使用统计、诊断问题
// 红线: 所有异常以结构化数据返回, 不抛出
// ==========================================

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::plant::PlantRecord;
use crate::domain::tray::{Slot, TrayType};

// 落位记录覆盖的字段, 从透传字段中剔除以免重复
const PLACEMENT_KEYS: [&str; 4] = ["zone", "position", "trayType", "allocationIndex"];

// ==========================================
// TrayAssignment - 托盘分配方案 (单株)
// ==========================================
// reason 仅供展示, 不影响落位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayAssignment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_index: Option<usize>, // 建议来源: 植株序号
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_number: Option<u32>, // 建议来源: 品系编号
    #[serde(default)]
    pub tray_type: Option<String>, // 托盘类型名称
    #[serde(default)]
    pub reason: String, // 分配原因
}

impl TrayAssignment {
    /// 人工指定托盘类型
    pub fn new(tray_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            plant_index: None,
            plant_number: None,
            tray_type: Some(tray_type.into()),
            reason: reason.into(),
        }
    }

    /// 未选择托盘
    pub fn unassigned() -> Self {
        Self {
            plant_index: None,
            plant_number: None,
            tray_type: None,
            reason: String::new(),
        }
    }

    /// 托盘类型名称; 空白视为未分配
    pub fn tray_name(&self) -> Option<&str> {
        self.tray_type
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

// ==========================================
// PlacedPlant - 已落位植株
// ==========================================
// 由原植株记录派生, 不修改调用方数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedPlant {
    #[serde(flatten)]
    pub plant: PlantRecord,
    pub tray_type: String,       // 托盘类型名称
    pub zone: String,            // 区域标识
    pub position: Slot,          // 落位槽位
    pub allocation_index: usize, // 输入序列中的原始位置
}

impl PlacedPlant {
    pub fn new(plant: &PlantRecord, tray: &TrayType, position: Slot, allocation_index: usize) -> Self {
        let mut plant = plant.clone();
        for key in PLACEMENT_KEYS {
            plant.attributes.remove(key);
        }

        Self {
            plant,
            tray_type: tray.name().to_string(),
            zone: tray.zone_type().to_string(),
            position,
            allocation_index,
        }
    }
}

// ==========================================
// TrayUsage - 单个托盘类型的使用统计
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrayUsage {
    pub used: usize,
    pub capacity: usize,
    pub available: usize,
    pub utilization: String, // 如 "83.3%"
}

// ==========================================
// AllocationIssue - 分配问题分类
// ==========================================
// 校验器: 错误/警告; 分配引擎: 跳过原因
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum AllocationIssue {
    #[error("数量不一致: {plants} 株植株, {assignments} 条分配")]
    LengthMismatch { plants: usize, assignments: usize },

    #[error("{tray_type} 托盘容量超限: {requested}/{capacity} 株")]
    CapacityExceeded {
        tray_type: String,
        requested: usize,
        capacity: usize,
    },

    #[error("植株 {plant} 未分配托盘")]
    UnassignedItem { plant: String },

    #[error("未知托盘类型: {tray_type} (植株 {plant})")]
    UnknownContainerType { tray_type: String, plant: String },

    #[error("{tray_type} 托盘无可用槽位 (植株 {plant})")]
    ContainerFull { tray_type: String, plant: String },
}

impl AllocationIssue {
    /// 问题代码 (与序列化 kind 一致)
    pub fn code(&self) -> &'static str {
        match self {
            AllocationIssue::LengthMismatch { .. } => "LENGTH_MISMATCH",
            AllocationIssue::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            AllocationIssue::UnassignedItem { .. } => "UNASSIGNED_ITEM",
            AllocationIssue::UnknownContainerType { .. } => "UNKNOWN_CONTAINER_TYPE",
            AllocationIssue::ContainerFull { .. } => "CONTAINER_FULL",
        }
    }
}

// ==========================================
// SkippedPlant - 未落位植株
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedPlant {
    pub source_index: usize, // 输入序列中的位置
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_number: Option<u32>, // 品系编号
    pub issue: AllocationIssue, // 跳过原因
}

impl SkippedPlant {
    pub fn new(source_index: usize, plant: &PlantRecord, issue: AllocationIssue) -> Self {
        Self {
            source_index,
            plant_number: plant.strain_number,
            issue,
        }
    }
}

// ==========================================
// AllocationResult - 分配结果
// ==========================================
// tray_usage / summary 按目录顺序列出全部托盘类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    pub placed_plants: Vec<PlacedPlant>,
    pub tray_usage: IndexMap<String, Vec<Slot>>,
    pub summary: IndexMap<String, TrayUsage>,
    pub skipped: Vec<SkippedPlant>,
}

impl AllocationResult {
    /// 是否所有植株都已落位
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// 指定托盘类型的已落位植株
    pub fn placed_in<'a>(&'a self, tray_type: &'a str) -> impl Iterator<Item = &'a PlacedPlant> + 'a {
        self.placed_plants
            .iter()
            .filter(move |placed| placed.tray_type == tray_type)
    }
}

// ==========================================
// ValidationReport - 分配方案校验报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<AllocationIssue>,
    pub warnings: Vec<AllocationIssue>,
    pub tray_type_counts: IndexMap<String, usize>,
}

impl ValidationReport {
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::LayoutKind;
    use serde_json::json;

    #[test]
    fn test_tray_name_treats_blank_as_unassigned() {
        assert_eq!(TrayAssignment::new("Large", "").tray_name(), Some("Large"));
        assert_eq!(TrayAssignment::new("  ", "").tray_name(), None);
        assert_eq!(TrayAssignment::unassigned().tray_name(), None);
    }

    #[test]
    fn test_placed_plant_overrides_stale_position() {
        let mut plant = PlantRecord::new(3);
        plant.attributes.insert("zone".to_string(), json!("zardiniera"));
        plant.attributes.insert("position".to_string(), json!({ "x": 9, "y": 9 }));
        plant.attributes.insert("height".to_string(), json!(0.8));

        let tray = TrayType::new(
            "Small".to_string(),
            "mikros-tray".to_string(),
            LayoutKind::Grid,
            1,
            vec![Slot::cell(0, 0)],
        );
        let placed = PlacedPlant::new(&plant, &tray, Slot::cell(0, 0), 4);

        let value = serde_json::to_value(&placed).unwrap();
        assert_eq!(value["zone"], json!("mikros-tray"));
        assert_eq!(value["position"], json!({ "x": 0, "y": 0, "label": "cell" }));
        assert_eq!(value["trayType"], json!("Small"));
        assert_eq!(value["allocationIndex"], json!(4));
        assert_eq!(value["height"], json!(0.8));
        // 原始记录不变
        assert_eq!(plant.attributes["zone"], json!("zardiniera"));
    }

    #[test]
    fn test_issue_serializes_with_kind_tag() {
        let issue = AllocationIssue::CapacityExceeded {
            tray_type: "Large".to_string(),
            requested: 11,
            capacity: 10,
        };
        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["kind"], json!(issue.code()));
        assert_eq!(value["trayType"], json!("Large"));
        assert_eq!(issue.to_string(), "Large 托盘容量超限: 11/10 株");
    }
}
