// ==========================================
// 种植托盘分配引擎 - 托盘领域模型
// ==========================================
// 职责: 槽位坐标、托盘类型、容量约束接口
// 红线: slots.len() == capacity, 槽位坐标两两不同
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::types::{LayoutKind, SlotRole};

// ==========================================
// SlotCoord - 槽位坐标
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotCoord {
    pub x: u16, // 列 (圆盆为外圈序号)
    pub y: u16, // 行
}

impl SlotCoord {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for SlotCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

// ==========================================
// Slot - 槽位
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub x: u16,
    pub y: u16,
    #[serde(rename = "label")]
    pub role: SlotRole,
}

impl Slot {
    pub fn cell(x: u16, y: u16) -> Self {
        Self { x, y, role: SlotRole::Cell }
    }

    pub fn coord(&self) -> SlotCoord {
        SlotCoord::new(self.x, self.y)
    }
}

// ==========================================
// TrayType - 托盘类型
// ==========================================
// 只能由 TrayCatalogBuilder 构造 (构造时校验不变量)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayType {
    name: String,            // 托盘名称 (Large/Small/Round/Planter)
    zone_type: String,       // 区域标识 (megalos-tray 等)
    layout_kind: LayoutKind, // 布局类型
    capacity: usize,         // 容量
    slots: Vec<Slot>,        // 有序槽位 (目录顺序 = 首次适配顺序)
}

impl TrayType {
    pub(crate) fn new(
        name: String,
        zone_type: String,
        layout_kind: LayoutKind,
        capacity: usize,
        slots: Vec<Slot>,
    ) -> Self {
        Self {
            name,
            zone_type,
            layout_kind,
            capacity,
            slots,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn zone_type(&self) -> &str {
        &self.zone_type
    }

    pub fn layout_kind(&self) -> LayoutKind {
        self.layout_kind
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

// ==========================================
// Trait: TrayCapacity
// ==========================================
// 用途: 建议/校验/统计共用的容量判断
pub trait TrayCapacity {
    /// 已占用 `used` 个槽位时是否还能再放一株
    fn can_accept(&self, used: usize) -> bool;

    /// 剩余槽位数（不会小于 0）
    fn available(&self, used: usize) -> usize;

    /// 使用率字符串, 保留一位小数, 如 "83.3%"
    fn utilization(&self, used: usize) -> String;
}

impl TrayCapacity for TrayType {
    fn can_accept(&self, used: usize) -> bool {
        used < self.capacity
    }

    fn available(&self, used: usize) -> usize {
        self.capacity.saturating_sub(used)
    }

    fn utilization(&self, used: usize) -> String {
        if self.capacity == 0 {
            return "0.0%".to_string();
        }
        // 千分比四舍五入 (0.5 进位)
        let permille = (used * 1000 + self.capacity / 2) / self.capacity;
        format!("{}.{}%", permille / 10, permille % 10)
    }
}
