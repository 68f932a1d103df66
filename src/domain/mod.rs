// ==========================================
// 种植托盘分配引擎 - 领域模型层
// ==========================================
// 职责: 定义植株、托盘、分配结果等纯值类型
// 红线: 不含引擎逻辑, 不含配置加载
// ==========================================

pub mod allocation;
pub mod plant;
pub mod tray;
pub mod types;

// 重导出核心类型
pub use allocation::{
    AllocationIssue, AllocationResult, PlacedPlant, SkippedPlant, TrayAssignment, TrayUsage,
    ValidationReport,
};
pub use plant::PlantRecord;
pub use tray::{Slot, SlotCoord, TrayCapacity, TrayType};
pub use types::{LayoutKind, PlacementReason, SlotRole};
