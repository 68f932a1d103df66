// ==========================================
// 种植托盘分配引擎 - 核心库
// ==========================================
// 职责: 植株 → 托盘槽位的确定性分配
// 组成: 托盘目录 / 落位引擎 / 校验器 / 建议引擎
// 边界: 不含渲染、文件解析、持久化
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 值类型
pub mod domain;

// 引擎层 - 分配规则
pub mod engine;

// 配置层 - 托盘目录配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AllocationIssue, AllocationResult, LayoutKind, PlacedPlant, PlacementReason, PlantRecord,
    SkippedPlant, Slot, SlotCoord, SlotRole, TrayAssignment, TrayCapacity, TrayType, TrayUsage,
    ValidationReport,
};

// 引擎
pub use engine::{
    AllocationError, AllocationValidator, CatalogError, ImportAllocationOrchestrator,
    ImportPreview, SuggestionEngine, TrayAllocator, TrayCatalog, TrayCatalogBuilder,
};

// 配置
pub use config::{AllocatorConfig, ConfigError, SuggestionPolicy, TrayConfig, TrayLayoutConfig};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "种植托盘分配引擎";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
