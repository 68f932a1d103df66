// ==========================================
// 种植托盘分配引擎 - 配置层
// ==========================================
// 职责: 托盘目录与建议偏好配置, 支持 JSON 覆写
// ==========================================

pub mod error;
pub mod tray_config;

// 重导出核心配置类型
pub use error::{ConfigError, ConfigResult};
pub use tray_config::{
    standard_trays, tray_names, zone_types, AllocatorConfig, PlanterRowConfig, SuggestionPolicy,
    TrayConfig, TrayLayoutConfig,
};
