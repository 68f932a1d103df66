// ==========================================
// 种植托盘分配引擎 - 引擎层
// ==========================================
// 职责: 目录构建、落位、校验、建议、导入编排
// 红线: 引擎无跨调用状态, 所有规则输出原因
// ==========================================

pub mod catalog;
pub mod error;
pub mod orchestrator;
pub mod suggestion;
pub mod tray_allocator;
pub mod validator;

// 重导出核心引擎
pub use catalog::{generate_slots, TrayCatalog, TrayCatalogBuilder};
pub use error::{AllocationError, CatalogError, EngineResult};
pub use orchestrator::{ImportAllocationOrchestrator, ImportPreview};
pub use suggestion::SuggestionEngine;
pub use tray_allocator::TrayAllocator;
pub use validator::AllocationValidator;
