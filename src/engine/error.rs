// ==========================================
// 种植托盘分配引擎 - 引擎层错误类型
// ==========================================
// 职责: 目录构建错误 (静态配置缺陷) 与导入确认错误
// 说明: 分配过程中的异常不走错误通道, 见 AllocationIssue
// ==========================================

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::allocation::ValidationReport;
use crate::domain::tray::SlotCoord;

/// 托盘目录构建错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("托盘名称为空")]
    EmptyName,

    #[error("托盘类型重复: {0}")]
    DuplicateTray(String),

    #[error("{name} 托盘容量为 0")]
    EmptyTray { name: String },

    #[error("{name} 托盘槽位数与声明容量不一致: 声明 {declared}, 实际 {actual}")]
    CapacityMismatch {
        name: String,
        declared: usize,
        actual: usize,
    },

    #[error("{name} 托盘槽位坐标重复: {coord}")]
    DuplicateSlot { name: String, coord: SlotCoord },

    #[error("{name} 花槽第 {row} 行列范围无效: {col_start}..={col_end}")]
    InvalidRowRange {
        name: String,
        row: u16,
        col_start: u16,
        col_end: u16,
    },
}

/// 导入分配流程错误
#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("分配方案校验未通过: {}", .report.error_messages().join("; "))]
    InvalidAllocation { report: Box<ValidationReport> },

    #[error("植株序号超出范围: index={index}, len={len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, AllocationError>;
