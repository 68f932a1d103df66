// ==========================================
// 种植托盘分配引擎 - 导入分配编排器
// ==========================================
// 用途: 协调 建议 → 人工调整 → 校验 → 落位 的导入流程
// 红线: 校验未通过时拒绝落位
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::{AllocatorConfig, SuggestionPolicy};
use crate::domain::allocation::{AllocationResult, TrayAssignment, ValidationReport};
use crate::domain::plant::PlantRecord;
use crate::engine::catalog::TrayCatalog;
use crate::engine::error::{AllocationError, EngineResult};
use crate::engine::suggestion::SuggestionEngine;
use crate::engine::tray_allocator::TrayAllocator;
use crate::engine::validator::AllocationValidator;

// ==========================================
// ImportPreview - 导入预览
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    pub assignments: Vec<TrayAssignment>,
    pub validation: ValidationReport,
}

// ==========================================
// ImportAllocationOrchestrator - 导入分配编排器
// ==========================================
#[derive(Debug, Clone)]
pub struct ImportAllocationOrchestrator {
    catalog: TrayCatalog,
    policy: SuggestionPolicy,
}

impl ImportAllocationOrchestrator {
    pub fn new(catalog: TrayCatalog, policy: SuggestionPolicy) -> Self {
        Self { catalog, policy }
    }

    /// 由配置构建 (目录不满足不变量时返回错误)
    pub fn from_config(config: &AllocatorConfig) -> EngineResult<Self> {
        let catalog = TrayCatalog::from_config(config)?;
        Ok(Self::new(catalog, config.suggestion.clone()))
    }

    /// 由 JSON 配置文件构建
    pub fn from_config_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let config = AllocatorConfig::from_file(path)?;
        Self::from_config(&config)
    }

    pub fn catalog(&self) -> &TrayCatalog {
        &self.catalog
    }

    fn suggestion_engine(&self) -> SuggestionEngine<'_> {
        SuggestionEngine::new(&self.catalog, self.policy.clone())
    }

    fn validator(&self) -> AllocationValidator<'_> {
        AllocationValidator::new(&self.catalog)
    }

    /// 生成初始建议并校验
    ///
    /// # 参数
    /// - plants: 待导入植株
    pub fn prepare(&self, plants: &[PlantRecord]) -> ImportPreview {
        info!(plants_count = plants.len(), "开始生成导入预览");

        let assignments = self.suggestion_engine().suggest(plants);
        let validation = self.validator().validate(plants, &assignments);

        ImportPreview {
            assignments,
            validation,
        }
    }

    /// 人工调整单株托盘类型并重新校验
    ///
    /// # 参数
    /// - plants: 待导入植株
    /// - preview: 当前预览 (会被修改)
    /// - index: 植株序号
    /// - tray_type: 新托盘类型; None 表示取消选择
    pub fn reassign(
        &self,
        plants: &[PlantRecord],
        preview: &mut ImportPreview,
        index: usize,
        tray_type: Option<&str>,
    ) -> EngineResult<()> {
        let len = preview.assignments.len();
        let assignment = preview
            .assignments
            .get_mut(index)
            .ok_or(AllocationError::IndexOutOfRange { index, len })?;

        debug!(index, from = ?assignment.tray_type, to = ?tray_type, "调整托盘类型");
        assignment.tray_type = tray_type.map(str::to_string);

        preview.validation = self.validator().validate(plants, &preview.assignments);
        Ok(())
    }

    /// 用最新建议覆盖当前方案
    pub fn apply_suggestions(&self, plants: &[PlantRecord], preview: &mut ImportPreview) {
        *preview = self.prepare(plants);
    }

    /// 确认导入: 校验通过才落位
    ///
    /// # 返回
    /// - Ok(AllocationResult): 落位结果
    /// - Err(AllocationError::InvalidAllocation): 校验未通过, 携带报告
    pub fn confirm(
        &self,
        plants: &[PlantRecord],
        assignments: &[TrayAssignment],
    ) -> EngineResult<AllocationResult> {
        let report = self.validator().validate(plants, assignments);
        if !report.is_valid {
            warn!(errors = ?report.error_messages(), "分配方案校验未通过, 拒绝导入");
            return Err(AllocationError::InvalidAllocation {
                report: Box::new(report),
            });
        }

        let result = TrayAllocator::new(&self.catalog).allocate(plants, assignments);
        info!(
            placed = result.placed_plants.len(),
            skipped = result.skipped.len(),
            "导入分配完成"
        );
        Ok(result)
    }
}

impl Default for ImportAllocationOrchestrator {
    fn default() -> Self {
        Self::new(TrayCatalog::standard().clone(), SuggestionPolicy::default())
    }
}
