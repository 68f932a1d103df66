// ==========================================
// 种植托盘分配引擎 - 分配方案校验器
// ==========================================
// 职责: 按数量校验分配方案 (不实际落位)
// 错误: 数量不一致、托盘容量超限
// 警告: 未选择托盘、未知托盘类型
// 说明: 校验比落位更严格 (落位容忍长度不一致)
// ==========================================

use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::domain::allocation::{AllocationIssue, TrayAssignment, ValidationReport};
use crate::domain::plant::PlantRecord;
use crate::engine::catalog::TrayCatalog;

// ==========================================
// AllocationValidator - 分配方案校验器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct AllocationValidator<'a> {
    catalog: &'a TrayCatalog,
}

impl<'a> AllocationValidator<'a> {
    pub fn new(catalog: &'a TrayCatalog) -> Self {
        Self { catalog }
    }

    /// 校验分配方案
    ///
    /// # 参数
    /// - `plants`: 植株列表 (仅用于长度与标签)
    /// - `assignments`: 分配方案
    ///
    /// # 返回
    /// 校验报告; `is_valid` 仅由 errors 决定
    #[instrument(skip_all, fields(
        plants_count = plants.len(),
        assignments_count = assignments.len()
    ))]
    pub fn validate(
        &self,
        plants: &[PlantRecord],
        assignments: &[TrayAssignment],
    ) -> ValidationReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        // 1. 数量一致性
        if assignments.len() != plants.len() {
            errors.push(AllocationIssue::LengthMismatch {
                plants: plants.len(),
                assignments: assignments.len(),
            });
        }

        // 2. 按托盘类型计数 (首次出现顺序)
        let mut tray_type_counts: IndexMap<String, usize> = IndexMap::new();
        for assignment in assignments {
            if let Some(name) = assignment.tray_name() {
                *tray_type_counts.entry(name.to_string()).or_insert(0) += 1;
            }
        }

        // 3. 容量上限
        for (name, &count) in &tray_type_counts {
            match self.catalog.capacity_of(name) {
                Some(capacity) if count > capacity => {
                    errors.push(AllocationIssue::CapacityExceeded {
                        tray_type: name.clone(),
                        requested: count,
                        capacity,
                    });
                }
                Some(_) => {}
                None => {
                    // 未知类型: 落位时会被跳过, 这里只提示
                    let plants_named = assignments
                        .iter()
                        .enumerate()
                        .filter(|(_, a)| a.tray_name() == Some(name.as_str()))
                        .map(|(index, _)| plant_label(plants, index))
                        .collect::<Vec<_>>()
                        .join(", ");
                    warnings.push(AllocationIssue::UnknownContainerType {
                        tray_type: name.clone(),
                        plant: plants_named,
                    });
                }
            }
        }

        // 4. 未分配植株
        for (index, assignment) in assignments.iter().enumerate() {
            if assignment.tray_name().is_none() {
                warnings.push(AllocationIssue::UnassignedItem {
                    plant: plant_label(plants, index),
                });
            }
        }

        let is_valid = errors.is_empty();
        debug!(
            is_valid,
            errors = errors.len(),
            warnings = warnings.len(),
            "分配方案校验完成"
        );

        ValidationReport {
            is_valid,
            errors,
            warnings,
            tray_type_counts,
        }
    }
}

impl Default for AllocationValidator<'static> {
    fn default() -> Self {
        Self::new(TrayCatalog::standard())
    }
}

/// 植株标签: 品系编号, 缺失或越界时为 index + 1
fn plant_label(plants: &[PlantRecord], index: usize) -> String {
    plants
        .get(index)
        .map(|plant| plant.label(index))
        .unwrap_or_else(|| (index + 1).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plants(count: u32) -> Vec<PlantRecord> {
        (1..=count).map(PlantRecord::new).collect()
    }

    #[test]
    fn test_valid_assignment() {
        let validator = AllocationValidator::default();
        let assignments = vec![
            TrayAssignment::new("Large", ""),
            TrayAssignment::new("Large", ""),
            TrayAssignment::new("Round", ""),
        ];
        let report = validator.validate(&plants(3), &assignments);

        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.tray_type_counts["Large"], 2);
        assert_eq!(report.tray_type_counts["Round"], 1);
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let validator = AllocationValidator::default();
        let report = validator.validate(&plants(3), &[TrayAssignment::new("Large", "")]);

        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec![AllocationIssue::LengthMismatch {
                plants: 3,
                assignments: 1,
            }]
        );
    }

    #[test]
    fn test_capacity_exceeded_is_error() {
        let validator = AllocationValidator::default();
        let assignments: Vec<TrayAssignment> =
            (0..7).map(|_| TrayAssignment::new("Small", "")).collect();
        let report = validator.validate(&plants(7), &assignments);

        assert!(!report.is_valid);
        assert_eq!(report.error_messages(), vec!["Small 托盘容量超限: 7/6 株".to_string()]);
    }

    #[test]
    fn test_unassigned_is_warning_only() {
        let validator = AllocationValidator::default();
        let mut list = plants(2);
        list[1].strain_number = None;
        let assignments = vec![TrayAssignment::unassigned(), TrayAssignment::new("", "")];
        let report = validator.validate(&list, &assignments);

        assert!(report.is_valid);
        assert_eq!(
            report.warnings,
            vec![
                AllocationIssue::UnassignedItem { plant: "1".to_string() },
                AllocationIssue::UnassignedItem { plant: "2".to_string() },
            ]
        );
        assert!(report.tray_type_counts.is_empty());
    }

    #[test]
    fn test_unknown_tray_is_warning() {
        let validator = AllocationValidator::default();
        let assignments = vec![
            TrayAssignment::new("Giant", ""),
            TrayAssignment::new("Large", ""),
            TrayAssignment::new("Giant", ""),
        ];
        let report = validator.validate(&plants(3), &assignments);

        assert!(report.is_valid);
        assert_eq!(report.tray_type_counts["Giant"], 2);
        assert_eq!(
            report.warnings,
            vec![AllocationIssue::UnknownContainerType {
                tray_type: "Giant".to_string(),
                plant: "1, 3".to_string(),
            }]
        );
    }
}
