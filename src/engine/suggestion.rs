// ==========================================
// 种植托盘分配引擎 - 托盘建议引擎
// ==========================================
// 职责: 为植株列表提出托盘类型建议 (贪心 + 优先级)
// 规则: 优先植株先进圆盆/花槽, 普通植株先进大盘/小盘
// 红线: 全部已满时回落到偏好列表最后一个类型 (允许超配)
//       超配由校验器拦截, 建议阶段不做截断
// ==========================================

use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::config::SuggestionPolicy;
use crate::domain::allocation::TrayAssignment;
use crate::domain::plant::PlantRecord;
use crate::domain::tray::{TrayCapacity, TrayType};
use crate::engine::catalog::TrayCatalog;

// ==========================================
// SuggestionEngine - 托盘建议引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct SuggestionEngine<'a> {
    catalog: &'a TrayCatalog,
    policy: SuggestionPolicy,
}

impl<'a> SuggestionEngine<'a> {
    pub fn new(catalog: &'a TrayCatalog, policy: SuggestionPolicy) -> Self {
        Self { catalog, policy }
    }

    pub fn with_default_policy(catalog: &'a TrayCatalog) -> Self {
        Self::new(catalog, SuggestionPolicy::default())
    }

    pub fn policy(&self) -> &SuggestionPolicy {
        &self.policy
    }

    /// 生成建议 (与输入同序, 一株一条)
    ///
    /// 计数器每次调用从零开始
    #[instrument(skip_all, fields(plants_count = plants.len()))]
    pub fn suggest(&self, plants: &[PlantRecord]) -> Vec<TrayAssignment> {
        let premium_order = self.known_trays(&self.policy.premium_order);
        let standard_order = self.known_trays(&self.policy.standard_order);
        let mut counts: HashMap<&str, usize> = HashMap::new();

        let suggestions: Vec<TrayAssignment> = plants
            .iter()
            .enumerate()
            .map(|(index, plant)| {
                let order = if plant.is_premium() {
                    &premium_order
                } else {
                    &standard_order
                };

                TrayAssignment {
                    plant_index: Some(index),
                    plant_number: plant.strain_number,
                    tray_type: pick_tray(order, &mut counts),
                    reason: plant.placement_reason().to_string(),
                }
            })
            .collect();

        debug!(?counts, "托盘建议完成");
        suggestions
    }

    /// 单株建议预览 (独立计数器)
    pub fn suggest_one(&self, plant: &PlantRecord) -> TrayAssignment {
        self.suggest(std::slice::from_ref(plant))
            .pop()
            .unwrap_or_else(TrayAssignment::unassigned)
    }

    /// 偏好列表中目录存在的托盘 (保持偏好顺序)
    fn known_trays(&self, order: &[String]) -> Vec<&'a TrayType> {
        order
            .iter()
            .filter_map(|name| self.catalog.get(name))
            .collect()
    }
}

impl Default for SuggestionEngine<'static> {
    fn default() -> Self {
        Self::with_default_policy(TrayCatalog::standard())
    }
}

/// 依偏好顺序选第一个未满的托盘; 全满时取最后检查的托盘
fn pick_tray<'t>(order: &[&'t TrayType], counts: &mut HashMap<&'t str, usize>) -> Option<String> {
    let chosen: &'t TrayType = order
        .iter()
        .copied()
        .find(|tray| tray.can_accept(counts.get(tray.name()).copied().unwrap_or(0)))
        .or_else(|| order.last().copied())?;

    *counts.entry(chosen.name()).or_insert(0) += 1;
    Some(chosen.name().to_string())
}
