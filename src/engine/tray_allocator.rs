// ==========================================
// 种植托盘分配引擎 - 托盘落位引擎
// ==========================================
// 职责: 按分配方案把植株放入对应托盘的第一个空槽位
// 输入: 植株列表 + 同序号的分配方案
// 输出: 落位植株 + 各托盘占用槽位 + 使用统计 + 跳过诊断
// 红线: 首次适配按目录槽位顺序, 结果完全确定; 不抛出, 不修改输入
// ==========================================

use indexmap::IndexMap;
use tracing::{debug, instrument, warn};

use crate::domain::allocation::{
    AllocationIssue, AllocationResult, PlacedPlant, SkippedPlant, TrayAssignment, TrayUsage,
};
use crate::domain::plant::PlantRecord;
use crate::domain::tray::{Slot, TrayCapacity};
use crate::engine::catalog::TrayCatalog;

// ==========================================
// TrayAllocator - 托盘落位引擎
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct TrayAllocator<'a> {
    catalog: &'a TrayCatalog,
}

impl<'a> TrayAllocator<'a> {
    pub fn new(catalog: &'a TrayCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a TrayCatalog {
        self.catalog
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行落位
    ///
    /// 规则:
    /// 1) 按输入顺序处理植株, 取同序号的分配方案 (两者长度可以不同)
    /// 2) 无方案/未选托盘 → 跳过 (UNASSIGNED_ITEM)
    /// 3) 托盘类型不在目录中 → 跳过 (UNKNOWN_CONTAINER_TYPE)
    /// 4) 托盘已满 → 跳过 (CONTAINER_FULL)
    /// 5) 否则落位到该托盘目录顺序中的第一个空槽位
    ///
    /// 每次调用的占用都从零开始, 不继承上一次调用
    ///
    /// # 参数
    /// - `plants`: 植株列表
    /// - `assignments`: 分配方案 (按序号与植株对应)
    #[instrument(skip_all, fields(
        plants_count = plants.len(),
        assignments_count = assignments.len()
    ))]
    pub fn allocate(
        &self,
        plants: &[PlantRecord],
        assignments: &[TrayAssignment],
    ) -> AllocationResult {
        let mut placed_plants = Vec::with_capacity(plants.len());
        let mut skipped = Vec::new();

        // 1. 初始化各托盘占用 (目录顺序)
        let mut tray_usage: IndexMap<String, Vec<Slot>> = self
            .catalog
            .names()
            .map(|name| (name.to_string(), Vec::new()))
            .collect();

        // 2. 逐株落位
        for (index, plant) in plants.iter().enumerate() {
            let Some(tray_name) = assignments.get(index).and_then(TrayAssignment::tray_name)
            else {
                let issue = AllocationIssue::UnassignedItem {
                    plant: plant.label(index),
                };
                warn!(index, "{}", issue);
                skipped.push(SkippedPlant::new(index, plant, issue));
                continue;
            };

            let (Some(tray), Some(used)) =
                (self.catalog.get(tray_name), tray_usage.get_mut(tray_name))
            else {
                let issue = AllocationIssue::UnknownContainerType {
                    tray_type: tray_name.to_string(),
                    plant: plant.label(index),
                };
                warn!(index, "{}", issue);
                skipped.push(SkippedPlant::new(index, plant, issue));
                continue;
            };

            // 槽位只按目录顺序依次占用, 已用数量即第一个空槽位的下标
            let Some(slot) = tray.slots().get(used.len()).copied() else {
                let issue = AllocationIssue::ContainerFull {
                    tray_type: tray_name.to_string(),
                    plant: plant.label(index),
                };
                warn!(index, "{}", issue);
                skipped.push(SkippedPlant::new(index, plant, issue));
                continue;
            };

            used.push(slot);
            placed_plants.push(PlacedPlant::new(plant, tray, slot, index));
        }

        // 3. 生成使用统计
        let summary = self.generate_summary(&tray_usage);

        debug!(
            placed = placed_plants.len(),
            skipped = skipped.len(),
            "托盘落位完成"
        );

        AllocationResult {
            placed_plants,
            tray_usage,
            summary,
            skipped,
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 生成使用统计
    ///
    /// # 参数
    /// - `tray_usage`: 托盘名称 → 已占用槽位
    ///
    /// # 返回
    /// 目录中存在的托盘的 used/capacity/available/utilization
    pub fn generate_summary(
        &self,
        tray_usage: &IndexMap<String, Vec<Slot>>,
    ) -> IndexMap<String, TrayUsage> {
        tray_usage
            .iter()
            .filter_map(|(name, slots)| {
                let tray = self.catalog.get(name)?;
                let used = slots.len();
                Some((
                    name.clone(),
                    TrayUsage {
                        used,
                        capacity: tray.capacity(),
                        available: tray.available(used),
                        utilization: tray.utilization(used),
                    },
                ))
            })
            .collect()
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for TrayAllocator<'static> {
    fn default() -> Self {
        Self::new(TrayCatalog::standard())
    }
}
