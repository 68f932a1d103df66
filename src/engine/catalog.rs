// ==========================================
// 种植托盘分配引擎 - 托盘目录
// ==========================================
// 职责: 由布局配置确定性生成槽位, 构建不可变目录
// 红线: slots.len() == capacity, 槽位坐标两两不同
// 说明: 目录构建后只读; 标准目录首次使用时构建一次
// ==========================================

use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::config::{standard_trays, AllocatorConfig, TrayConfig, TrayLayoutConfig};
use crate::domain::tray::{Slot, TrayType};
use crate::domain::types::SlotRole;
use crate::engine::error::CatalogError;

static STANDARD_CATALOG: OnceLock<TrayCatalog> = OnceLock::new();

// ==========================================
// TrayCatalog - 托盘目录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayCatalog {
    trays: IndexMap<String, TrayType>, // 名称 → 托盘类型 (保持配置顺序)
}

impl TrayCatalog {
    pub fn builder() -> TrayCatalogBuilder {
        TrayCatalogBuilder::new()
    }

    /// 标准目录: Large / Small / Round / Planter
    ///
    /// 标准配置不满足目录不变量属于静态配置缺陷, 直接 panic
    pub fn standard() -> &'static TrayCatalog {
        STANDARD_CATALOG.get_or_init(|| {
            TrayCatalogBuilder::new()
                .trays(standard_trays())
                .build()
                .unwrap_or_else(|e| panic!("标准托盘目录配置错误: {}", e))
        })
    }

    /// 由分配器配置构建目录
    pub fn from_config(config: &AllocatorConfig) -> Result<Self, CatalogError> {
        TrayCatalogBuilder::new().trays(config.trays.iter().cloned()).build()
    }

    pub fn get(&self, name: &str) -> Option<&TrayType> {
        self.trays.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.trays.contains_key(name)
    }

    pub fn capacity_of(&self, name: &str) -> Option<usize> {
        self.get(name).map(TrayType::capacity)
    }

    /// 按目录顺序遍历
    pub fn trays(&self) -> impl Iterator<Item = &TrayType> {
        self.trays.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.trays.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.trays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trays.is_empty()
    }

    /// 目录总容量
    pub fn total_capacity(&self) -> usize {
        self.trays.values().map(TrayType::capacity).sum()
    }
}

// ==========================================
// TrayCatalogBuilder - 目录构建器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct TrayCatalogBuilder {
    configs: Vec<TrayConfig>,
}

impl TrayCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tray(mut self, config: TrayConfig) -> Self {
        self.configs.push(config);
        self
    }

    pub fn trays(mut self, configs: impl IntoIterator<Item = TrayConfig>) -> Self {
        self.configs.extend(configs);
        self
    }

    /// 构建目录并校验不变量
    ///
    /// # 返回
    /// - Ok(TrayCatalog): 所有托盘满足 槽位数 == 容量 且坐标不重复
    /// - Err(CatalogError): 第一个违反不变量的托盘
    pub fn build(self) -> Result<TrayCatalog, CatalogError> {
        let mut trays = IndexMap::with_capacity(self.configs.len());

        for config in self.configs {
            let name = config.name.trim().to_string();
            if name.is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if trays.contains_key(&name) {
                return Err(CatalogError::DuplicateTray(name));
            }

            let slots = generate_slots(&name, &config.layout)?;
            check_slots(&name, config.capacity, &slots)?;

            tracing::debug!(
                tray = %name,
                layout = %config.layout.kind(),
                capacity = config.capacity,
                "托盘类型已注册"
            );

            let tray = TrayType::new(
                name.clone(),
                config.zone_type,
                config.layout.kind(),
                config.capacity,
                slots,
            );
            trays.insert(name, tray);
        }

        Ok(TrayCatalog { trays })
    }
}

// ==========================================
// 槽位生成
// ==========================================

/// 按布局生成有序槽位
///
/// - 网格: 行在外层、列在内层, 坐标 (col, row)
/// - 圆盆: (0,0) 中心, 随后 (i+1, 0) 外圈
/// - 花槽: 按行声明顺序, 每行列从小到大
pub fn generate_slots(name: &str, layout: &TrayLayoutConfig) -> Result<Vec<Slot>, CatalogError> {
    let slots = match layout {
        TrayLayoutConfig::Grid { rows, cols } => (0..*rows)
            .flat_map(|row| (0..*cols).map(move |col| Slot::cell(col, row)))
            .collect(),
        TrayLayoutConfig::Circular { perimeter } => {
            let mut slots = Vec::with_capacity(*perimeter as usize + 1);
            slots.push(Slot {
                x: 0,
                y: 0,
                role: SlotRole::Center,
            });
            slots.extend((0..*perimeter).map(|i| Slot {
                x: i + 1,
                y: 0,
                role: SlotRole::Perimeter,
            }));
            slots
        }
        TrayLayoutConfig::Planter { rows } => {
            let mut slots = Vec::new();
            for spec in rows {
                if spec.col_start > spec.col_end {
                    return Err(CatalogError::InvalidRowRange {
                        name: name.to_string(),
                        row: spec.row,
                        col_start: spec.col_start,
                        col_end: spec.col_end,
                    });
                }
                slots.extend((spec.col_start..=spec.col_end).map(|col| Slot::cell(col, spec.row)));
            }
            slots
        }
    };

    Ok(slots)
}

fn check_slots(name: &str, capacity: usize, slots: &[Slot]) -> Result<(), CatalogError> {
    if capacity == 0 {
        return Err(CatalogError::EmptyTray {
            name: name.to_string(),
        });
    }
    if slots.len() != capacity {
        return Err(CatalogError::CapacityMismatch {
            name: name.to_string(),
            declared: capacity,
            actual: slots.len(),
        });
    }

    let mut seen = HashSet::with_capacity(slots.len());
    for slot in slots {
        if !seen.insert(slot.coord()) {
            return Err(CatalogError::DuplicateSlot {
                name: name.to_string(),
                coord: slot.coord(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{tray_names, PlanterRowConfig};
    use crate::domain::tray::SlotCoord;
    use crate::domain::types::LayoutKind;

    fn coords(tray: &TrayType) -> Vec<(u16, u16)> {
        tray.slots().iter().map(|s| (s.x, s.y)).collect()
    }

    // ==========================================
    // 标准目录
    // ==========================================

    #[test]
    fn test_standard_catalog_slot_count_invariant() {
        let catalog = TrayCatalog::standard();
        assert_eq!(catalog.len(), 4);
        for tray in catalog.trays() {
            assert_eq!(tray.slots().len(), tray.capacity(), "{}", tray.name());
            let unique: HashSet<SlotCoord> = tray.slots().iter().map(Slot::coord).collect();
            assert_eq!(unique.len(), tray.capacity(), "{}", tray.name());
        }
        assert_eq!(catalog.total_capacity(), 40);
    }

    #[test]
    fn test_standard_catalog_order_and_zones() {
        let catalog = TrayCatalog::standard();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["Large", "Small", "Round", "Planter"]);
        assert_eq!(catalog.get(tray_names::ROUND).unwrap().zone_type(), "megala-glastrakla");
        assert_eq!(catalog.get(tray_names::PLANTER).unwrap().layout_kind(), LayoutKind::Planter);
    }

    #[test]
    fn test_standard_catalog_is_shared() {
        assert!(std::ptr::eq(TrayCatalog::standard(), TrayCatalog::standard()));
    }

    #[test]
    fn test_grid_slots_are_row_major() {
        let catalog = TrayCatalog::standard();
        let small = catalog.get(tray_names::SMALL).unwrap();
        assert_eq!(
            coords(small),
            vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]
        );
    }

    #[test]
    fn test_circular_slots() {
        let round = TrayCatalog::standard().get(tray_names::ROUND).unwrap();
        assert_eq!(round.slots()[0].role, SlotRole::Center);
        assert_eq!((round.slots()[0].x, round.slots()[0].y), (0, 0));
        assert!(round.slots()[1..].iter().all(|s| s.role == SlotRole::Perimeter));
        assert_eq!(
            coords(round),
            vec![(0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (5, 0), (6, 0)]
        );
    }

    #[test]
    fn test_planter_rows() {
        let planter = TrayCatalog::standard().get(tray_names::PLANTER).unwrap();
        let slots = coords(planter);
        assert_eq!(slots.len(), 17);
        assert_eq!(&slots[7..10], &[(2, 1), (3, 1), (4, 1)]);
        assert_eq!(slots[10], (0, 2));
        assert_eq!(slots[16], (6, 2));
    }

    // ==========================================
    // 构建器校验
    // ==========================================

    #[test]
    fn test_builder_rejects_capacity_mismatch() {
        let err = TrayCatalog::builder()
            .tray(TrayConfig::grid("Large", "megalos-tray", 2, 5).with_capacity(12))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::CapacityMismatch {
                name: "Large".to_string(),
                declared: 12,
                actual: 10,
            }
        );
    }

    #[test]
    fn test_builder_rejects_duplicate_slots() {
        let err = TrayCatalog::builder()
            .tray(TrayConfig::planter(
                "Box",
                "box",
                vec![PlanterRowConfig::new(0, 0, 2), PlanterRowConfig::new(0, 2, 3)],
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateSlot { .. }));
    }

    #[test]
    fn test_builder_rejects_duplicate_names_and_empty_trays() {
        let err = TrayCatalog::builder()
            .tray(TrayConfig::grid("A", "a", 1, 1))
            .tray(TrayConfig::grid("A", "a", 1, 2))
            .build()
            .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateTray("A".to_string()));

        let err = TrayCatalog::builder()
            .tray(TrayConfig::grid("Empty", "e", 0, 3))
            .build()
            .unwrap_err();
        assert!(matches!(err, CatalogError::EmptyTray { .. }));

        let err = TrayCatalog::builder()
            .tray(TrayConfig::grid("  ", "e", 1, 1))
            .build()
            .unwrap_err();
        assert_eq!(err, CatalogError::EmptyName);
    }

    #[test]
    fn test_builder_rejects_inverted_row_range() {
        let err = TrayCatalog::builder()
            .tray(TrayConfig::planter("Box", "box", vec![PlanterRowConfig::new(1, 4, 2)]).with_capacity(1))
            .build()
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRowRange { row: 1, .. }));
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let config = AllocatorConfig::default();
        let first = TrayCatalog::from_config(&config).unwrap();
        let second = TrayCatalog::from_config(&config).unwrap();
        assert_eq!(first, second);
        assert_eq!(&first, TrayCatalog::standard());
    }
}
