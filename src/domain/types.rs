// ==========================================
// 种植托盘分配引擎 - 领域类型定义
// ==========================================
// 职责: 托盘布局类型、槽位角色、分配原因
// 序列化格式: kebab-case (与前端存储一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 布局类型 (Layout Kind)
// ==========================================
// 槽位坐标由布局类型 + 形状参数确定性生成
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    Grid,     // 矩形网格 (行优先)
    Circular, // 圆形: 1 个中心 + N 个外圈
    Planter,  // 不规则花槽: 每行列范围不同
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutKind::Grid => write!(f, "grid"),
            LayoutKind::Circular => write!(f, "circular"),
            LayoutKind::Planter => write!(f, "planter"),
        }
    }
}

// ==========================================
// 槽位角色 (Slot Role)
// ==========================================
// 仅用于展示; 占用判断只看坐标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotRole {
    Cell,      // 网格/花槽格位
    Center,    // 圆盆中心
    Perimeter, // 圆盆外圈
}

impl fmt::Display for SlotRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotRole::Cell => write!(f, "cell"),
            SlotRole::Center => write!(f, "center"),
            SlotRole::Perimeter => write!(f, "perimeter"),
        }
    }
}

// ==========================================
// 建议原因 (Placement Reason)
// ==========================================
// 仅供展示, 不影响落位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementReason {
    #[serde(rename = "Keeper phenotype")]
    KeeperPheno, // 保留表型
    #[serde(rename = "Clone candidate")]
    CloneCandidate, // 扦插候选
    #[serde(rename = "Standard allocation")]
    Standard, // 普通分配
}

impl fmt::Display for PlacementReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementReason::KeeperPheno => write!(f, "Keeper phenotype"),
            PlacementReason::CloneCandidate => write!(f, "Clone candidate"),
            PlacementReason::Standard => write!(f, "Standard allocation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_kind_serde() {
        let json = serde_json::to_string(&LayoutKind::Planter).unwrap();
        assert_eq!(json, "\"planter\"");
        let kind: LayoutKind = serde_json::from_str("\"circular\"").unwrap();
        assert_eq!(kind, LayoutKind::Circular);
    }

    #[test]
    fn test_placement_reason_display_matches_serde() {
        for reason in [
            PlacementReason::KeeperPheno,
            PlacementReason::CloneCandidate,
            PlacementReason::Standard,
        ] {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason));
        }
    }
}
