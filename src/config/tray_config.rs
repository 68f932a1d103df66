// ==========================================
// 种植托盘分配引擎 - 托盘目录配置
// ==========================================
// 职责: 托盘形状/容量/建议偏好的可序列化配置
// 格式: JSON (camelCase), 缺省字段回落到标准目录
// ==========================================

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::LayoutKind;

// ==========================================
// 标准托盘名称与区域标识
// ==========================================
pub mod tray_names {
    pub const LARGE: &str = "Large";
    pub const SMALL: &str = "Small";
    pub const ROUND: &str = "Round";
    pub const PLANTER: &str = "Planter";
}

pub mod zone_types {
    pub const MEGALOS_TRAY: &str = "megalos-tray";
    pub const MIKROS_TRAY: &str = "mikros-tray";
    pub const MEGALA_GLASTRAKLA: &str = "megala-glastrakla";
    pub const ZARDINIERA: &str = "zardiniera";
}

/// 圆盆默认外圈槽位数
pub const DEFAULT_PERIMETER: u16 = 6;

fn default_perimeter() -> u16 {
    DEFAULT_PERIMETER
}

// ==========================================
// TrayLayoutConfig - 布局形状参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TrayLayoutConfig {
    /// 矩形网格 rows × cols
    Grid { rows: u16, cols: u16 },
    /// 1 个中心 + perimeter 个外圈
    Circular {
        #[serde(default = "default_perimeter")]
        perimeter: u16,
    },
    /// 每行独立列范围
    Planter { rows: Vec<PlanterRowConfig> },
}

impl TrayLayoutConfig {
    pub fn kind(&self) -> LayoutKind {
        match self {
            TrayLayoutConfig::Grid { .. } => LayoutKind::Grid,
            TrayLayoutConfig::Circular { .. } => LayoutKind::Circular,
            TrayLayoutConfig::Planter { .. } => LayoutKind::Planter,
        }
    }
}

/// 花槽单行: 列范围 [col_start, col_end] (闭区间)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanterRowConfig {
    pub row: u16,
    pub col_start: u16,
    pub col_end: u16,
}

impl PlanterRowConfig {
    pub fn new(row: u16, col_start: u16, col_end: u16) -> Self {
        Self {
            row,
            col_start,
            col_end,
        }
    }
}

// ==========================================
// TrayConfig - 单个托盘类型配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayConfig {
    pub name: String,
    pub zone_type: String,
    pub layout: TrayLayoutConfig,
    pub capacity: usize, // 声明容量, 构建目录时与槽位数核对
}

impl TrayConfig {
    pub fn grid(name: &str, zone_type: &str, rows: u16, cols: u16) -> Self {
        Self {
            name: name.to_string(),
            zone_type: zone_type.to_string(),
            layout: TrayLayoutConfig::Grid { rows, cols },
            capacity: rows as usize * cols as usize,
        }
    }

    pub fn circular(name: &str, zone_type: &str, perimeter: u16) -> Self {
        Self {
            name: name.to_string(),
            zone_type: zone_type.to_string(),
            layout: TrayLayoutConfig::Circular { perimeter },
            capacity: 1 + perimeter as usize,
        }
    }

    pub fn planter(name: &str, zone_type: &str, rows: Vec<PlanterRowConfig>) -> Self {
        let capacity = rows
            .iter()
            .map(|r| (r.col_end as usize + 1).saturating_sub(r.col_start as usize))
            .sum();
        Self {
            name: name.to_string(),
            zone_type: zone_type.to_string(),
            layout: TrayLayoutConfig::Planter { rows },
            capacity,
        }
    }

    /// 覆写声明容量
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

// ==========================================
// SuggestionPolicy - 建议偏好顺序
// ==========================================
// 全部已满时回落到列表最后一个 (允许超配, 由校验器拦截)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionPolicy {
    /// 优先植株: 圆盆 > 花槽 > 大盘 > 小盘
    #[serde(default = "default_premium_order")]
    pub premium_order: Vec<String>,

    /// 普通植株: 大盘 > 小盘 > 花槽 > 圆盆
    #[serde(default = "default_standard_order")]
    pub standard_order: Vec<String>,
}

fn default_premium_order() -> Vec<String> {
    [
        tray_names::ROUND,
        tray_names::PLANTER,
        tray_names::LARGE,
        tray_names::SMALL,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_standard_order() -> Vec<String> {
    [
        tray_names::LARGE,
        tray_names::SMALL,
        tray_names::PLANTER,
        tray_names::ROUND,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for SuggestionPolicy {
    fn default() -> Self {
        Self {
            premium_order: default_premium_order(),
            standard_order: default_standard_order(),
        }
    }
}

// ==========================================
// AllocatorConfig - 分配器配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocatorConfig {
    #[serde(default = "standard_trays")]
    pub trays: Vec<TrayConfig>,

    #[serde(default)]
    pub suggestion: SuggestionPolicy,
}

/// 标准托盘目录: 大盘 2×5, 小盘 2×3, 圆盆 1+6, 花槽 7/3/7
pub fn standard_trays() -> Vec<TrayConfig> {
    vec![
        TrayConfig::grid(tray_names::LARGE, zone_types::MEGALOS_TRAY, 2, 5),
        TrayConfig::grid(tray_names::SMALL, zone_types::MIKROS_TRAY, 2, 3),
        TrayConfig::circular(
            tray_names::ROUND,
            zone_types::MEGALA_GLASTRAKLA,
            DEFAULT_PERIMETER,
        ),
        TrayConfig::planter(
            tray_names::PLANTER,
            zone_types::ZARDINIERA,
            vec![
                PlanterRowConfig::new(0, 0, 6),
                PlanterRowConfig::new(1, 2, 4),
                PlanterRowConfig::new(2, 0, 6),
            ],
        ),
    ]
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            trays: standard_trays(),
            suggestion: SuggestionPolicy::default(),
        }
    }
}

impl AllocatorConfig {
    /// 从 JSON 字符串加载
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 从 JSON 文件加载
    ///
    /// # 参数
    /// - path: 配置文件路径
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        tracing::debug!(path = %path.display(), trays = config.trays.len(), "托盘配置已加载");
        Ok(config)
    }

    /// 序列化为格式化 JSON
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_capacities() {
        let trays = standard_trays();
        let capacities: Vec<(&str, usize)> =
            trays.iter().map(|t| (t.name.as_str(), t.capacity)).collect();
        assert_eq!(
            capacities,
            vec![("Large", 10), ("Small", 6), ("Round", 7), ("Planter", 17)]
        );
    }

    #[test]
    fn test_empty_json_falls_back_to_defaults() {
        let config = AllocatorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AllocatorConfig::default());
    }

    #[test]
    fn test_parse_layouts() {
        let json = r#"{
            "trays": [
                { "name": "Pot", "zoneType": "pot", "capacity": 5,
                  "layout": { "kind": "circular", "perimeter": 4 } },
                { "name": "Box", "zoneType": "box", "capacity": 4,
                  "layout": { "kind": "planter", "rows": [
                      { "row": 0, "colStart": 1, "colEnd": 2 },
                      { "row": 1, "colStart": 0, "colEnd": 1 } ] } }
            ],
            "suggestion": { "premiumOrder": ["Pot"] }
        }"#;
        let config = AllocatorConfig::from_json_str(json).unwrap();
        assert_eq!(config.trays[0].layout, TrayLayoutConfig::Circular { perimeter: 4 });
        assert_eq!(config.trays[1].layout.kind(), LayoutKind::Planter);
        assert_eq!(config.suggestion.premium_order, vec!["Pot".to_string()]);
        assert_eq!(config.suggestion.standard_order, default_standard_order());
    }

    #[test]
    fn test_circular_perimeter_defaults_to_six() {
        let layout: TrayLayoutConfig = serde_json::from_str(r#"{ "kind": "circular" }"#).unwrap();
        assert_eq!(layout, TrayLayoutConfig::Circular { perimeter: 6 });
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = AllocatorConfig::from_json_str("{ \"trays\": 3 }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
