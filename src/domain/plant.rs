// ==========================================
// 种植托盘分配引擎 - 植株记录领域模型
// ==========================================
// 职责: 分配器所需的植株记录 (Item)
// 红线: 分配器只读取两个优先标志, 其余表型字段原样透传
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::types::PlacementReason;

// 带类型的字段键名 (与序列化名一致)
mod keys {
    pub const ID: &str = "id";
    pub const STRAIN_NUMBER: &str = "strainNumber";
    pub const IS_KEEPER_PHENO: &str = "isKeeperPheno";
    pub const IS_CANDIDATE_FOR_CLONING: &str = "isCandidateForCloning";
    pub const GERMINATION_DATE: &str = "germinationDate";
}

// ==========================================
// PlantRecord - 植株记录
// ==========================================
// 来源: 表格/JSON 导入 (外部协作方, 形状不保证)
// 反序列化从不失败: 类型不符的字段保留原值在 attributes 中
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Map<String, Value>")]
pub struct PlantRecord {
    // ===== 标识 =====
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>, // 植株ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strain_number: Option<u32>, // 品系编号 (表格行号)

    // ===== 优先标志 =====
    #[serde(skip_serializing_if = "is_false")]
    pub is_keeper_pheno: bool, // 保留表型
    #[serde(skip_serializing_if = "is_false")]
    pub is_candidate_for_cloning: bool, // 扦插候选

    // ===== 日期 =====
    #[serde(skip_serializing_if = "Option::is_none")]
    pub germination_date: Option<NaiveDate>, // 发芽日期

    // ===== 其他表型字段 (透传) =====
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl From<Map<String, Value>> for PlantRecord {
    fn from(mut attributes: Map<String, Value>) -> Self {
        let id = take_typed(&mut attributes, keys::ID, |v| v.as_str().map(str::to_string));
        let strain_number = take_typed(&mut attributes, keys::STRAIN_NUMBER, |v| {
            v.as_u64().and_then(|n| u32::try_from(n).ok())
        });
        let is_keeper_pheno = take_flag(&mut attributes, keys::IS_KEEPER_PHENO);
        let is_candidate_for_cloning = take_flag(&mut attributes, keys::IS_CANDIDATE_FOR_CLONING);
        let germination_date = take_typed(&mut attributes, keys::GERMINATION_DATE, |v| {
            v.as_str().and_then(parse_lenient_date)
        });

        Self {
            id,
            strain_number,
            is_keeper_pheno,
            is_candidate_for_cloning,
            germination_date,
            attributes,
        }
    }
}

impl PlantRecord {
    /// 创建只带品系编号的植株记录
    pub fn new(strain_number: u32) -> Self {
        Self {
            id: None,
            strain_number: Some(strain_number),
            is_keeper_pheno: false,
            is_candidate_for_cloning: false,
            germination_date: None,
            attributes: Map::new(),
        }
    }

    /// 是否为优先植株（任一优先标志为 true）
    pub fn is_premium(&self) -> bool {
        self.is_keeper_pheno || self.is_candidate_for_cloning
    }

    /// 建议原因: 保留表型 > 扦插候选 > 普通
    pub fn placement_reason(&self) -> PlacementReason {
        if self.is_keeper_pheno {
            PlacementReason::KeeperPheno
        } else if self.is_candidate_for_cloning {
            PlacementReason::CloneCandidate
        } else {
            PlacementReason::Standard
        }
    }

    /// 诊断信息中使用的植株标签
    ///
    /// # 参数
    /// - `index`: 植株在输入序列中的位置
    ///
    /// # 返回
    /// 品系编号; 缺失时为 `index + 1`
    pub fn label(&self, index: usize) -> String {
        match self.strain_number {
            Some(number) => number.to_string(),
            None => (index + 1).to_string(),
        }
    }
}

/// 取出可转换为目标类型的字段; 无法转换时原值留在透传字段中
fn take_typed<T>(
    attributes: &mut Map<String, Value>,
    key: &str,
    convert: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let value = convert(attributes.get(key)?)?;
    attributes.remove(key);
    Some(value)
}

/// 优先标志: null 视为未设置; 非布尔值原样透传, 标志为 false
fn take_flag(attributes: &mut Map<String, Value>, key: &str) -> bool {
    if attributes.get(key).is_some_and(Value::is_null) {
        attributes.remove(key);
        return false;
    }
    take_typed(attributes, key, Value::as_bool).unwrap_or(false)
}

/// 宽松日期解析: 接受 `YYYY-MM-DD` 或以其开头的 ISO 时间戳
fn parse_lenient_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn is_false(flag: &bool) -> bool {
    !*flag
}
