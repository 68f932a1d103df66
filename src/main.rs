// ==========================================
// 种植托盘分配引擎 - 命令行入口
// ==========================================
// 用法: tray-allocator <request.json | ->
// 输入: { "plants": [...], "assignments"?: [...], "config"?: {...} }
// 输出: stdout 打印 JSON { "assignments", "validation", "allocation" }
// 退出码: 0 成功; 1 请求无法读取/解析; 2 分配方案校验未通过
// ==========================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::process::ExitCode;

use tray_allocator::{
    logging, AllocationResult, AllocationValidator, AllocatorConfig, ImportAllocationOrchestrator,
    PlantRecord, TrayAllocator, TrayAssignment, ValidationReport,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AllocationRequest {
    plants: Vec<PlantRecord>,
    #[serde(default)]
    assignments: Option<Vec<TrayAssignment>>,
    #[serde(default)]
    config: Option<AllocatorConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AllocationResponse {
    assignments: Vec<TrayAssignment>,
    validation: ValidationReport,
    allocation: Option<AllocationResult>,
}

fn main() -> ExitCode {
    if std::env::var("TRAY_ALLOCATOR_LOG_FORMAT").as_deref() == Ok("json") {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("{} v{}", tray_allocator::APP_NAME, tray_allocator::VERSION);

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// 返回分配方案是否通过校验
fn run() -> Result<bool> {
    let source = std::env::args()
        .nth(1)
        .context("缺少请求文件参数 (使用 - 从标准输入读取)")?;
    let raw = read_request(&source)?;
    let request: AllocationRequest =
        serde_json::from_str(&raw).with_context(|| format!("请求解析失败: {}", source))?;

    let orchestrator = match &request.config {
        Some(config) => ImportAllocationOrchestrator::from_config(config)?,
        None => ImportAllocationOrchestrator::default(),
    };

    let assignments = match request.assignments {
        Some(assignments) => assignments,
        None => orchestrator.prepare(&request.plants).assignments,
    };

    let validation = AllocationValidator::new(orchestrator.catalog())
        .validate(&request.plants, &assignments);
    let allocation = validation
        .is_valid
        .then(|| TrayAllocator::new(orchestrator.catalog()).allocate(&request.plants, &assignments));

    let is_valid = validation.is_valid;
    let response = AllocationResponse {
        assignments,
        validation,
        allocation,
    };
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(is_valid)
}

fn read_request(source: &str) -> Result<String> {
    if source == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("标准输入读取失败")?;
        return Ok(raw);
    }

    std::fs::read_to_string(source).with_context(|| format!("请求文件读取失败: {}", source))
}
