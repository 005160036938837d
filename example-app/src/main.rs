//! # 依赖覆盖演示
//!
//! 父视图模型从根作用域加载名称，再以两种覆盖方式派生子视图模型：
//! 只覆盖 `get_all_names_client`，或只覆盖其依赖的 `names_client`。
//! 两种方式下子视图都应看到模拟数据。

mod clients;
mod view_model;

use clap::{Parser, ValueEnum};
use infrastructure_composition::{ContainerBuilder, ContainerSettings, DependencyContainer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use view_model::ViewModel;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "dependency-override-demo")]
#[command(about = "作用域依赖覆盖演示")]
struct Args {
    /// 演示场景
    #[arg(short, long, value_enum, default_value_t = Scenario::All)]
    scenario: Scenario,

    /// 容器配置文件路径（TOML 或 JSON）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别
    #[arg(long)]
    log_level: Option<String>,

    /// 输出 JSON 格式日志
    #[arg(long)]
    json_logs: bool,
}

/// 演示场景
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// 只加载父视图
    None,
    /// 覆盖 names_client 后进入子视图
    NamesClient,
    /// 覆盖 get_all_names_client 后进入子视图
    GetAllNamesClient,
    /// 依次运行全部场景
    All,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let container = build_container(&args)?;

    info!("启动依赖覆盖演示，场景: {:?}", args.scenario);
    if let Err(e) = run(&container, args.scenario) {
        error!("演示失败: {}", e);
        return Err(e);
    }
    Ok(())
}

/// 构建依赖容器
fn build_container(args: &Args) -> anyhow::Result<DependencyContainer> {
    let mut settings = match &args.config {
        Some(path) => ContainerSettings::from_file(path)?,
        None => ContainerSettings::default(),
    };
    if let Some(level) = &args.log_level {
        settings.logging.level = level.clone();
    }
    if args.json_logs {
        settings.logging.json_format = true;
    }

    let builder = ContainerBuilder::new()
        .with_settings(settings)
        .with_env_overrides("DEMO")
        .enable_logging(true);
    Ok(clients::register_live_clients(builder).build()?)
}

fn run(container: &DependencyContainer, scenario: Scenario) -> anyhow::Result<()> {
    let mut view_model = ViewModel::new(
        Arc::clone(container.root_scope()),
        container.resolver().clone(),
    );
    let names = view_model.load_names()?;
    println!("parent: {:?}", names);

    if matches!(scenario, Scenario::GetAllNamesClient | Scenario::All) {
        view_model.go_to_child_with_get_all_names_override();
        print_child("get_all_names_client override", &mut view_model)?;
    }
    if matches!(scenario, Scenario::NamesClient | Scenario::All) {
        view_model.go_to_child_with_names_override();
        print_child("names_client override", &mut view_model)?;
    }
    Ok(())
}

fn print_child(label: &str, view_model: &mut ViewModel) -> anyhow::Result<()> {
    if let Some(child) = view_model.child_mut() {
        let names = child.load_names()?;
        println!("child ({label}): {:?}", names);
    }
    Ok(())
}
