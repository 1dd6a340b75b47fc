//! Cerebus 屏幕模拟器
//!
//! ```bash
//! cerebus-sim screen_radar
//! cerebus-sim --base rom_0 --mod mods/my_radar screen_radar
//! cerebus-sim --headless --frames 60 --snapshot radar.png screen_radar
//! cerebus-sim --base rom_0 --write-config cerebus.json
//! ```

use cerebus_host::{
    AppConfig, ContentResolver, FrameLoop, HeadlessPresenter, HostError, LoopReport,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(name = "cerebus-sim")]
#[command(about = "在游戏之外运行 Carrier Command 2 的屏幕脚本")]
#[command(version)]
struct Cli {
    /// 屏幕脚本名（如 screen_radar，可省略 .lua）
    #[arg(required_unless_present = "write_config")]
    screen: Option<String>,

    /// 配置文件
    #[arg(short, long, default_value = cerebus_host::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// 基础游戏内容根（覆盖配置）
    #[arg(short, long)]
    base: Option<PathBuf>,

    /// 启用的 mod，可重复；指定后替换配置中的列表
    #[arg(short = 'm', long = "mod")]
    mods: Vec<PathBuf>,

    /// 不打开窗口
    #[arg(long)]
    headless: bool,

    /// 输出的帧数（仅 headless，默认 1）
    #[arg(short, long)]
    frames: Option<u64>,

    /// 结束时把最后一帧写成 PNG（仅 headless）
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// 日志级别（覆盖配置）
    #[arg(short, long)]
    log_level: Option<String>,

    /// 把合并后的配置写到文件后退出
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = merged_config(&cli);
    init_logging(&config.debug.log_level);

    if let Some(path) = &cli.write_config {
        return match config.save(path) {
            Ok(()) => {
                info!(path = %path.display(), "配置已写出");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "写出配置失败");
                ExitCode::FAILURE
            }
        };
    }

    let Some(screen) = cli.screen.as_deref() else {
        error!("未指定屏幕脚本");
        return ExitCode::FAILURE;
    };

    match run(&cli, screen, config) {
        Ok(report) => {
            println!(
                "frames={} faults={} present_failures={} tick={}",
                report.frames,
                report.faults.len(),
                report.present_failures,
                report.final_tick
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "运行失败");
            ExitCode::FAILURE
        }
    }
}

/// 命令行参数覆盖配置文件
fn merged_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::load(&cli.config);
    if let Some(base) = &cli.base {
        config.base_root = base.clone();
    }
    if !cli.mods.is_empty() {
        config.mods = cli.mods.clone();
    }
    if let Some(level) = &cli.log_level {
        config.debug.log_level = level.clone();
    }
    config
}

fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn run(cli: &Cli, screen: &str, config: AppConfig) -> Result<LoopReport, HostError> {
    config.validate()?;

    let resolver = Rc::new(ContentResolver::from_layout(&config.mods, &config.base_root)?);
    info!(roots = resolver.root_count(), screen, "内容根就绪");

    #[cfg(feature = "window")]
    if !cli.headless {
        let presenter = cerebus_host::WindowPresenter::new(config.window.scale);
        return FrameLoop::new(config, presenter).run(resolver, screen);
    }

    let mut presenter = HeadlessPresenter::with_frames(cli.frames.unwrap_or(1));
    let snapshot = cli
        .snapshot
        .clone()
        .or_else(|| default_snapshot(&config, screen));
    if let Some(path) = snapshot {
        presenter = presenter.with_snapshot(path);
    }
    FrameLoop::new(config, presenter).run(resolver, screen)
}

/// 配置了快照目录时的默认快照路径
fn default_snapshot(config: &AppConfig, screen: &str) -> Option<PathBuf> {
    let dir = config.debug.snapshot_dir.as_ref()?;
    let stem = screen.trim_end_matches(".lua");
    Some(dir.join(format!("{stem}.png")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_required_unless_writing_config() {
        assert!(Cli::try_parse_from(["cerebus-sim"]).is_err());

        let cli = Cli::try_parse_from(["cerebus-sim", "--write-config", "out.json"]).unwrap();
        assert!(cli.screen.is_none());
        assert_eq!(cli.write_config, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_written_config_keeps_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("cerebus.json");
        let cli = Cli::try_parse_from([
            "cerebus-sim",
            "--config",
            dir.path().join("missing.json").to_str().unwrap(),
            "--base",
            "game/rom_0",
            "--mod",
            "mods/radar",
            "--write-config",
            out.to_str().unwrap(),
        ])
        .unwrap();

        merged_config(&cli).save(&out).unwrap();
        let reloaded = AppConfig::load(&out);
        assert_eq!(reloaded.base_root, PathBuf::from("game/rom_0"));
        assert_eq!(reloaded.mods, vec![PathBuf::from("mods/radar")]);
    }
}
