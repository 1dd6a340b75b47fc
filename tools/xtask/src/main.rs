//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 cerebus-runtime 覆盖率
//! - `screen-check`: 以 headless 模式逐个运行已知屏幕，报告脚本故障

use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use cerebus_host::{
    AppConfig, ContentResolver, FrameLoop, HeadlessPresenter, KNOWN_SCREENS, LoopReport,
};
use xshell::{Shell, cmd};

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let sh = Shell::new()?;
            eprintln!("\n==> cargo fmt --all -- --check");
            cmd!(sh, "cargo fmt --all -- --check").run()?;
            eprintln!("\n==> cargo clippy --workspace --all-targets");
            cmd!(sh, "cargo clippy --workspace --all-targets").run()?;
            eprintln!("\n==> cargo test --workspace");
            cmd!(sh, "cargo test --workspace").run()?;
        }
        "cov-runtime" => {
            let sh = Shell::new()?;
            if cmd!(sh, "cargo llvm-cov --version").quiet().run().is_err() {
                anyhow::bail!(
                    "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
                );
            }
            eprintln!("\n==> cargo llvm-cov -p cerebus-runtime --html");
            cmd!(sh, "cargo llvm-cov -p cerebus-runtime --html").run()?;
            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "screen-check" => {
            let options = ScreenCheckOptions::parse(args)?;
            screen_check(&options)?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-runtime     运行 cerebus-runtime 覆盖率报告
  screen-check    逐个运行已知屏幕并报告脚本故障

SCREEN-CHECK:
  cargo xtask screen-check [--config FILE] [--base DIR] [--mod DIR]... [--frames N] [--json]

  使用配置文件（默认 cerebus.json）中的内容根，命令行参数优先。
  内容根中找不到的屏幕会被跳过。

  检查内容：
    - 库脚本与屏幕脚本能否加载
    - begin() 是否出错（仅提示）
    - 每帧 update() 的故障数量
"#
    );
}

//=============================================================================
// screen-check 命令实现
//=============================================================================

/// screen-check 参数
struct ScreenCheckOptions {
    config: PathBuf,
    base: Option<PathBuf>,
    mods: Vec<PathBuf>,
    frames: u64,
    json: bool,
}

impl ScreenCheckOptions {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut options = Self {
            config: PathBuf::from(cerebus_host::config::DEFAULT_CONFIG_FILE),
            base: None,
            mods: Vec::new(),
            frames: 10,
            json: false,
        };

        while let Some(arg) = args.next() {
            let mut value = || {
                args.next()
                    .ok_or_else(|| anyhow::anyhow!("{arg} 需要一个参数"))
            };
            match arg.as_str() {
                "--config" => options.config = PathBuf::from(value()?),
                "--base" => options.base = Some(PathBuf::from(value()?)),
                "--mod" => options.mods.push(PathBuf::from(value()?)),
                "--frames" => options.frames = value()?.parse()?,
                "--json" => options.json = true,
                other => anyhow::bail!("unknown screen-check argument: {other}"),
            }
        }
        Ok(options)
    }
}

/// 单个屏幕的检查结果
enum ScreenOutcome {
    Skipped,
    Failed(String),
    Ran(LoopReport),
}

fn screen_check(options: &ScreenCheckOptions) -> anyhow::Result<()> {
    let mut config = AppConfig::load(&options.config);
    if let Some(base) = &options.base {
        config.base_root = base.clone();
    }
    if !options.mods.is_empty() {
        config.mods = options.mods.clone();
    }
    config.frame.fps = 0;
    config.validate()?;

    let resolver = Rc::new(ContentResolver::from_layout(&config.mods, &config.base_root)?);

    let mut outcomes = Vec::new();
    for screen in KNOWN_SCREENS {
        let outcome = if resolver.resolve(&format!("{screen}.lua")).is_none() {
            ScreenOutcome::Skipped
        } else {
            let presenter = HeadlessPresenter::with_frames(options.frames);
            match FrameLoop::new(config.clone(), presenter).run(Rc::clone(&resolver), screen) {
                Ok(report) => ScreenOutcome::Ran(report),
                Err(e) => ScreenOutcome::Failed(e.to_string()),
            }
        };
        outcomes.push((*screen, outcome));
    }

    if options.json {
        print_json(&outcomes)?;
    } else {
        print_summary(&outcomes);
    }

    let failed = outcomes.iter().any(|(_, outcome)| match outcome {
        ScreenOutcome::Failed(_) => true,
        ScreenOutcome::Ran(report) => !report.faults.is_empty(),
        ScreenOutcome::Skipped => false,
    });
    if failed {
        anyhow::bail!("screen-check 发现故障");
    }
    Ok(())
}

fn print_summary(outcomes: &[(&str, ScreenOutcome)]) {
    eprintln!("\n==> screen-check");
    for (screen, outcome) in outcomes {
        match outcome {
            ScreenOutcome::Skipped => eprintln!("  [skip] {screen}: 内容根中不存在"),
            ScreenOutcome::Failed(e) => eprintln!("  [FAIL] {screen}: {e}"),
            ScreenOutcome::Ran(report) => {
                let status = if report.faults.is_empty() { "ok" } else { "FAULT" };
                eprintln!(
                    "  [{status}] {screen}: {} 帧, {} 个故障",
                    report.frames,
                    report.faults.len()
                );
                if let Some(fault) = &report.init_fault {
                    eprintln!("         begin: {fault}");
                }
                if let Some(first) = report.faults.first() {
                    eprintln!("         首个故障 (frame {}): {}", first.frame, first.fault);
                }
            }
        }
    }
}

fn print_json(outcomes: &[(&str, ScreenOutcome)]) -> anyhow::Result<()> {
    let entries: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|(screen, outcome)| match outcome {
            ScreenOutcome::Skipped => serde_json::json!({ "screen": screen, "status": "skipped" }),
            ScreenOutcome::Failed(e) => {
                serde_json::json!({ "screen": screen, "status": "failed", "error": e })
            }
            ScreenOutcome::Ran(report) => serde_json::json!({
                "screen": screen,
                "status": if report.faults.is_empty() { "ok" } else { "fault" },
                "frames": report.frames,
                "present_failures": report.present_failures,
                "final_tick": report.final_tick,
                "begin_fault": report.init_fault.as_ref().map(|f| f.to_string()),
                "faults": report
                    .faults
                    .iter()
                    .map(|f| serde_json::json!({ "frame": f.frame, "tick": f.tick, "error": f.fault.to_string() }))
                    .collect::<Vec<_>>(),
            }),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
