use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};

use rust_search::cli::Cli;
use rust_search::finder::{
    ChannelSink, Finder, KindFilter, PatternMatcher, SearchEvent, SearchReport, SearchSession,
};

fn main() -> Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    // 初始化日志
    env_logger::Builder::new()
        .filter_level(if cli.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    info!("开始运行 rust-search");
    let start_time = Instant::now();

    cli.validate().context("搜索参数无效")?;

    if cli.compare_case {
        run_comparison(&cli)?;
    } else {
        run_search(&cli)?;
    }

    info!("搜索完成，耗时 {:.2?}", start_time.elapsed());
    Ok(())
}

/// 在后台线程上搜索，主线程负责显示事件
fn run_search(cli: &Cli) -> Result<()> {
    let request = cli.build_request();
    let display = cli.kind_filter();
    debug!("搜索请求: {:?}", request);

    let (sink, events) = ChannelSink::new();
    let mut session = SearchSession::new();
    session
        .start(&request, sink)
        .with_context(|| format!("无法在 {} 中启动搜索", request.root.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut final_report = None;

    for event in events {
        match event {
            SearchEvent::Match(event) => {
                if display.admits(event.entry.kind) {
                    writeln!(out, "{}", event.as_path().display())?;
                }
            }
            SearchEvent::Progress(stats) => {
                if cli.progress {
                    let location = stats
                        .current_location
                        .as_deref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    eprintln!("[{}] {}", stats, location);
                }
            }
            SearchEvent::Warning(warning) => {
                warn!("{}", warning);
            }
            SearchEvent::Done(outcome) => {
                final_report = Some(outcome.context("搜索失败")?);
                break;
            }
        }
    }

    let worker_report = session.wait().transpose().context("搜索线程失败")?;
    let report = final_report
        .or(worker_report)
        .context("搜索线程没有返回结果")?;
    summarize(&report, display);
    Ok(())
}

/// 以两种大小写模式搜索并打印数量
fn run_comparison(cli: &Cli) -> Result<()> {
    let matcher = PatternMatcher::with_options(cli.pattern(), cli.ignore_case, cli.match_mode())?;
    let finder = Finder::new(cli.build_options()).with_policy(cli.build_policy());
    let comparison = finder
        .compare_case(&cli.root, &matcher)
        .with_context(|| format!("无法在 {} 中搜索", cli.root.display()))?;

    let display = cli.kind_filter();
    let requested = comparison.requested(cli.ignore_case);
    for event in display.apply(&requested.matches) {
        println!("{}", event.as_path().display());
    }

    let (requested_label, opposite_label) = if cli.ignore_case {
        ("不区分大小写", "区分大小写")
    } else {
        ("区分大小写", "不区分大小写")
    };
    let opposite = comparison.opposite(cli.ignore_case);
    eprintln!(
        "{}: {} ({:.6} s)",
        requested_label,
        requested.matches.len(),
        requested.stats.elapsed.as_secs_f64()
    );
    eprintln!(
        "{}: {} ({:.6} s)",
        opposite_label,
        opposite.matches.len(),
        opposite.stats.elapsed.as_secs_f64()
    );
    Ok(())
}

fn summarize(report: &SearchReport, display: KindFilter) {
    if let Some(interruption) = report.termination_error() {
        warn!("{}", interruption);
    }
    let shown = display.apply(&report.matches).len();
    info!("{} (显示 {} 项)", report.stats, shown);
}
