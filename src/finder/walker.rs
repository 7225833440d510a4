//! 搜索引擎：目录树遍历
//!
//! 深度优先、先序遍历，兄弟条目按目录列出的顺序处理。每个目录维护自己的
//! 前缀闸门和匹配计数，进入新目录时重置。

use std::path::Path;
use std::time::Instant;

use log::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::errors::SearchError;
use super::entry::{DirectoryEntry, MatchEvent};
use super::filter::EntryFilter;
use super::options::FindOptions;
use super::policy::TraversalPolicy;
use super::sink::SearchSink;
use super::stats::{ProgressThrottle, SearchReport, SearchStats, Termination};
use super::task::CancelFlag;

/// 单个已打开目录的状态
#[derive(Debug)]
struct DirState {
    gate_open: bool,
    matched: usize,
}

impl DirState {
    fn new(policy: &TraversalPolicy) -> Self {
        Self {
            gate_open: policy.initial_gate(),
            matched: 0,
        }
    }
}

/// 单个条目的处理结果
enum Visit {
    /// 被前缀闸门跳过，不计入统计
    Skipped,
    /// 已扫描，可能产生一个匹配项
    Scanned(Option<MatchEvent>),
}

/// 在策略约束下遍历目录树并记录匹配项
pub struct SearchEngine<'a> {
    policy: &'a TraversalPolicy,
    options: &'a FindOptions,
}

impl<'a> SearchEngine<'a> {
    /// 使用给定策略和选项创建搜索引擎
    pub fn new(policy: &'a TraversalPolicy, options: &'a FindOptions) -> Self {
        Self { policy, options }
    }

    /// 从 `root` 开始搜索。
    ///
    /// `root` 必须是已经验证过的目录。取消标志和超时在处理每个条目之前检查；
    /// 触发后立即停止，已收集的匹配项保留在报告中。
    pub fn run<F>(
        &self,
        root: &Path,
        filter: &F,
        sink: &mut dyn SearchSink,
        cancel: &CancelFlag,
    ) -> SearchReport
    where
        F: EntryFilter + ?Sized,
    {
        let started = Instant::now();
        let deadline = self.policy.deadline(started);
        let mut throttle = ProgressThrottle::new(self.options.progress_interval);
        let mut stats = SearchStats::new();
        let mut matches = Vec::new();
        let mut termination = Termination::Completed;

        if !self.policy.is_satisfiable() {
            debug!("Depth bounds admit no match");
        }
        info!("Starting search in {} ({})", root.display(), filter.description());

        // dirs[i] 是当前打开的、walkdir 深度为 i 的目录
        let mut dirs: Vec<DirState> = Vec::new();
        let mut walker = self.init_walker(root).into_iter();

        loop {
            if cancel.is_cancelled() {
                termination = Termination::Cancelled;
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                termination = Termination::TimedOut;
                break;
            }

            let entry = match walker.next() {
                None => break,
                Some(Ok(entry)) => entry,
                Some(Err(err)) => {
                    self.handle_walk_error(err, sink);
                    continue;
                }
            };

            let walk_depth = entry.depth();
            dirs.truncate(walk_depth);
            if walk_depth == 0 {
                dirs.push(DirState::new(self.policy));
                continue;
            }
            let Some(state) = dirs.get_mut(walk_depth - 1) else {
                debug!("No open parent for {}, skipping", entry.path().display());
                continue;
            };
            // 根目录的直接子项深度为 0
            let depth = walk_depth - 1;
            // walkdir 只在最大深度以内打开目录，与 should_descend 保持一致
            let descends = entry.file_type().is_dir() && self.policy.should_descend(depth + 1);

            match self.process_entry(&entry, depth, state, filter, &mut stats) {
                Visit::Skipped => {
                    if descends {
                        walker.skip_current_dir();
                    }
                    continue;
                }
                Visit::Scanned(Some(event)) => {
                    sink.on_match(&event);
                    matches.push(event);
                }
                Visit::Scanned(None) => {}
            }

            if descends {
                dirs.push(DirState::new(self.policy));
            }

            if throttle.ready(Instant::now()) {
                stats.elapsed = started.elapsed();
                sink.on_progress(&stats);
            }
        }

        stats.elapsed = started.elapsed();
        sink.on_progress(&stats);

        info!(
            "Search in {} finished ({:?}): {} matches, {} entries scanned in {:.2?}",
            root.display(),
            termination,
            matches.len(),
            stats.total_scanned(),
            stats.elapsed
        );

        SearchReport {
            matches,
            stats,
            termination,
        }
    }

    /// 使用配置的选项初始化目录遍历器
    fn init_walker(&self, root: &Path) -> WalkDir {
        let mut walker = WalkDir::new(root).follow_links(self.options.follow_links);

        // walkdir 把根目录计为深度 0，它的子项为深度 1
        if let Some(max_depth) = self.policy.walk_depth() {
            walker = walker.max_depth(max_depth);
        }

        if self.options.sort_by_name {
            walker = walker.sort_by_file_name();
        }

        walker
    }

    /// 处理单个目录条目：前缀闸门、计数、匹配和水平上限
    fn process_entry<F>(
        &self,
        entry: &DirEntry,
        depth: usize,
        state: &mut DirState,
        filter: &F,
        stats: &mut SearchStats,
    ) -> Visit
    where
        F: EntryFilter + ?Sized,
    {
        let entry = DirectoryEntry::from_walkdir(entry);

        let (admit, gate_open) = self.policy.admits_by_prefix(&entry.name, state.gate_open);
        state.gate_open = gate_open;
        if !admit {
            debug!("Skipping {} before start prefix", entry.path.display());
            return Visit::Skipped;
        }

        stats.record_scanned(entry.kind);
        stats.current_location = Some(entry.path.clone());

        if !self.policy.should_record_match(depth) || !filter.matches(&entry) {
            return Visit::Scanned(None);
        }
        if !self.policy.admits_horizontal_cap(state.matched) {
            debug!("Per-directory cap reached, dropping {}", entry.path.display());
            return Visit::Scanned(None);
        }

        state.matched += 1;
        stats.record_matched(entry.kind);
        Visit::Scanned(Some(MatchEvent { entry, depth }))
    }

    /// 处理遍历错误：记录日志，按选项转发给接收端，然后继续遍历
    fn handle_walk_error(&self, err: walkdir::Error, sink: &mut dyn SearchSink) {
        let warning = SearchError::from(err);
        warn!("{}", warning);
        if self.options.report_warnings {
            sink.on_warning(&warning);
        }
    }
}
