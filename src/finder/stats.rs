//! 搜索统计与搜索报告
//!
//! 统计信息只由正在运行的搜索线程写入，展示层只读取快照副本。

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::errors::SearchError;
use super::entry::{EntryKind, MatchEvent};

/// 一次搜索的计数器
///
/// 所有计数在一次运行中单调不减，每次新的运行从零开始。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub files_scanned: u64,
    pub folders_scanned: u64,
    pub files_matched: u64,
    pub folders_matched: u64,
    /// 最近访问的绝对路径
    pub current_location: Option<PathBuf>,
    /// 从开始到现在的耗时
    pub elapsed: Duration,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已扫描的文件和目录总数
    pub fn total_scanned(&self) -> u64 {
        self.files_scanned + self.folders_scanned
    }

    /// 已匹配的文件和目录总数
    pub fn total_matched(&self) -> u64 {
        self.files_matched + self.folders_matched
    }

    pub(crate) fn record_scanned(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::File => self.files_scanned += 1,
            EntryKind::Directory => self.folders_scanned += 1,
        }
    }

    pub(crate) fn record_matched(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::File => self.files_matched += 1,
            EntryKind::Directory => self.folders_matched += 1,
        }
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "扫描 {} 个文件, {} 个目录; 匹配 {} 个文件, {} 个目录; 耗时 {:.6} s",
            self.files_scanned,
            self.folders_scanned,
            self.files_matched,
            self.folders_matched,
            self.elapsed.as_secs_f64()
        )
    }
}

/// 搜索的终止方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// 遍历完整个目录树
    Completed,
    /// 被调用者取消或被新的搜索取代
    Cancelled,
    /// 超过了软超时
    TimedOut,
}

/// 一次搜索运行的最终结果
///
/// 取消或超时时，已经收集到的匹配项仍然保留。
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// 按发现顺序排列的匹配项
    pub matches: Vec<MatchEvent>,
    pub stats: SearchStats,
    pub termination: Termination,
}

impl SearchReport {
    pub fn is_complete(&self) -> bool {
        self.termination == Termination::Completed
    }

    /// 取消或超时对应的错误；完整结束时为 None
    pub fn termination_error(&self) -> Option<SearchError> {
        let matched = self.matches.len();
        match self.termination {
            Termination::Completed => None,
            Termination::Cancelled => Some(SearchError::Cancelled { matched }),
            Termination::TimedOut => Some(SearchError::TimedOut {
                elapsed: self.stats.elapsed,
                matched,
            }),
        }
    }
}

/// 进度快照的节流器
///
/// 间隔为零时每个条目都会发送快照。
#[derive(Debug)]
pub(crate) struct ProgressThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl ProgressThrottle {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub(crate) fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
