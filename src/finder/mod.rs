//! 文件查找模块
//!
//! 这个模块提供了可取消、有深度限制的正则表达式文件系统搜索，
//! 包括遍历策略、后台任务和结果推送。

pub mod compare;
pub mod entry;
pub mod filter;
pub mod options;
pub mod policy;
pub mod session;
pub mod sink;
pub mod stats;
pub mod task;
pub mod walker;

use std::path::Path;

use log::debug;

pub use self::entry::{DirectoryEntry, EntryKind, MatchEvent};
pub use self::filter::{EntryFilter, KindFilter, MatchMode, PatternMatcher};
pub use self::options::FindOptions;
pub use self::policy::TraversalPolicy;
pub use self::session::{SearchRequest, SearchSession};
pub use self::sink::{ChannelSink, SearchEvent, SearchSink};
pub use self::stats::{SearchReport, SearchStats, Termination};
pub use self::task::{CancelFlag, SearchTask};
pub use self::walker::SearchEngine;

use crate::errors::SearchResult;
use self::compare::CaseComparison;
use self::session::validate_root;

/// 文件查找器
///
/// 组合遍历选项和遍历策略，可以在当前线程上同步搜索，
/// 也可以启动后台任务。
#[derive(Debug, Clone, Default)]
pub struct Finder {
    options: FindOptions,
    policy: TraversalPolicy,
}

impl Finder {
    /// 创建新的文件查找器实例
    pub fn new(options: FindOptions) -> Self {
        Self {
            options,
            policy: TraversalPolicy::default(),
        }
    }

    /// 设置遍历策略
    pub fn with_policy(mut self, policy: TraversalPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn options(&self) -> &FindOptions {
        &self.options
    }

    pub fn policy(&self) -> &TraversalPolicy {
        &self.policy
    }

    /// 在当前线程上搜索，直到完成或超时
    pub fn find<F>(&self, root: &Path, filter: &F) -> SearchResult<SearchReport>
    where
        F: EntryFilter + ?Sized,
    {
        self.find_with(root, filter, &mut (), &CancelFlag::new())
    }

    /// 在当前线程上搜索，事件推送到 `sink`
    pub fn find_with<F>(
        &self,
        root: &Path,
        filter: &F,
        sink: &mut dyn SearchSink,
        cancel: &CancelFlag,
    ) -> SearchResult<SearchReport>
    where
        F: EntryFilter + ?Sized,
    {
        let root = validate_root(root)?;
        debug!("Searching in {}", root.display());
        Ok(SearchEngine::new(&self.policy, &self.options).run(&root, filter, sink, cancel))
    }

    /// 在后台线程上搜索
    pub fn spawn<S>(&self, root: &Path, matcher: PatternMatcher, sink: S) -> SearchResult<SearchTask>
    where
        S: SearchSink + 'static,
    {
        let prepared = session::PreparedSearch {
            root: validate_root(root)?,
            matcher,
            policy: self.policy.clone(),
            options: self.options.clone(),
        };
        prepared.spawn(sink)
    }

    /// 以两种大小写模式搜索并比较结果
    pub fn compare_case(&self, root: &Path, matcher: &PatternMatcher) -> SearchResult<CaseComparison> {
        let root = validate_root(root)?;
        compare::compare_case_sensitivity(&root, matcher, &self.policy, &self.options, &CancelFlag::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SearchError;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_finder_basic() {
        let temp_dir = tempdir().unwrap();
        let base_path = temp_dir.path();

        // 创建测试文件结构
        fs::create_dir(base_path.join("dir1")).unwrap();
        fs::create_dir(base_path.join("dir2")).unwrap();

        let mut file1 = File::create(base_path.join("dir1/test1.txt")).unwrap();
        file1.write_all(b"test content").unwrap();

        let mut file2 = File::create(base_path.join("dir2/test2.txt")).unwrap();
        file2.write_all(b"test content").unwrap();

        let finder = Finder::new(FindOptions::default());
        let filter = PatternMatcher::new(r"\.txt$").unwrap();
        let report = finder.find(base_path, &filter).unwrap();

        assert_eq!(report.matches.len(), 2);
        assert!(report.matches.iter().any(|m| m.as_path().ends_with("test1.txt")));
        assert!(report.matches.iter().any(|m| m.as_path().ends_with("test2.txt")));
        assert!(report.matches.iter().all(|m| m.depth == 1));
        assert_eq!(report.stats.folders_scanned, 2);
    }

    #[test]
    fn test_finder_with_policy() {
        let temp_dir = tempdir().unwrap();
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("dir1")).unwrap();
        File::create(base_path.join("top.txt")).unwrap();
        File::create(base_path.join("dir1/nested.txt")).unwrap();

        let finder = Finder::new(FindOptions::default())
            .with_policy(TraversalPolicy::from_commands("-maxRecursionDepth=0"));
        let filter = PatternMatcher::new("txt").unwrap();
        let report = finder.find(base_path, &filter).unwrap();

        assert_eq!(report.matches.len(), 1);
        assert!(report.matches[0].as_path().ends_with("top.txt"));
    }

    #[test]
    fn test_finder_kind_filter() {
        let temp_dir = tempdir().unwrap();
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("logs")).unwrap();
        File::create(base_path.join("logs/app.log")).unwrap();

        let finder = Finder::new(FindOptions::default());
        let report = finder.find(base_path, &KindFilter::new(false, true)).unwrap();

        assert_eq!(report.matches.len(), 1);
        assert!(report.matches[0].entry.is_dir());
    }

    #[test]
    fn test_finder_rejects_invalid_root() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("file.txt");
        File::create(&file_path).unwrap();

        let finder = Finder::new(FindOptions::default());
        let filter = PatternMatcher::new("").unwrap();
        assert!(matches!(
            finder.find(&file_path, &filter),
            Err(SearchError::InvalidRoot { .. })
        ));
        assert!(matches!(
            finder.spawn(&file_path, filter, ()),
            Err(SearchError::InvalidRoot { .. })
        ));
    }

    #[test]
    fn test_finder_spawn() {
        let temp_dir = tempdir().unwrap();
        File::create(temp_dir.path().join("one.txt")).unwrap();

        let finder = Finder::new(FindOptions::default());
        let (sink, receiver) = ChannelSink::new();
        let task = finder
            .spawn(temp_dir.path(), PatternMatcher::new("one").unwrap(), sink)
            .unwrap();
        let report = task.wait().unwrap();

        assert_eq!(report.matches.len(), 1);
        assert!(receiver
            .try_iter()
            .any(|e| matches!(e, SearchEvent::Done(Ok(_)))));
    }
}
