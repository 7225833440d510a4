//! 搜索会话
//!
//! 会话最多持有一个活动的搜索。启动新搜索前先取消并等待旧的搜索，
//! 保证不会有两个任务同时写入各自的结果。

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::errors::{SearchError, SearchResult};
use super::filter::{MatchMode, PatternMatcher};
use super::options::FindOptions;
use super::policy::TraversalPolicy;
use super::sink::SearchSink;
use super::stats::SearchReport;
use super::task::SearchTask;
use super::walker::SearchEngine;

/// 展示层提交的搜索参数
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub root: PathBuf,
    pub pattern: String,
    pub ignore_case: bool,
    pub mode: MatchMode,
    pub policy: TraversalPolicy,
    pub options: FindOptions,
}

impl SearchRequest {
    /// 使用默认策略和选项创建请求
    pub fn new(root: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            pattern: pattern.into(),
            ignore_case: false,
            mode: MatchMode::Find,
            policy: TraversalPolicy::default(),
            options: FindOptions::default(),
        }
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_policy(mut self, policy: TraversalPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_options(mut self, options: FindOptions) -> Self {
        self.options = options;
        self
    }

    /// 检查前置条件：根目录有效、正则表达式可编译
    pub fn prepare(&self) -> SearchResult<PreparedSearch> {
        let root = validate_root(&self.root)?;
        let matcher = PatternMatcher::with_options(&self.pattern, self.ignore_case, self.mode)?;
        Ok(PreparedSearch {
            root,
            matcher,
            policy: self.policy.clone(),
            options: self.options.clone(),
        })
    }
}

/// 已通过前置条件检查、可以直接运行的搜索
#[derive(Debug, Clone)]
pub struct PreparedSearch {
    pub root: PathBuf,
    pub matcher: PatternMatcher,
    pub policy: TraversalPolicy,
    pub options: FindOptions,
}

impl PreparedSearch {
    /// 在后台线程上运行，结束时调用 `sink.on_done`。
    ///
    /// 工作线程 panic 时同样会调用 `sink.on_done`，随后继续展开，
    /// 使 `SearchTask::wait` 返回 `WorkerPanicked`。
    pub fn spawn<S>(self, mut sink: S) -> SearchResult<SearchTask>
    where
        S: SearchSink + 'static,
    {
        SearchTask::start(move |cancel| {
            let engine = SearchEngine::new(&self.policy, &self.options);
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                engine.run(&self.root, &self.matcher, &mut sink, &cancel)
            }));
            match outcome {
                Ok(report) => {
                    sink.on_done(Ok(&report));
                    report
                }
                Err(payload) => {
                    error!("Search of {} panicked", self.root.display());
                    sink.on_done(Err(&SearchError::WorkerPanicked));
                    panic::resume_unwind(payload)
                }
            }
        })
    }
}

/// 验证搜索根目录并转换为绝对路径
pub fn validate_root(root: &Path) -> SearchResult<PathBuf> {
    let invalid = |reason: String| SearchError::InvalidRoot {
        path: root.to_path_buf(),
        reason,
    };

    let metadata = std::fs::metadata(root).map_err(|e| invalid(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(invalid("不是目录".to_string()));
    }
    std::path::absolute(root).map_err(|e| invalid(e.to_string()))
}

/// 管理当前活动的搜索
#[derive(Debug, Default)]
pub struct SearchSession {
    active: Option<SearchTask>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 启动新的搜索。
    ///
    /// 已有的搜索先被取消并等待结束。前置条件错误在启动任何线程之前返回，
    /// 同时通过 `sink.on_done` 报告。
    pub fn start<S>(&mut self, request: &SearchRequest, mut sink: S) -> SearchResult<()>
    where
        S: SearchSink + 'static,
    {
        if let Some(previous) = self.active.take() {
            info!("Superseding active search");
            // 旧任务的终止信号已经通过它自己的接收端送出
            if let Err(err) = previous.cancel_and_wait() {
                warn!("Superseded search ended abnormally: {}", err);
            }
        }

        let prepared = match request.prepare() {
            Ok(prepared) => prepared,
            Err(err) => {
                debug!("Search rejected: {}", err);
                sink.on_done(Err(&err));
                return Err(err);
            }
        };

        info!("Searching {} for /{}/", prepared.root.display(), request.pattern);
        self.active = Some(prepared.spawn(sink)?);
        Ok(())
    }

    /// 请求取消当前搜索（如有）
    pub fn cancel(&self) {
        if let Some(task) = &self.active {
            task.cancel();
        }
    }

    /// 是否有仍在运行的搜索；已结束的搜索会被清除
    pub fn is_active(&mut self) -> bool {
        if self.active.as_ref().is_some_and(SearchTask::is_finished) {
            debug!("Active search finished");
            self.active = None;
        }
        self.active.is_some()
    }

    /// 等待当前搜索结束并取得报告；没有搜索时返回 None
    pub fn wait(&mut self) -> Option<SearchResult<SearchReport>> {
        self.active.take().map(SearchTask::wait)
    }
}
