//! 可取消的后台搜索任务
//!
//! 每个任务在独立线程上运行，展示层线程不会被遍历阻塞。取消是协作式的：
//! 搜索引擎在处理每个条目之前检查取消标志。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error};

use crate::errors::{SearchError, SearchResult};
use super::stats::SearchReport;

/// 在任务与调用者之间共享的取消标志
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求取消，无法撤销
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// 正在后台运行的搜索
///
/// 丢弃任务而不等待时会请求取消，后台线程会在下一个条目处停止。
#[derive(Debug)]
pub struct SearchTask {
    cancel: CancelFlag,
    handle: Option<JoinHandle<SearchReport>>,
}

impl SearchTask {
    /// 在新线程上启动工作函数
    ///
    /// 工作函数收到任务的取消标志，返回最终报告。
    pub fn start<W>(work: W) -> SearchResult<Self>
    where
        W: FnOnce(CancelFlag) -> SearchReport + Send + 'static,
    {
        let cancel = CancelFlag::new();
        let worker_flag = cancel.clone();
        let handle = thread::Builder::new()
            .name("search-worker".to_string())
            .spawn(move || work(worker_flag))
            .map_err(|e| SearchError::WorkerSpawn(e.to_string()))?;

        debug!("Search worker started");
        Ok(Self {
            cancel,
            handle: Some(handle),
        })
    }

    /// 请求取消；已经在进行的目录读取或匹配不会被打断
    pub fn cancel(&self) {
        debug!("Cancelling search worker");
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// 后台线程是否已经结束
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// 等待任务结束并取得报告
    ///
    /// 取消或超时不是错误：报告的 `termination` 字段说明终止方式，
    /// 已收集的匹配项仍然有效。
    pub fn wait(mut self) -> SearchResult<SearchReport> {
        self.join()
    }

    /// 取消并等待任务结束
    pub fn cancel_and_wait(self) -> SearchResult<SearchReport> {
        self.cancel();
        self.wait()
    }

    fn join(&mut self) -> SearchResult<SearchReport> {
        let handle = self.handle.take().ok_or(SearchError::WorkerPanicked)?;
        handle.join().map_err(|_| {
            error!("Search worker panicked");
            SearchError::WorkerPanicked
        })
    }
}

impl Drop for SearchTask {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel.cancel();
        }
    }
}
