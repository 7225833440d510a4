//! 结果接收端
//!
//! 搜索线程通过 [`SearchSink`] 推送匹配项、进度快照、警告和最终结果。
//! 展示层只接收副本，不会接触正在更新的计数器。

use std::sync::mpsc::{self, Receiver, Sender};

use log::debug;

use crate::errors::{SearchError, SearchResult};
use super::entry::MatchEvent;
use super::stats::{SearchReport, SearchStats};

/// 接收搜索事件的一方
///
/// 所有回调都在搜索线程上调用，实现不应阻塞。默认实现忽略事件。
pub trait SearchSink: Send {
    /// 发现一个匹配项
    fn on_match(&mut self, _event: &MatchEvent) {}

    /// 统计快照（可能被合并，计数单调不减）
    fn on_progress(&mut self, _stats: &SearchStats) {}

    /// 可恢复的错误，例如目录不可读
    fn on_warning(&mut self, _warning: &SearchError) {}

    /// 统一的终止信号：完成、取消、超时或前置条件错误
    fn on_done(&mut self, _outcome: Result<&SearchReport, &SearchError>) {}
}

/// 忽略所有事件
impl SearchSink for () {}

impl<S: SearchSink + ?Sized> SearchSink for Box<S> {
    fn on_match(&mut self, event: &MatchEvent) {
        (**self).on_match(event)
    }

    fn on_progress(&mut self, stats: &SearchStats) {
        (**self).on_progress(stats)
    }

    fn on_warning(&mut self, warning: &SearchError) {
        (**self).on_warning(warning)
    }

    fn on_done(&mut self, outcome: Result<&SearchReport, &SearchError>) {
        (**self).on_done(outcome)
    }
}

/// 通过通道传递给展示层的事件
#[derive(Debug, Clone)]
pub enum SearchEvent {
    Match(MatchEvent),
    Progress(SearchStats),
    Warning(SearchError),
    Done(SearchResult<SearchReport>),
}

/// 把事件转发到无界通道，发送永不阻塞搜索线程
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<SearchEvent>,
}

impl ChannelSink {
    /// 创建接收端及对应的事件接收器
    pub fn new() -> (Self, Receiver<SearchEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }

    fn send(&self, event: SearchEvent) {
        // 接收方已经关闭时丢弃事件，搜索本身不受影响
        if self.sender.send(event).is_err() {
            debug!("Event receiver dropped, discarding event");
        }
    }
}

impl SearchSink for ChannelSink {
    fn on_match(&mut self, event: &MatchEvent) {
        self.send(SearchEvent::Match(event.clone()));
    }

    fn on_progress(&mut self, stats: &SearchStats) {
        self.send(SearchEvent::Progress(stats.clone()));
    }

    fn on_warning(&mut self, warning: &SearchError) {
        self.send(SearchEvent::Warning(warning.clone()));
    }

    fn on_done(&mut self, outcome: Result<&SearchReport, &SearchError>) {
        self.send(SearchEvent::Done(outcome.cloned().map_err(|e| e.clone())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::entry::{DirectoryEntry, EntryKind};
    use crate::finder::stats::Termination;

    #[test]
    fn test_channel_sink_forwards_events() {
        let (mut sink, receiver) = ChannelSink::new();
        let event = MatchEvent {
            entry: DirectoryEntry::new("a.txt", "/tmp/a.txt", EntryKind::File),
            depth: 0,
        };

        sink.on_match(&event);
        sink.on_progress(&SearchStats::new());
        sink.on_done(Ok(&SearchReport {
            matches: vec![event.clone()],
            stats: SearchStats::new(),
            termination: Termination::Completed,
        }));

        let events: Vec<SearchEvent> = receiver.try_iter().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], SearchEvent::Match(e) if *e == event));
        assert!(matches!(&events[1], SearchEvent::Progress(_)));
        assert!(matches!(&events[2], SearchEvent::Done(Ok(r)) if r.matches.len() == 1));
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (mut sink, receiver) = ChannelSink::new();
        drop(receiver);
        sink.on_progress(&SearchStats::new());
        sink.on_done(Err(&SearchError::WorkerPanicked));
    }
}
