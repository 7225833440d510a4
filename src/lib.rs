//! 用于按正则表达式搜索文件和目录的库
//!
//! 本库提供了可取消的递归文件系统搜索，支持：
//! - 后台线程搜索，协作式取消和软超时
//! - 正则表达式名称匹配（包含匹配或完整匹配，可忽略大小写）
//! - 最小/最大递归深度、每个目录的匹配上限、按名称排序的起始前缀
//! - 匹配项和统计快照的实时推送
//!
//! ## 使用场景
//!
//! - 在图形界面或终端中搜索文件而不阻塞界面线程
//! - 在很大的目录树中只查看某一层或某一段
//! - 统计目录树中的文件和目录数量
//!
//! # 示例
//!
//! 基本用法：
//! ```no_run
//! use rust_search::finder::{ChannelSink, SearchEvent, SearchRequest, SearchSession, TraversalPolicy};
//!
//! let request = SearchRequest::new(".", r"\.rs$")
//!     .with_policy(TraversalPolicy::from_commands("-maxRecursionDepth=3 -maxHorizontal=10"));
//!
//! let (sink, events) = ChannelSink::new();
//! let mut session = SearchSession::new();
//! session.start(&request, sink).unwrap();
//!
//! for event in events {
//!     match event {
//!         SearchEvent::Match(m) => println!("找到: {} (深度 {})", m.as_path().display(), m.depth),
//!         SearchEvent::Done(_) => break,
//!         _ => {}
//!     }
//! }
//! ```
//!
//! 更多用法请参考各模块文档。

pub mod cli;
pub mod errors;
pub mod finder;

// Re-export main types for convenience
pub use errors::{SearchError, SearchResult};
pub use finder::{Finder, SearchRequest, SearchSession};
