use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Result type for operations that can produce SearchError
pub type SearchResult<T> = Result<T, SearchError>;

/// rust-search 的错误类型
///
/// 错误需要可克隆，终止状态会同时广播给结果接收端和等待任务的调用者。
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// 搜索根路径不存在或不是目录（搜索开始前报告）
    #[error("无效的搜索根目录 {}: {reason}", .path.display())]
    InvalidRoot { path: PathBuf, reason: String },

    /// 正则表达式语法错误（搜索开始前报告）
    #[error("正则表达式语法错误 '{pattern}': {source}")]
    PatternSyntax {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// 目录不可读，遍历会把它当作空目录继续
    #[error("目录不可读 {}: {message}", .path.display())]
    DirectoryUnreadable { path: PathBuf, message: String },

    /// 跟随符号链接时出现循环
    #[error("符号链接循环: {}", .0.display())]
    SymlinkLoop(PathBuf),

    /// 搜索被取消或被新的搜索取代
    #[error("搜索已取消 (已匹配 {matched} 项)")]
    Cancelled { matched: usize },

    /// 超过软超时
    #[error("搜索超时 {elapsed:.2?} (已匹配 {matched} 项)")]
    TimedOut { elapsed: Duration, matched: usize },

    /// 后台线程无法启动
    #[error("无法启动搜索线程: {0}")]
    WorkerSpawn(String),

    /// 后台线程异常退出
    #[error("搜索线程异常退出")]
    WorkerPanicked,
}

impl SearchError {
    /// 出错的路径（如有）
    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchError::InvalidRoot { path, .. }
            | SearchError::DirectoryUnreadable { path, .. }
            | SearchError::SymlinkLoop(path) => Some(path.as_path()),
            _ => None,
        }
    }

    /// 遍历可以在该错误之后继续
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SearchError::DirectoryUnreadable { .. } | SearchError::SymlinkLoop(_)
        )
    }

    /// 取消与超时是正常的终止状态，不算失败
    pub fn is_interruption(&self) -> bool {
        matches!(
            self,
            SearchError::Cancelled { .. } | SearchError::TimedOut { .. }
        )
    }
}

impl From<walkdir::Error> for SearchError {
    fn from(err: walkdir::Error) -> Self {
        if let Some(ancestor) = err.loop_ancestor() {
            let path = err.path().unwrap_or(ancestor).to_path_buf();
            return SearchError::SymlinkLoop(path);
        }
        let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
        let message = match err.io_error() {
            Some(io_err) => io_err.to_string(),
            None => err.to_string(),
        };
        SearchError::DirectoryUnreadable { path, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_root_display() {
        let err = SearchError::InvalidRoot {
            path: PathBuf::from("/invalid/path"),
            reason: "不是目录".to_string(),
        };
        assert_eq!(err.to_string(), "无效的搜索根目录 /invalid/path: 不是目录");
        assert_eq!(err.path(), Some(Path::new("/invalid/path")));
    }

    #[test]
    fn test_unreadable_display() {
        let err = SearchError::DirectoryUnreadable {
            path: PathBuf::from("/test/path"),
            message: "permission denied".to_string(),
        };
        assert_eq!(err.to_string(), "目录不可读 /test/path: permission denied");
        assert!(err.is_recoverable());
        assert!(!err.is_interruption());
    }

    #[test]
    fn test_pattern_error_has_source() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = SearchError::PatternSyntax {
            pattern: "(".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("正则表达式语法错误 '(':"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_interruptions() {
        assert!(SearchError::Cancelled { matched: 3 }.is_interruption());
        let timed_out = SearchError::TimedOut {
            elapsed: Duration::from_secs(1),
            matched: 0,
        };
        assert!(timed_out.is_interruption());
        assert_eq!(SearchError::Cancelled { matched: 3 }.to_string(), "搜索已取消 (已匹配 3 项)");
    }
}
