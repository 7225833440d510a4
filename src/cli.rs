//! rust-search 的命令行接口
//!
//! 本模块提供了命令行参数解析，并把参数转换为搜索请求。
//! 命令行在这里代替图形界面，负责提交参数和显示结果。

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::errors::SearchError;
use crate::finder::filter::{KindFilter, MatchMode, PatternMatcher};
use crate::finder::options::FindOptions;
use crate::finder::policy::TraversalPolicy;
use crate::finder::session::{validate_root, SearchRequest};

/// 可取消、有深度限制的正则表达式文件搜索
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 搜索根目录
    pub root: PathBuf,

    /// 匹配文件名的正则表达式（默认匹配所有名称）
    pub pattern: Option<String>,

    /// 不区分大小写
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// 要求整个文件名匹配（默认只要包含匹配即可）
    #[arg(long)]
    pub full_match: bool,

    /// 最大递归深度（根目录的直接子项深度为 0）
    #[arg(long, value_name = "NUM")]
    pub max_depth: Option<usize>,

    /// 最小记录深度
    #[arg(long, value_name = "NUM")]
    pub min_depth: Option<usize>,

    /// 每个目录最多记录的匹配数
    #[arg(long, value_name = "NUM")]
    pub max_horizontal: Option<usize>,

    /// 跳过排在该名称之前的同级条目
    #[arg(long, value_name = "NAME")]
    pub start_prefix: Option<String>,

    /// 软超时（秒）
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// 命令字符串，例如 "-maxRecursionDepth=2 -maxHorizontal=10"；单独的选项优先
    #[arg(short = 'c', long, value_name = "FLAGS", allow_hyphen_values = true)]
    pub commands: Option<String>,

    /// 只显示文件
    #[arg(long)]
    pub files: bool,

    /// 只显示目录
    #[arg(long)]
    pub folders: bool,

    /// 按文件名顺序遍历同级条目
    #[arg(long)]
    pub sort: bool,

    /// 跟随符号链接
    #[arg(short = 'L', long)]
    pub follow_links: bool,

    /// 在标准错误输出上显示进度
    #[arg(long)]
    pub progress: bool,

    /// 同时以相反的大小写模式搜索并比较数量
    #[arg(long)]
    pub compare_case: bool,

    /// 启用调试日志
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// 构建遍历策略：先解析命令字符串，再应用单独的选项
    pub fn build_policy(&self) -> TraversalPolicy {
        let mut policy = self
            .commands
            .as_deref()
            .map(TraversalPolicy::from_commands)
            .unwrap_or_default();

        if let Some(depth) = self.max_depth {
            policy.max_depth = Some(i64::try_from(depth).unwrap_or(i64::MAX));
        }
        if let Some(depth) = self.min_depth {
            policy.min_depth = depth;
        }
        if let Some(cap) = self.max_horizontal {
            policy.max_matches_per_directory = Some(cap);
        }
        if let Some(prefix) = &self.start_prefix {
            policy = policy.with_start_prefix(Some(prefix.clone()));
        }
        if let Some(secs) = self.timeout {
            policy.timeout = Duration::try_from_secs_f64(secs).ok();
        }
        policy
    }

    /// 构建遍历选项
    pub fn build_options(&self) -> FindOptions {
        FindOptions::from_cli(self)
    }

    /// 正则表达式；未指定时为空模式，匹配所有名称
    pub fn pattern(&self) -> &str {
        self.pattern.as_deref().unwrap_or_default()
    }

    pub fn match_mode(&self) -> MatchMode {
        if self.full_match {
            MatchMode::FullMatch
        } else {
            MatchMode::Find
        }
    }

    /// 构建搜索请求
    pub fn build_request(&self) -> SearchRequest {
        SearchRequest::new(&self.root, self.pattern())
            .with_ignore_case(self.ignore_case)
            .with_mode(self.match_mode())
            .with_policy(self.build_policy())
            .with_options(self.build_options())
    }

    /// 显示过滤器；两个选项都没有指定时显示全部
    pub fn kind_filter(&self) -> KindFilter {
        if !self.files && !self.folders {
            KindFilter::all()
        } else {
            KindFilter::new(self.files, self.folders)
        }
    }

    /// 验证命令行参数
    pub fn validate(&self) -> Result<(), SearchError> {
        validate_root(&self.root)?;
        PatternMatcher::with_options(self.pattern(), self.ignore_case, self.match_mode())?;
        Ok(())
    }
}
