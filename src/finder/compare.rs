//! 大小写敏感性对比
//!
//! 用同一个模式分别以区分大小写和不区分大小写的方式搜索。
//! 两次搜索依次执行，各自的耗时互不干扰。

use std::path::Path;

use log::info;

use crate::errors::SearchResult;
use super::filter::PatternMatcher;
use super::options::FindOptions;
use super::policy::TraversalPolicy;
use super::stats::SearchReport;
use super::task::CancelFlag;
use super::walker::SearchEngine;

/// 两种大小写模式的搜索结果
#[derive(Debug, Clone)]
pub struct CaseComparison {
    pub case_sensitive: SearchReport,
    pub case_insensitive: SearchReport,
}

impl CaseComparison {
    /// 与请求的模式对应的报告
    pub fn requested(&self, ignore_case: bool) -> &SearchReport {
        if ignore_case {
            &self.case_insensitive
        } else {
            &self.case_sensitive
        }
    }

    /// 与请求相反的模式对应的报告
    pub fn opposite(&self, ignore_case: bool) -> &SearchReport {
        self.requested(!ignore_case)
    }
}

/// 依次运行两种大小写模式的搜索
///
/// `root` 必须是已经验证过的目录。两次搜索共享同一个取消标志。
pub fn compare_case_sensitivity(
    root: &Path,
    matcher: &PatternMatcher,
    policy: &TraversalPolicy,
    options: &FindOptions,
    cancel: &CancelFlag,
) -> SearchResult<CaseComparison> {
    let opposite = matcher.with_opposite_case()?;
    let (sensitive, insensitive) = if matcher.ignore_case() {
        (&opposite, matcher)
    } else {
        (matcher, &opposite)
    };

    let engine = SearchEngine::new(policy, options);
    let case_sensitive = engine.run(root, sensitive, &mut (), cancel);
    let case_insensitive = engine.run(root, insensitive, &mut (), cancel);

    info!(
        "Case comparison: sensitive {} matches ({:.2?}), insensitive {} matches ({:.2?})",
        case_sensitive.matches.len(),
        case_sensitive.stats.elapsed,
        case_insensitive.matches.len(),
        case_insensitive.stats.elapsed
    );

    Ok(CaseComparison {
        case_sensitive,
        case_insensitive,
    })
}
