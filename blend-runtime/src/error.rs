//! # Error 模块
//!
//! 定义 blend-runtime 中使用的错误类型。

use thiserror::Error;

/// 解析错误
///
/// 任意一条都会让整次加载失败，不产生部分表。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// 键后面的值不足
    #[error("第 {line} 行：'{key}' 需要 {expected} 个值，实际只有 {found} 个")]
    MissingValue {
        line: usize,
        key: String,
        expected: usize,
        found: usize,
    },

    /// 无效的数字
    #[error("第 {line} 行：'{key}' 的值 '{token}' 不是有效数字")]
    InvalidNumber {
        line: usize,
        key: String,
        token: String,
    },

    /// 记录之外出现的字段
    #[error("第 {line} 行：'{key}' 出现在记录之外")]
    KeyOutsideRecord { line: usize, key: String },

    /// 当前记录类型不接受该字段
    #[error("第 {line} 行：'{record}' 记录中不允许出现 '{key}'")]
    KeyNotAllowed {
        line: usize,
        key: String,
        record: &'static str,
    },

    /// 记录未以 `end` 结束
    #[error("第 {line} 行：'{record}' 记录未以 end 结束")]
    UnterminatedRecord { line: usize, record: &'static str },

    /// 没有打开的记录却遇到 `end`
    #[error("第 {line} 行：多余的 end")]
    UnexpectedEnd { line: usize },

    /// 记录缺少必需字段
    #[error("第 {line} 行：'{record}' 记录缺少字段 '{field}'")]
    MissingField {
        line: usize,
        field: &'static str,
        record: &'static str,
    },
}

/// 加载错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// 未提供文件路径
    #[error("blend 文件路径为空")]
    EmptyPath,

    /// 文件不存在或不可读
    #[error("无法读取 {path}: {message}")]
    Io { path: String, message: String },

    /// 文件内容格式错误
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),
}

/// 奖励池错误
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// 奖励池为空
    #[error("奖励池为空，没有可用的 bonus 记录")]
    Empty,
}

/// Result 类型别名
pub type LoadResult<T> = Result<T, LoadError>;
