//! # 辅助解析函数
//!
//! 分词与数值读取。所有函数都带行号，以便错误定位。

use std::str::FromStr;

use crate::error::ParseError;
use crate::tier::TIER_COUNT;

/// 分隔符：空格、制表符、回车、换行
const DELIMITERS: [char; 4] = [' ', '\t', '\r', '\n'];

/// 按分隔符切分一行，跳过空 token
pub fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    line.split(DELIMITERS).filter(|token| !token.is_empty())
}

/// 是否为注释行（首个非空白字符是 `#`）
pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// 解析单个数字
pub fn parse_number<T: FromStr>(key: &str, token: &str, line: usize) -> Result<T, ParseError> {
    token.parse::<T>().map_err(|_| ParseError::InvalidNumber {
        line,
        key: key.to_string(),
        token: token.to_string(),
    })
}

/// 取键后的第一个值
pub fn take_one<'a>(key: &str, args: &[&'a str], line: usize) -> Result<&'a str, ParseError> {
    args.first().copied().ok_or_else(|| ParseError::MissingValue {
        line,
        key: key.to_string(),
        expected: 1,
        found: 0,
    })
}

/// 按文件顺序读取 5 个档位值，多余的值忽略
pub fn take_tiers(key: &str, args: &[&str], line: usize) -> Result<[i32; TIER_COUNT], ParseError> {
    if args.len() < TIER_COUNT {
        return Err(ParseError::MissingValue {
            line,
            key: key.to_string(),
            expected: TIER_COUNT,
            found: args.len(),
        });
    }

    let mut tiers = [0; TIER_COUNT];
    for (slot, token) in tiers.iter_mut().zip(args) {
        *slot = parse_number(key, token, line)?;
    }
    Ok(tiers)
}
