//! # Parser 模块
//!
//! `blend.txt` 解析器：逐行分词，交给记录状态机处理。
//!
//! ## 文件格式
//!
//! ```text
//! # 注释
//! section
//!     item_vnum       50821
//!     apply_type      APPLY_ATT_SPEED
//!     apply_value     1 2 3 4 5
//!     apply_duration  60 120 180 240 300
//! end
//!
//! energy_crystal_bonus
//!     bonus_index     0
//!     apply_type      MAX_HP
//!     apply_value     100 200 300 400 500
//!     apply_duration  600 600 900 900 1200
//! end
//! ```
//!
//! ## 设计原则
//!
//! - 任一记录格式错误都让整次解析失败，不返回部分表
//! - 未知键忽略并记录警告，便于向前兼容
//!
//! ## 模块结构
//!
//! - `helpers`: 分词与数值读取
//! - `state`: 记录状态机

mod helpers;
mod state;

#[cfg(test)]
mod tests;

use std::fs;
use std::path::Path;

use crate::apply_type::{ApplyTypeLookup, ApplyTypeTable};
use crate::error::{LoadError, LoadResult, ParseError};
use crate::table::BlendTables;

use helpers::{is_comment, tokenize};
use state::{KNOWN_KEYS, ParserState, Record};

pub use state::{
    KEY_APPLY_DURATION, KEY_APPLY_TYPE, KEY_APPLY_VALUE, KEY_BONUS, KEY_BONUS_INDEX, KEY_END,
    KEY_ITEM_VNUM, KEY_SECTION,
};

/// blend 配置解析器
pub struct BlendParser<L = ApplyTypeTable> {
    /// 属性名映射
    lookup: L,
    /// 解析警告（非致命）
    warnings: Vec<String>,
}

impl BlendParser<ApplyTypeTable> {
    /// 使用内置属性表创建解析器
    pub fn new() -> Self {
        Self::with_lookup(ApplyTypeTable::standard())
    }
}

impl Default for BlendParser<ApplyTypeTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ApplyTypeLookup> BlendParser<L> {
    /// 使用自定义属性名映射创建解析器
    pub fn with_lookup(lookup: L) -> Self {
        Self {
            lookup,
            warnings: Vec::new(),
        }
    }

    /// 从文件加载
    ///
    /// 文件不存在、不可读或格式错误时返回错误，不会产生部分表。
    pub fn load(&mut self, path: impl AsRef<Path>) -> LoadResult<BlendTables> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(LoadError::EmptyPath);
        }

        let text = fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        tracing::info!(path = %path.display(), "加载 blend 文件");
        Ok(self.parse(&text)?)
    }

    /// 解析文本
    pub fn parse(&mut self, text: &str) -> Result<BlendTables, ParseError> {
        self.warnings.clear();

        let mut tables = BlendTables::new();
        let mut state = ParserState::Idle;
        let mut last_line = 0;

        for (line_idx, raw) in text.lines().enumerate() {
            let line_number = line_idx + 1;
            last_line = line_number;

            if is_comment(raw) {
                continue;
            }

            let tokens: Vec<&str> = tokenize(raw).collect();
            let Some((&key, args)) = tokens.split_first() else {
                continue;
            };

            if !KNOWN_KEYS.iter().any(|known| *known == key) {
                tracing::warn!(line = line_number, key, "忽略未知键");
                self.warnings
                    .push(format!("第 {line_number} 行：忽略未知键 '{key}'"));
                continue;
            }

            match state.feed(key, args, line_number, &self.lookup)? {
                Some(Record::Blend(entry)) => {
                    tracing::info!(
                        item_vnum = entry.item_vnum,
                        apply_type = entry.apply_type,
                        "合成道具已加载"
                    );
                    tables.blends.push(entry);
                }
                Some(Record::Bonus(record)) => {
                    tracing::info!(
                        bonus_index = record.bonus_index,
                        apply_type = record.apply_type,
                        values = ?record.apply_values,
                        durations = ?record.apply_durations,
                        "奖励池 bonus 已加载"
                    );
                    tables.bonuses.push(record);
                }
                None => {}
            }
        }

        state.finish(last_line)?;
        tracing::info!(
            blends = tables.blends.len(),
            bonuses = tables.bonuses.len(),
            "blend 表解析完成"
        );
        Ok(tables)
    }

    /// 获取上次解析的警告
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}
