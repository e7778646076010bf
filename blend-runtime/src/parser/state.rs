//! # 记录状态机
//!
//! ```text
//!            section                        end
//!   Idle ─────────────────► InBlend ───────────────► Idle (+BlendEntry)
//!     │   energy_crystal_bonus              end
//!     └───────────────────► InBonus ───────────────► Idle (+BonusRecord)
//! ```
//!
//! 字段只在允许它的状态下被接受，其余情况一律报错。

use crate::apply_type::ApplyTypeLookup;
use crate::error::ParseError;
use crate::table::{BlendEntry, BonusRecord};
use crate::tier::TIER_COUNT;

use super::helpers::{parse_number, take_one, take_tiers};

pub const KEY_SECTION: &str = "section";
pub const KEY_BONUS: &str = "energy_crystal_bonus";
pub const KEY_END: &str = "end";
pub const KEY_ITEM_VNUM: &str = "item_vnum";
pub const KEY_BONUS_INDEX: &str = "bonus_index";
pub const KEY_APPLY_TYPE: &str = "apply_type";
pub const KEY_APPLY_VALUE: &str = "apply_value";
pub const KEY_APPLY_DURATION: &str = "apply_duration";

/// 解析器认识的全部键
pub const KNOWN_KEYS: [&str; 8] = [
    KEY_SECTION,
    KEY_BONUS,
    KEY_END,
    KEY_ITEM_VNUM,
    KEY_BONUS_INDEX,
    KEY_APPLY_TYPE,
    KEY_APPLY_VALUE,
    KEY_APPLY_DURATION,
];

/// 两类记录共有的字段
#[derive(Debug, Default)]
struct ApplyDraft {
    apply_type: Option<i32>,
    apply_values: Option<[i32; TIER_COUNT]>,
    apply_durations: Option<[i32; TIER_COUNT]>,
}

impl ApplyDraft {
    /// 处理 `apply_*` 字段；不是 `apply_*` 时返回 `false`
    fn accept(
        &mut self,
        key: &str,
        args: &[&str],
        line: usize,
        lookup: &dyn ApplyTypeLookup,
    ) -> Result<bool, ParseError> {
        match key {
            KEY_APPLY_TYPE => {
                let token = take_one(key, args, line)?;
                self.apply_type = Some(lookup.code_of(token));
            }
            KEY_APPLY_VALUE => self.apply_values = Some(take_tiers(key, args, line)?),
            KEY_APPLY_DURATION => self.apply_durations = Some(take_tiers(key, args, line)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn finish(
        self,
        line: usize,
        record: &'static str,
    ) -> Result<(i32, [i32; TIER_COUNT], [i32; TIER_COUNT]), ParseError> {
        let missing = |field| ParseError::MissingField {
            line,
            field,
            record,
        };
        Ok((
            self.apply_type.ok_or_else(|| missing(KEY_APPLY_TYPE))?,
            self.apply_values.ok_or_else(|| missing(KEY_APPLY_VALUE))?,
            self.apply_durations
                .ok_or_else(|| missing(KEY_APPLY_DURATION))?,
        ))
    }
}

/// `section` 记录草稿
#[derive(Debug, Default)]
pub struct BlendDraft {
    item_vnum: Option<u32>,
    apply: ApplyDraft,
}

/// `energy_crystal_bonus` 记录草稿
#[derive(Debug, Default)]
pub struct BonusDraft {
    bonus_index: Option<i32>,
    apply: ApplyDraft,
}

/// 完成的记录
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Blend(BlendEntry),
    Bonus(BonusRecord),
}

/// 解析器状态
#[derive(Debug, Default)]
pub enum ParserState {
    /// 记录之外
    #[default]
    Idle,
    /// `section` ... `end`
    InBlend(BlendDraft),
    /// `energy_crystal_bonus` ... `end`
    InBonus(BonusDraft),
}

impl ParserState {
    /// 当前记录的关键字（用于错误信息）
    pub fn record_name(&self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::InBlend(_) => Some(KEY_SECTION),
            Self::InBonus(_) => Some(KEY_BONUS),
        }
    }

    /// 处理一个已知键
    ///
    /// 遇到 `end` 时返回完成的记录。
    pub fn feed(
        &mut self,
        key: &str,
        args: &[&str],
        line: usize,
        lookup: &dyn ApplyTypeLookup,
    ) -> Result<Option<Record>, ParseError> {
        match key {
            KEY_SECTION | KEY_BONUS => {
                if let Some(record) = self.record_name() {
                    return Err(ParseError::UnterminatedRecord { line, record });
                }
                *self = if key == KEY_SECTION {
                    Self::InBlend(BlendDraft::default())
                } else {
                    Self::InBonus(BonusDraft::default())
                };
                Ok(None)
            }
            KEY_END => match std::mem::take(self) {
                Self::Idle => Err(ParseError::UnexpectedEnd { line }),
                Self::InBlend(draft) => {
                    let item_vnum = draft.item_vnum.ok_or(ParseError::MissingField {
                        line,
                        field: KEY_ITEM_VNUM,
                        record: KEY_SECTION,
                    })?;
                    let (apply_type, apply_values, apply_durations) =
                        draft.apply.finish(line, KEY_SECTION)?;
                    Ok(Some(Record::Blend(BlendEntry {
                        item_vnum,
                        apply_type,
                        apply_values,
                        apply_durations,
                    })))
                }
                Self::InBonus(draft) => {
                    let bonus_index = draft.bonus_index.ok_or(ParseError::MissingField {
                        line,
                        field: KEY_BONUS_INDEX,
                        record: KEY_BONUS,
                    })?;
                    let (apply_type, apply_values, apply_durations) =
                        draft.apply.finish(line, KEY_BONUS)?;
                    Ok(Some(Record::Bonus(BonusRecord {
                        bonus_index,
                        apply_type,
                        apply_values,
                        apply_durations,
                    })))
                }
            },
            _ => {
                self.feed_field(key, args, line, lookup)?;
                Ok(None)
            }
        }
    }

    fn feed_field(
        &mut self,
        key: &str,
        args: &[&str],
        line: usize,
        lookup: &dyn ApplyTypeLookup,
    ) -> Result<(), ParseError> {
        let not_allowed = |record| ParseError::KeyNotAllowed {
            line,
            key: key.to_string(),
            record,
        };

        match self {
            Self::Idle => Err(ParseError::KeyOutsideRecord {
                line,
                key: key.to_string(),
            }),
            Self::InBlend(draft) => {
                if key == KEY_ITEM_VNUM {
                    let token = take_one(key, args, line)?;
                    draft.item_vnum = Some(parse_number(key, token, line)?);
                    return Ok(());
                }
                if draft.apply.accept(key, args, line, lookup)? {
                    Ok(())
                } else {
                    Err(not_allowed(KEY_SECTION))
                }
            }
            Self::InBonus(draft) => {
                if key == KEY_BONUS_INDEX {
                    let token = take_one(key, args, line)?;
                    draft.bonus_index = Some(parse_number(key, token, line)?);
                    return Ok(());
                }
                if draft.apply.accept(key, args, line, lookup)? {
                    Ok(())
                } else {
                    Err(not_allowed(KEY_BONUS))
                }
            }
        }
    }

    /// 文件结束时检查是否有未闭合的记录
    pub fn finish(self, line: usize) -> Result<(), ParseError> {
        match self.record_name() {
            Some(record) => Err(ParseError::UnterminatedRecord { line, record }),
            None => Ok(()),
        }
    }
}
