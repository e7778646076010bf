//! # Table 模块
//!
//! 合成表（按道具 vnum）与奖励池（供特殊道具使用）的数据结构，以及两种抽取算法。
//!
//! ## 抽取流程
//!
//! ```text
//! 合成表:  vnum ──首个匹配──► BlendEntry ──┬─ select_tier ─► apply_value[t1]
//!                                           └─ select_tier ─► apply_duration[t2]
//!
//! 奖励池:  uniform(0..len) ─► BonusRecord ─┬─ select_tier ─► apply_value[t1]
//!                                           └─ select_tier ─► apply_duration[t2]
//! ```
//!
//! value 档位与 duration 档位是两次独立抽取，互不相关。

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::PoolError;
use crate::tier::{TIER_COUNT, select_tier};

/// 合成表条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlendEntry {
    /// 道具 vnum
    pub item_vnum: u32,
    /// 属性类型代码
    pub apply_type: i32,
    /// 各档位的属性值
    pub apply_values: [i32; TIER_COUNT],
    /// 各档位的持续时间
    pub apply_durations: [i32; TIER_COUNT],
}

/// 奖励池中的一条候选 bonus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusRecord {
    pub bonus_index: i32,
    pub apply_type: i32,
    pub apply_values: [i32; TIER_COUNT],
    pub apply_durations: [i32; TIER_COUNT],
}

/// 一次抽取的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlendRoll {
    pub apply_type: i32,
    pub apply_value: i32,
    pub apply_duration: i32,
}

impl BlendRoll {
    /// 按道具 socket 顺序展开：0 = 类型，1 = 值，2 = 持续时间
    pub fn sockets(&self) -> [i32; 3] {
        [self.apply_type, self.apply_value, self.apply_duration]
    }
}

impl std::fmt::Display for BlendRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "type {}, value {}, duration {}",
            self.apply_type, self.apply_value, self.apply_duration
        )
    }
}

/// 分别为 value 和 duration 抽取档位
fn roll_tiers<R: Rng>(
    rng: &mut R,
    apply_type: i32,
    values: &[i32; TIER_COUNT],
    durations: &[i32; TIER_COUNT],
) -> BlendRoll {
    let value_tier = select_tier(rng);
    let duration_tier = select_tier(rng);
    BlendRoll {
        apply_type,
        apply_value: values[value_tier],
        apply_duration: durations[duration_tier],
    }
}

impl BlendEntry {
    pub fn roll<R: Rng>(&self, rng: &mut R) -> BlendRoll {
        roll_tiers(rng, self.apply_type, &self.apply_values, &self.apply_durations)
    }
}

impl BonusRecord {
    pub fn roll<R: Rng>(&self, rng: &mut R) -> BlendRoll {
        roll_tiers(rng, self.apply_type, &self.apply_values, &self.apply_durations)
    }
}

/// 一次加载得到的完整表
///
/// 加载完成后只读；重新加载时整体替换。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlendTables {
    /// 合成表（文件顺序，允许重复 vnum）
    pub blends: Vec<BlendEntry>,
    /// 奖励池（文件顺序）
    pub bonuses: Vec<BonusRecord>,
}

impl BlendTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// 查找 vnum 对应的条目（首个匹配生效）
    pub fn find_blend(&self, item_vnum: u32) -> Option<&BlendEntry> {
        self.blends.iter().find(|entry| entry.item_vnum == item_vnum)
    }

    /// 为普通合成道具抽取属性；没有条目时返回 `None`
    pub fn resolve_blend<R: Rng>(&self, item_vnum: u32, rng: &mut R) -> Option<BlendRoll> {
        self.find_blend(item_vnum).map(|entry| entry.roll(rng))
    }

    /// 从奖励池中均匀抽一条记录，再分别抽取 value / duration 档位
    pub fn resolve_pool_bonus<R: Rng>(&self, rng: &mut R) -> Result<BlendRoll, PoolError> {
        if self.bonuses.is_empty() {
            return Err(PoolError::Empty);
        }
        let index = rng.random_range(0..self.bonuses.len());
        let record = &self.bonuses[index];
        let roll = record.roll(rng);
        tracing::debug!(
            bonus_index = record.bonus_index,
            apply_type = roll.apply_type,
            apply_value = roll.apply_value,
            apply_duration = roll.apply_duration,
            "从奖励池抽取 bonus"
        );
        Ok(roll)
    }

    pub fn is_empty(&self) -> bool {
        self.blends.is_empty() && self.bonuses.is_empty()
    }
}
