//! # Apply Type 模块
//!
//! `apply_type` 字段的名称 → 数值代码映射。
//!
//! 解析器只依赖 [`ApplyTypeLookup`] trait，宿主可以传入自己的映射
//! （例如与道具系统共享的属性表）；[`ApplyTypeTable`] 是内置的默认实现。

use std::collections::HashMap;

/// 属性类型代码：未知名称
pub const APPLY_NONE: i32 = 0;

/// 名称 → 属性类型代码
///
/// 必须是全函数：未知名称也要返回一个代码（通常是 [`APPLY_NONE`]）。
pub trait ApplyTypeLookup {
    fn code_of(&self, token: &str) -> i32;
}

impl<F> ApplyTypeLookup for F
where
    F: Fn(&str) -> i32,
{
    fn code_of(&self, token: &str) -> i32 {
        self(token)
    }
}

/// 标准属性名，下标即代码
const STANDARD_APPLY_NAMES: &[&str] = &[
    "NONE",
    "MAX_HP",
    "MAX_SP",
    "CON",
    "INT",
    "STR",
    "DEX",
    "ATT_SPEED",
    "MOV_SPEED",
    "CAST_SPEED",
    "HP_REGEN",
    "SP_REGEN",
    "POISON_PCT",
    "STUN_PCT",
    "SLOW_PCT",
    "CRITICAL_PCT",
    "PENETRATE_PCT",
    "ATTBONUS_HUMAN",
    "ATTBONUS_ANIMAL",
    "ATTBONUS_ORC",
    "ATTBONUS_MILGYO",
    "ATTBONUS_UNDEAD",
    "ATTBONUS_DEVIL",
    "STEAL_HP",
    "STEAL_SP",
    "MANA_BURN_PCT",
    "DAMAGE_SP_RECOVER",
    "BLOCK",
    "DODGE",
    "RESIST_SWORD",
    "RESIST_TWOHAND",
    "RESIST_DAGGER",
    "RESIST_BELL",
    "RESIST_FAN",
    "RESIST_BOW",
    "RESIST_FIRE",
    "RESIST_ELEC",
    "RESIST_MAGIC",
    "RESIST_WIND",
    "REFLECT_MELEE",
    "REFLECT_CURSE",
    "POISON_REDUCE",
    "KILL_SP_RECOVER",
    "EXP_DOUBLE_BONUS",
    "GOLD_DOUBLE_BONUS",
    "ITEM_DROP_BONUS",
    "POTION_BONUS",
    "KILL_HP_RECOVER",
    "IMMUNE_STUN",
    "IMMUNE_SLOW",
    "IMMUNE_FALL",
    "SKILL",
    "BOW_DISTANCE",
    "ATT_GRADE_BONUS",
    "DEF_GRADE_BONUS",
    "MAGIC_ATT_GRADE",
    "MAGIC_DEF_GRADE",
    "CURSE_PCT",
    "MAX_STAMINA",
    "ATTBONUS_WARRIOR",
    "ATTBONUS_ASSASSIN",
    "ATTBONUS_SURA",
    "ATTBONUS_SHAMAN",
    "ATTBONUS_MONSTER",
];

/// 内置属性表
///
/// 名称不区分大小写，可带 `APPLY_` 前缀（`APPLY_ATT_SPEED` 与 `att_speed` 等价）。
#[derive(Debug, Clone)]
pub struct ApplyTypeTable {
    codes: HashMap<String, i32>,
}

impl ApplyTypeTable {
    /// 空表：所有名称都映射为 [`APPLY_NONE`]
    pub fn empty() -> Self {
        Self {
            codes: HashMap::new(),
        }
    }

    /// 标准属性表
    pub fn standard() -> Self {
        let mut table = Self::empty();
        for (code, name) in STANDARD_APPLY_NAMES.iter().enumerate() {
            table.insert(name, code as i32);
        }
        table
    }

    /// 添加或覆盖一个名称
    pub fn insert(&mut self, name: &str, code: i32) {
        self.codes.insert(normalize(name), code);
    }

    /// 查找名称；未知名称返回 `None`
    pub fn get(&self, token: &str) -> Option<i32> {
        self.codes.get(&normalize(token)).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for ApplyTypeTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ApplyTypeLookup for ApplyTypeTable {
    fn code_of(&self, token: &str) -> i32 {
        match self.get(token) {
            Some(code) => code,
            None => {
                tracing::warn!(token, "未知的 apply_type，按 NONE 处理");
                APPLY_NONE
            }
        }
    }
}

fn normalize(name: &str) -> String {
    let upper = name.trim().to_ascii_uppercase();
    match upper.strip_prefix("APPLY_") {
        Some(rest) => rest.to_string(),
        None => upper,
    }
}
