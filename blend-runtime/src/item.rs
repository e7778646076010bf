//! # Item 模块
//!
//! 宿主道具对象的接口。blend-runtime 不持有道具实体，只通过 [`BlendTarget`]
//! 读取 vnum、写入 socket。

use crate::table::BlendRoll;

/// socket 0：属性类型
pub const SOCKET_APPLY_TYPE: usize = 0;
/// socket 1：属性值
pub const SOCKET_APPLY_VALUE: usize = 1;
/// socket 2：持续时间
pub const SOCKET_APPLY_DURATION: usize = 2;

/// 可写入合成属性的道具
pub trait BlendTarget {
    /// 道具 vnum
    fn vnum(&self) -> u32;

    /// 写入 socket
    fn set_socket(&mut self, index: usize, value: i32);
}

/// [`crate::BlendStore::apply_to_item`] 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// 已写入 socket 0/1/2
    Applied(BlendRoll),
    /// 奖励池道具：创建时不写入，使用时再抽取
    Deferred,
    /// 没有对应的合成表条目，未写入
    Unresolved,
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// 把抽取结果写入道具
pub fn write_sockets<T: BlendTarget + ?Sized>(item: &mut T, roll: &BlendRoll) {
    item.set_socket(SOCKET_APPLY_TYPE, roll.apply_type);
    item.set_socket(SOCKET_APPLY_VALUE, roll.apply_value);
    item.set_socket(SOCKET_APPLY_DURATION, roll.apply_duration);
}
