//! 目录项与遍历游标

use alloc::vec::Vec;

/// 遍历位置：数据流中的第几个节点，节点内的第几个键
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DirCursor {
    pub node: u64,
    pub key: usize,
}

impl DirCursor {
    /// 起始位置
    pub const START: DirCursor = DirCursor { node: 0, key: 0 };

    pub const fn new(node: u64, key: usize) -> Self {
        Self { node, key }
    }
}

/// 目录项（或索引项）
///
/// 名称是磁盘上的原始 UTF-8 字节，字符集转换由调用方负责。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    name: Vec<u8>,
    value: u64,
    next: DirCursor,
}

impl DirEntry {
    pub(super) fn new(name: &[u8], value: u64, next: DirCursor) -> Self {
        Self {
            name: name.to_vec(),
            value,
            next,
        }
    }

    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// 名称不是合法 UTF-8 时返回 `None`
    pub fn name_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.name).ok()
    }

    /// 键对应的值，目录中就是 inode 编号
    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn inode(&self) -> u64 {
        self.value
    }

    /// 从这个位置继续遍历会得到本项之后的剩余序列
    pub fn next_cursor(&self) -> DirCursor {
        self.next
    }

    pub fn is_dot(&self) -> bool {
        self.name == b"." || self.name == b".."
    }
}
