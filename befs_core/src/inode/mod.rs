//! Inode 操作模块
//!
//! 这个模块提供 BeFS inode 的读取、校验和解码。

mod read;

pub use read::*;

bitflags::bitflags! {
    /// inode 标志位
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InodeFlags: u32 {
        const IN_USE = 0x0000_0001;
        /// 属性 inode
        const ATTR_INODE = 0x0000_0004;
        const LOGGED = 0x0000_0008;
        const DELETED = 0x0000_0010;
        /// 以下为运行期标志，不会持久化
        const NO_CREATE = 0x0001_0000;
        const WAS_WRITTEN = 0x0002_0000;
        const NO_TRANSACTION = 0x0004_0000;
    }
}
