//! befs-core: BeFS 只读文件系统的纯 Rust 实现
//!
//! 支持 X86（小端）和 PPC（大端）两种卷，字节序由挂载配置决定。

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod block;
pub mod consts;
pub mod dir;
pub mod endian;
pub mod error;
pub mod extent;
pub mod fs;
pub mod index;
pub mod inode;
pub mod superblock;
pub mod types;

#[cfg(test)]
mod test_utils;

// 重新导出常用类型
pub use block::{BlockDev, BlockDevice};
#[cfg(feature = "std")]
pub use block::FileBlockDevice;
pub use dir::{DirCursor, DirEntry};
pub use endian::FsType;
pub use error::{Corruption, Error, ErrorKind, Result};
pub use fs::{BefsFileSystem, File, FileMetadata, FileType, FsConfig, StatFs};
pub use inode::{Inode, InodeData, InodeFlags};
pub use superblock::{Superblock, Volume};
pub use types::{BlockRun, DataStream};
