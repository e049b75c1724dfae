//! 文件元数据与卷统计

use core::time::Duration;

use crate::{consts::*, inode::{Inode, InodeFlags}};

use super::FsConfig;

/// 文件类型（取自 mode 的高 4 位）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileType {
    #[default]
    Unknown,
    Fifo,
    CharacterDevice,
    Directory,
    BlockDevice,
    RegularFile,
    Symlink,
    Socket,
}

impl FileType {
    pub fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFIFO => FileType::Fifo,
            S_IFCHR => FileType::CharacterDevice,
            S_IFDIR => FileType::Directory,
            S_IFBLK => FileType::BlockDevice,
            S_IFREG => FileType::RegularFile,
            S_IFLNK => FileType::Symlink,
            S_IFSOCK => FileType::Socket,
            _ => FileType::Unknown,
        }
    }
}

/// 文件元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// inode 编号
    pub ino: u64,
    /// 文件类型
    pub file_type: FileType,
    /// 完整模式（类型 + 权限）
    pub mode: u32,
    /// 属主，已应用挂载覆盖
    pub uid: u32,
    /// 属组，已应用挂载覆盖
    pub gid: u32,
    /// 文件大小（字节），符号链接为 0
    pub size: u64,
    /// I/O 块大小，取 inode 记录的 inode 大小
    pub blksize: u32,
    /// inode 占用的块数
    pub blocks: u64,
    /// BeFS 不记录访问时间，与修改时间相同
    pub atime: Duration,
    pub mtime: Duration,
    pub ctime: Duration,
    /// inode 标志
    pub flags: InodeFlags,
}

impl FileMetadata {
    pub(crate) fn from_inode(inode: &Inode, ino: u64, block_size: u32, config: &FsConfig) -> Self {
        Self {
            ino,
            file_type: FileType::from_mode(inode.mode()),
            mode: inode.mode(),
            uid: config.effective_uid(inode.uid()),
            gid: config.effective_gid(inode.gid()),
            size: inode.size(),
            blksize: inode.inode_size(),
            blocks: (inode.inode_size() / block_size) as u64,
            atime: inode.accessed(),
            mtime: inode.modified(),
            ctime: inode.modified(),
            flags: inode.flags(),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }

    pub fn is_file(&self) -> bool {
        self.file_type == FileType::RegularFile
    }

    pub fn is_symlink(&self) -> bool {
        self.file_type == FileType::Symlink
    }

    /// 权限位（低 12 位）
    pub fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }
}

/// 卷统计信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatFs {
    pub f_type: u32,   // 文件系统魔数
    pub bsize: u32,    // 块大小
    pub blocks: u64,   // 总块数
    pub bfree: u64,    // 空闲块数
    pub bavail: u64,   // 非特权用户可用块数
    pub files: u64,    // BeFS 不统计 inode 数
    pub ffree: u64,
    pub namelen: u32,  // 文件名最大长度
}
