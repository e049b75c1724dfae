//! 错误处理模块

use core::fmt;

use crate::consts::*;

/// 结构损坏的具体原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corruption {
    /// 魔数不匹配
    BadMagic,
    /// inode 未使用或已删除
    NotInUse,
    /// 索引节点的键偏移数组非递增，或末项与键总长不符
    KeyOffsets,
    /// 偏移 / 计数超出缓冲区
    OutOfBounds,
    /// 卷几何参数非法（块大小等）
    Geometry,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 块读取失败
    Io,
    /// 磁盘结构损坏
    Corrupted(Corruption),
    /// 名称不存在 / 位置超出数据流（正常结果，不是故障）
    NotFound,
    /// 不支持的字节序变体
    Unsupported,
    /// 下标越界
    OutOfRange,
    /// 读取过程中遇到空洞（空 block run）
    Gap,
    /// 参数无效
    InvalidInput,
    /// 名称过长
    NameTooLong,
    /// 不是目录
    NotDirectory,
    /// 是目录
    IsDirectory,
}

/// BeFS 错误类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
}

impl Error {
    pub const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    pub const fn corrupted(reason: Corruption, message: &'static str) -> Self {
        Self::new(ErrorKind::Corrupted(reason), message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    /// 损坏原因（仅 `Corrupted` 有值）
    pub fn corruption(&self) -> Option<Corruption> {
        match self.kind {
            ErrorKind::Corrupted(reason) => Some(reason),
            _ => None,
        }
    }

    /// 映射为 C errno
    pub fn code(&self) -> i32 {
        match self.kind {
            ErrorKind::Io => EIO,
            ErrorKind::Corrupted(_) => EIO,
            ErrorKind::NotFound => ENOENT,
            ErrorKind::Unsupported => ENOTSUP,
            ErrorKind::OutOfRange => ERANGE,
            ErrorKind::Gap => ENODATA,
            ErrorKind::InvalidInput => EINVAL,
            ErrorKind::NameTooLong => ENAMETOOLONG,
            ErrorKind::NotDirectory => ENOTDIR,
            ErrorKind::IsDirectory => EISDIR,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "befs error {} ({:?}): {}", self.code(), self.kind, self.message)
    }
}

impl core::error::Error for Error {}

/// BeFS Result 类型
pub type Result<T = ()> = core::result::Result<T, Error>;
