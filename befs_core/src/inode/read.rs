//! Inode 读取和解码

use core::time::Duration;

use crate::{
    block::{BlockDev, BlockDevice},
    consts::*,
    endian::FsType,
    error::{Corruption, Error, ErrorKind, Result},
    superblock::Volume,
    types::{BlockRun, DataStream, DiskInode},
};
use log::{error, trace, warn};

use super::InodeFlags;

/// inode 的数据区，按 mode 二选一
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InodeData {
    /// 普通文件 / 目录 / 属性等的数据流
    Stream(DataStream),
    /// 内联符号链接目标（NUL 结尾）
    Symlink([u8; BEFS_SYMLINK_LEN]),
}

/// 解码 inode 块
///
/// # 参数
///
/// * `block` - inode 所在块的内容（至少 248 字节）
/// * `fs_type` - 字节序变体
///
/// # 返回
///
/// 魔数错误返回 `Corrupted(BadMagic)`，未使用或已删除返回 `Corrupted(NotInUse)`
pub fn decode_inode(block: &[u8], fs_type: FsType) -> Result<Inode> {
    let raw = DiskInode::decode(block, fs_type)?;

    if raw.magic1 != BEFS_INODE_MAGIC1 {
        error!("bad inode magic {:#x}", raw.magic1);
        return Err(Error::corrupted(
            Corruption::BadMagic,
            "inode has bad magic header",
        ));
    }

    let flags = InodeFlags::from_bits_retain(raw.flags);
    if !flags.contains(InodeFlags::IN_USE) || flags.contains(InodeFlags::DELETED) {
        error!("inode {:?} is not in use (flags {:#x})", raw.inode_num, raw.flags);
        return Err(Error::corrupted(Corruption::NotInUse, "inode is not in use"));
    }

    let data = if raw.mode & S_IFMT == S_IFLNK {
        InodeData::Symlink(raw.data)
    } else {
        InodeData::Stream(DataStream::from_bytes(&raw.data, fs_type)?)
    };

    Ok(Inode {
        inode_num: raw.inode_num,
        uid: raw.uid,
        gid: raw.gid,
        mode: raw.mode,
        flags,
        create_time: raw.create_time,
        last_modified_time: raw.last_modified_time,
        parent: raw.parent,
        attributes: raw.attributes,
        inode_type: raw.inode_type,
        inode_size: raw.inode_size,
        data,
    })
}

/// 已解码的 inode
///
/// 每次从磁盘读取都会重新解码，之后不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inode {
    inode_num: BlockRun,
    uid: u32,
    gid: u32,
    mode: u32,
    flags: InodeFlags,
    create_time: u64,
    last_modified_time: u64,
    parent: BlockRun,
    attributes: BlockRun,
    inode_type: u32,
    inode_size: u32,
    data: InodeData,
}

impl Inode {
    /// 按 inode 编号从块设备加载
    ///
    /// inode 编号就是 inode 所在的绝对块号。
    ///
    /// # 参数
    ///
    /// * `bdev` - 块设备引用
    /// * `vol` - 卷上下文
    /// * `ino` - inode 编号
    pub fn load<D: BlockDevice>(bdev: &mut BlockDev<D>, vol: &Volume, ino: u64) -> Result<Self> {
        if ino == 0 {
            return Err(Error::new(ErrorKind::InvalidInput, "invalid inode number (0)"));
        }
        if ino >= bdev.total_blocks() {
            error!("inode {} lies beyond the device ({} blocks)", ino, bdev.total_blocks());
            return Err(Error::corrupted(
                Corruption::OutOfBounds,
                "inode number beyond device",
            ));
        }
        trace!("load inode {}", ino);

        let block = bdev.read_blocks(ino, 1)?;
        let inode = decode_inode(&block, vol.fs_type())?;

        let self_ino = vol.ino(&inode.inode_num);
        if self_ino != ino {
            warn!("inode {} records its own address as {}", ino, self_ino);
        }
        Ok(inode)
    }

    /// 按 inode 地址加载
    pub fn load_run<D: BlockDevice>(
        bdev: &mut BlockDev<D>,
        vol: &Volume,
        run: &BlockRun,
    ) -> Result<Self> {
        if run.is_empty() {
            return Err(Error::new(ErrorKind::NotFound, "empty inode address"));
        }
        Self::load(bdev, vol, vol.ino(run))
    }

    /// inode 自身地址
    pub fn inode_num(&self) -> BlockRun {
        self.inode_num
    }

    pub fn uid(&self) -> u32 {
        self.uid
    }

    pub fn gid(&self) -> u32 {
        self.gid
    }

    /// 文件模式（类型 + 权限）
    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// 权限位
    pub fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }

    pub fn flags(&self) -> InodeFlags {
        self.flags
    }

    pub fn is_dir(&self) -> bool {
        self.mode & S_IFMT == S_IFDIR
    }

    pub fn is_file(&self) -> bool {
        self.mode & S_IFMT == S_IFREG
    }

    pub fn is_symlink(&self) -> bool {
        self.mode & S_IFMT == S_IFLNK
    }

    /// 逻辑大小；符号链接为 0
    pub fn size(&self) -> u64 {
        match &self.data {
            InodeData::Stream(ds) => ds.size,
            InodeData::Symlink(_) => 0,
        }
    }

    pub fn data(&self) -> &InodeData {
        &self.data
    }

    pub fn data_stream(&self) -> Option<&DataStream> {
        match &self.data {
            InodeData::Stream(ds) => Some(ds),
            InodeData::Symlink(_) => None,
        }
    }

    /// 内联符号链接目标，不含结尾的 NUL
    pub fn symlink_target(&self) -> Option<&[u8]> {
        match &self.data {
            InodeData::Symlink(buf) => {
                let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
                Some(&buf[..len])
            }
            InodeData::Stream(_) => None,
        }
    }

    /// 创建时间（自 UNIX 纪元）
    pub fn created(&self) -> Duration {
        Duration::from_secs(self.create_time >> 16)
    }

    /// 最后修改时间
    pub fn modified(&self) -> Duration {
        Duration::from_secs(self.last_modified_time >> 16)
    }

    /// 访问时间，BeFS 不记录，用修改时间代替
    pub fn accessed(&self) -> Duration {
        self.modified()
    }

    pub fn parent(&self) -> BlockRun {
        self.parent
    }

    /// 属性目录的 inode 地址
    pub fn attributes(&self) -> BlockRun {
        self.attributes
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// 属性 / 索引的类型码
    pub fn inode_type(&self) -> u32 {
        self.inode_type
    }

    /// inode 占用的字节数
    pub fn inode_size(&self) -> u32 {
        self.inode_size
    }
}
