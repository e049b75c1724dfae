//! Superblock 读取和验证

use crate::{
    block::{BlockDev, BlockDevice},
    consts::*,
    endian::FsType,
    error::{Corruption, Error, Result},
    types::{BlockRun, DiskSuperblock},
};
use alloc::vec;
use log::{debug, error, warn};

use super::Volume;

/// 从块设备读取 superblock
///
/// # 参数
///
/// * `bdev` - 块设备引用
/// * `fs_type` - 配置选定的字节序变体，决定 superblock 的位置
///
/// # 返回
///
/// 成功返回已校验的 superblock 结构
pub fn read_superblock<D: BlockDevice>(
    bdev: &mut BlockDev<D>,
    fs_type: FsType,
) -> Result<DiskSuperblock> {
    let mut sb_buf = vec![0u8; BEFS_SUPERBLOCK_SIZE];
    bdev.read_bytes(fs_type.superblock_offset(), &mut sb_buf)?;

    let sb = DiskSuperblock::decode(&sb_buf, fs_type)?;
    validate(&sb, fs_type)?;
    Ok(sb)
}

/// 校验 superblock 的魔数与几何参数
pub fn validate(sb: &DiskSuperblock, fs_type: FsType) -> Result<()> {
    if sb.magic1 != BEFS_SUPER_BLOCK_MAGIC1
        || sb.magic2 != BEFS_SUPER_BLOCK_MAGIC2
        || sb.magic3 != BEFS_SUPER_BLOCK_MAGIC3
    {
        error!(
            "bad superblock magic: {:#x} {:#x} {:#x}",
            sb.magic1, sb.magic2, sb.magic3
        );
        return Err(Error::corrupted(
            Corruption::BadMagic,
            "different magic header",
        ));
    }

    if !BEFS_BLOCK_SIZES.contains(&sb.block_size) {
        error!("unsupported block size {}", sb.block_size);
        return Err(Error::corrupted(
            Corruption::Geometry,
            "different blocksize",
        ));
    }

    if sb.block_shift >= 32 || 1u32 << sb.block_shift != sb.block_size {
        error!(
            "block shift {} does not match block size {}",
            sb.block_shift, sb.block_size
        );
        return Err(Error::corrupted(
            Corruption::Geometry,
            "block shift does not match block size",
        ));
    }

    if sb.fs_byte_order != fs_type.raw() {
        warn!(
            "superblock byte order tag {:#x} differs from configured {:?}",
            sb.fs_byte_order, fs_type
        );
    }

    Ok(())
}

/// Superblock 包装器，提供高级操作
pub struct Superblock {
    inner: DiskSuperblock,
    volume: Volume,
}

impl Superblock {
    /// 从块设备加载 superblock
    pub fn load<D: BlockDevice>(bdev: &mut BlockDev<D>, fs_type: FsType) -> Result<Self> {
        let inner = read_superblock(bdev, fs_type)?;
        let sb = Self::from_disk(inner, fs_type)?;
        debug!(
            "befs superblock: name={:?} block_size={} ag_shift={} blocks={}/{}",
            sb.volume_name(),
            sb.block_size(),
            sb.ag_shift(),
            sb.used_blocks(),
            sb.num_blocks()
        );
        Ok(sb)
    }

    /// 由已解码的结构构造
    pub fn from_disk(inner: DiskSuperblock, fs_type: FsType) -> Result<Self> {
        validate(&inner, fs_type)?;
        let volume = Volume::new(fs_type, inner.block_size, inner.ag_shift)?;
        Ok(Self { inner, volume })
    }

    /// 获取内部 superblock 结构的引用
    pub fn inner(&self) -> &DiskSuperblock {
        &self.inner
    }

    /// 卷上下文
    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    pub fn fs_type(&self) -> FsType {
        self.volume.fs_type()
    }

    pub fn block_size(&self) -> u32 {
        self.inner.block_size
    }

    pub fn block_shift(&self) -> u32 {
        self.inner.block_shift
    }

    pub fn ag_shift(&self) -> u32 {
        self.inner.ag_shift
    }

    pub fn num_blocks(&self) -> u64 {
        self.inner.num_blocks
    }

    pub fn used_blocks(&self) -> u64 {
        self.inner.used_blocks
    }

    pub fn free_blocks(&self) -> u64 {
        self.inner.num_blocks.saturating_sub(self.inner.used_blocks)
    }

    /// 每个 inode 占用的字节数（通常等于块大小）
    pub fn inode_size(&self) -> u32 {
        self.inner.inode_size
    }

    pub fn blocks_per_ag(&self) -> u32 {
        self.inner.blocks_per_ag
    }

    pub fn num_ags(&self) -> u32 {
        self.inner.num_ags
    }

    pub fn root_dir(&self) -> BlockRun {
        self.inner.root_dir
    }

    /// 索引目录的 inode 地址
    pub fn indices(&self) -> BlockRun {
        self.inner.indices
    }

    pub fn log_blocks(&self) -> BlockRun {
        self.inner.log_blocks
    }

    /// 卷名称（UTF-8 字符串）
    pub fn volume_name(&self) -> Option<&str> {
        let len = self
            .inner
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.inner.name.len());

        core::str::from_utf8(&self.inner.name[..len]).ok()
    }

    /// 上次是否干净卸载
    pub fn is_clean(&self) -> bool {
        self.inner.flags == BEFS_CLEAN
    }
}
