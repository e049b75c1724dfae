//! 卷上下文
//!
//! 解码任何结构都需要的三项几何信息：字节序变体、块大小、分配组移位。
//! 每个已挂载的卷只构造一次，之后以只读方式传给各层。

use crate::{
    consts::*,
    endian::FsType,
    error::{Corruption, Error, Result},
    types::BlockRun,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume {
    fs_type: FsType,
    block_size: u32,
    block_shift: u32,
    ag_shift: u32,
}

impl Volume {
    /// 构造卷上下文并检查几何参数
    pub fn new(fs_type: FsType, block_size: u32, ag_shift: u32) -> Result<Self> {
        if !BEFS_BLOCK_SIZES.contains(&block_size) {
            return Err(Error::corrupted(
                Corruption::Geometry,
                "block size must be 1024, 2048, 4096 or 8192",
            ));
        }
        // 块号是 u64，组内起始块是 u16
        if ag_shift == 0 || ag_shift >= 48 {
            return Err(Error::corrupted(
                Corruption::Geometry,
                "allocation group shift out of range",
            ));
        }
        Ok(Self {
            fs_type,
            block_size,
            block_shift: block_size.trailing_zeros(),
            ag_shift,
        })
    }

    pub fn fs_type(&self) -> FsType {
        self.fs_type
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn block_shift(&self) -> u32 {
        self.block_shift
    }

    pub fn ag_shift(&self) -> u32 {
        self.ag_shift
    }

    /// 每个间接块能容纳的 block run 数
    pub fn records_per_block(&self) -> u64 {
        (self.block_size as usize / BEFS_BLOCK_RUN_SIZE) as u64
    }

    /// run 起始块的绝对块号
    pub fn block_number(&self, run: &BlockRun) -> u64 {
        run.block_number(self.ag_shift)
    }

    /// 一个 run 覆盖的字节数
    pub fn run_bytes(&self, run: &BlockRun) -> u64 {
        (run.len as u64) << self.block_shift
    }

    /// inode 地址 → inode 编号
    pub fn ino(&self, run: &BlockRun) -> u64 {
        run.block_number(self.ag_shift)
    }

    /// inode 编号 → inode 地址
    pub fn inode_run(&self, ino: u64) -> BlockRun {
        BlockRun::from_ino(ino, self.ag_shift)
    }
}
