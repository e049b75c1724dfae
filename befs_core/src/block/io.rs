//! 块 I/O 操作实现

use super::{BlockDev, BlockDevice};
use crate::{
    error::{Error, ErrorKind, Result},
    types::BlockRun,
};
use alloc::{vec, vec::Vec};

impl<D: BlockDevice> BlockDev<D> {
    /// 读取单个块
    ///
    /// # 参数
    ///
    /// * `lba` - 绝对块号
    /// * `buf` - 目标缓冲区（大小至少为 block_size）
    ///
    /// # 返回
    ///
    /// 成功返回读取的字节数
    pub fn read_block(&mut self, lba: u64, buf: &mut [u8]) -> Result<usize> {
        let block_size = self.block_size() as usize;

        if buf.len() < block_size {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "buffer too small for block",
            ));
        }

        let pba = self.logical_to_physical(lba)?;
        let count = self.sectors_per_block();

        self.inc_read_count();
        let n = self.device_mut().read_sectors(pba, count, &mut buf[..block_size])?;
        if n < block_size {
            log::error!("short read at block {}: {} of {} bytes", lba, n, block_size);
            return Err(Error::new(ErrorKind::Io, "short block read"));
        }
        Ok(n)
    }

    /// 读取连续的多个块
    ///
    /// 这是上层（extent / index / inode）使用的块读取能力，
    /// 失败直接向上传播，不重试。
    pub fn read_blocks(&mut self, lba: u64, count: u32) -> Result<Vec<u8>> {
        let block_size = self.block_size() as usize;
        let mut buf = vec![0u8; block_size * count as usize];
        for (i, chunk) in buf.chunks_mut(block_size).enumerate() {
            self.read_block(lba.saturating_add(i as u64), chunk)?;
        }
        Ok(buf)
    }

    /// 读取一个 block run 覆盖的全部块
    pub fn read_run(&mut self, run: &BlockRun, ag_shift: u32) -> Result<Vec<u8>> {
        self.read_blocks(run.block_number(ag_shift), run.len as u32)
    }

    /// 读取字节
    ///
    /// 以扇区为粒度，不依赖卷块大小，挂载前读取 superblock 时使用。
    ///
    /// # 参数
    ///
    /// * `offset` - 相对分区起点的字节偏移
    /// * `buf` - 目标缓冲区
    ///
    /// # 返回
    ///
    /// 成功返回读取的字节数
    pub fn read_bytes(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let len = buf.len();
        let sector_size = self.sector_size() as u64;
        let offset = offset + self.partition_offset();

        let start_sector = offset / sector_size;
        let sector_offset = (offset % sector_size) as usize;
        let total_size = sector_offset + len;
        let sector_count = (total_size as u64).div_ceil(sector_size) as u32;

        let mut temp = vec![0u8; sector_count as usize * sector_size as usize];

        self.inc_read_count();
        let n = self
            .device_mut()
            .read_sectors(start_sector, sector_count, &mut temp)?;
        if n < total_size {
            return Err(Error::new(ErrorKind::Io, "short read"));
        }

        buf.copy_from_slice(&temp[sector_offset..sector_offset + len]);

        Ok(len)
    }
}
