//! 块设备核心类型

use crate::error::{Corruption, Error, Result};

/// 块设备接口
///
/// 由宿主环境实现，按扇区提供只读访问。BeFS 的块大小在挂载时才从
/// superblock 得知，所以设备只需要报告扇区大小。
///
/// # 示例
///
/// ```rust,ignore
/// use befs_core::{BlockDevice, Result};
///
/// struct RamDisk {
///     data: Vec<u8>,
/// }
///
/// impl BlockDevice for RamDisk {
///     fn sector_size(&self) -> u32 {
///         512
///     }
///
///     fn total_sectors(&self) -> u64 {
///         self.data.len() as u64 / 512
///     }
///
///     fn read_sectors(&mut self, lba: u64, count: u32, buf: &mut [u8]) -> Result<usize> {
///         let start = lba as usize * 512;
///         let len = count as usize * 512;
///         buf[..len].copy_from_slice(&self.data[start..start + len]);
///         Ok(len)
///     }
/// }
/// ```
pub trait BlockDevice {
    /// 物理扇区大小（通常 512）
    fn sector_size(&self) -> u32;

    /// 总扇区数
    fn total_sectors(&self) -> u64;

    /// 读取扇区
    ///
    /// # 参数
    ///
    /// * `lba` - 起始扇区号
    /// * `count` - 要读取的扇区数
    /// * `buf` - 目标缓冲区（大小至少为 count * sector_size）
    ///
    /// # 返回
    ///
    /// 成功返回实际读取的字节数
    fn read_sectors(&mut self, lba: u64, count: u32, buf: &mut [u8]) -> Result<usize>;
}

/// 块设备包装器
///
/// 把扇区设备变成按卷块大小寻址的块读取能力，并记录读取次数。
pub struct BlockDev<D> {
    /// 底层设备
    device: D,
    /// 卷块大小（挂载前为 1024）
    block_size: u32,
    /// 分区偏移（字节）
    partition_offset: u64,
    /// 读取次数
    read_count: u64,
}

impl<D: BlockDevice> BlockDev<D> {
    /// 创建新的块设备包装器
    pub fn new(device: D) -> Self {
        Self {
            device,
            block_size: 1024,
            partition_offset: 0,
            read_count: 0,
        }
    }

    /// 获取底层设备的引用
    pub fn device(&self) -> &D {
        &self.device
    }

    /// 获取底层设备的可变引用
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// 取回底层设备
    pub fn into_inner(self) -> D {
        self.device
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// 设置卷块大小，由挂载流程在校验 superblock 之后调用
    pub fn set_block_size(&mut self, block_size: u32) {
        self.block_size = block_size;
    }

    pub fn sector_size(&self) -> u32 {
        self.device.sector_size()
    }

    /// 设备容量（字节）
    pub fn capacity(&self) -> u64 {
        self.device
            .total_sectors()
            .saturating_mul(self.device.sector_size() as u64)
    }

    pub fn read_count(&self) -> u64 {
        self.read_count
    }

    /// 设置分区起始偏移（字节）
    pub fn set_partition_offset(&mut self, offset: u64) {
        self.partition_offset = offset;
    }

    pub fn partition_offset(&self) -> u64 {
        self.partition_offset
    }

    /// 将块号转换为扇区号
    ///
    /// 块号来自磁盘数据，字节偏移溢出时返回 `Corrupted(OutOfBounds)`
    pub(super) fn logical_to_physical(&self, lba: u64) -> Result<u64> {
        let sector_size = self.device.sector_size() as u64;
        lba.checked_mul(self.block_size as u64)
            .and_then(|offset| offset.checked_add(self.partition_offset))
            .map(|offset| offset / sector_size)
            .ok_or(Error::corrupted(
                Corruption::OutOfBounds,
                "block number out of range",
            ))
    }

    /// 设备上的块数（按当前卷块大小）
    pub fn total_blocks(&self) -> u64 {
        self.capacity() / self.block_size as u64
    }

    /// 每个块包含的扇区数
    pub(super) fn sectors_per_block(&self) -> u32 {
        self.block_size / self.device.sector_size()
    }

    pub(super) fn inc_read_count(&mut self) {
        self.read_count += 1;
    }
}
