//! 单元测试共用的内存设备和结构构造工具

use alloc::vec::Vec;

use crate::{
    block::{BlockDev, BlockDevice},
    consts::*,
    endian::{FieldWriter, FsType},
    error::{Error, ErrorKind, Result},
    superblock::Volume,
    types::{BlockRun, IndexEntryHeader, IndexNodeHeader},
};

pub const SECTOR: usize = 512;

/// 内存块设备
pub struct MemDevice {
    data: Vec<u8>,
}

impl MemDevice {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl BlockDevice for MemDevice {
    fn sector_size(&self) -> u32 {
        SECTOR as u32
    }

    fn total_sectors(&self) -> u64 {
        (self.data.len() / SECTOR) as u64
    }

    fn read_sectors(&mut self, lba: u64, count: u32, buf: &mut [u8]) -> Result<usize> {
        let start = lba as usize * SECTOR;
        let len = count as usize * SECTOR;
        if start + len > self.data.len() {
            return Err(Error::new(ErrorKind::Io, "read beyond device"));
        }
        buf[..len].copy_from_slice(&self.data[start..start + len]);
        Ok(len)
    }
}

/// 按块组织的内存镜像，ag_shift 固定为 16，只用分配组 0
pub struct Image {
    pub data: Vec<u8>,
    pub block_size: usize,
    pub fs_type: FsType,
}

impl Image {
    pub const AG_SHIFT: u32 = 16;

    pub fn new(blocks: usize, block_size: usize, fs_type: FsType) -> Self {
        Self {
            data: alloc::vec![0u8; blocks * block_size],
            block_size,
            fs_type,
        }
    }

    pub fn volume(&self) -> Volume {
        Volume::new(self.fs_type, self.block_size as u32, Self::AG_SHIFT).unwrap()
    }

    pub fn block_mut(&mut self, block: usize) -> &mut [u8] {
        &mut self.data[block * self.block_size..(block + 1) * self.block_size]
    }

    /// 在 `block` 开头写入一组 block run（间接块）
    pub fn put_runs(&mut self, block: usize, runs: &[BlockRun]) {
        let fs_type = self.fs_type;
        let buf = self.block_mut(block);
        for (i, run) in runs.iter().enumerate() {
            run.to_bytes(&mut buf[i * BEFS_BLOCK_RUN_SIZE..], fs_type)
                .unwrap();
        }
    }

    /// 用可辨识的字节填充 run 覆盖的块，返回填充内容
    pub fn fill_run(&mut self, run: &BlockRun, seed: u8) -> Vec<u8> {
        let first = run.start as usize;
        let mut out = Vec::new();
        for b in 0..run.len as usize {
            let block = self.block_mut(first + b);
            for (i, byte) in block.iter_mut().enumerate() {
                *byte = seed.wrapping_add((b * 7 + i / 3) as u8);
            }
            out.extend_from_slice(block);
        }
        out
    }

    pub fn into_bdev(self) -> BlockDev<MemDevice> {
        let block_size = self.block_size as u32;
        let mut bdev = BlockDev::new(MemDevice::new(self.data));
        bdev.set_block_size(block_size);
        bdev
    }
}

/// 编码一个索引节点
///
/// 返回的字节从节点头开始，按 `key → offset 数组 → value 数组` 排列。
pub fn build_node(entries: &[(&str, u64)], fs_type: FsType) -> Vec<u8> {
    let key_len: usize = entries.iter().map(|(k, _)| k.len()).sum();
    let offsets_at =
        (BEFS_INDEX_NODE_HEADER_SIZE + key_len).next_multiple_of(BEFS_INDEX_KEY_ALIGN);
    let total = offsets_at + entries.len() * 2 + entries.len() * 8;
    let mut buf = alloc::vec![0u8; total];

    IndexNodeHeader {
        left: u64::MAX,
        right: u64::MAX,
        overflow: u64::MAX,
        all_key_count: entries.len() as u16,
        all_key_length: key_len as u16,
    }
    .encode(&mut buf, fs_type)
    .unwrap();

    let mut pos = BEFS_INDEX_NODE_HEADER_SIZE;
    for (key, _) in entries {
        buf[pos..pos + key.len()].copy_from_slice(key.as_bytes());
        pos += key.len();
    }

    let mut w = FieldWriter::new(&mut buf[offsets_at..], entries.len() * 10, fs_type).unwrap();
    let mut end = 0u16;
    for (key, _) in entries {
        end += key.len() as u16;
        w.u16(end);
    }
    for (_, value) in entries {
        w.u64(*value);
    }
    buf
}

/// 编码索引头部，`node_size` 为第一个节点相对本块的偏移
pub fn build_entry_header(node_size: u32, fs_type: FsType) -> [u8; BEFS_INDEX_ENTRY_SIZE] {
    let mut buf = [0u8; BEFS_INDEX_ENTRY_SIZE];
    IndexEntryHeader {
        magic: BEFS_INDEX_MAGIC,
        node_size,
        max_number_of_levels: 1,
        data_type: 0,
        root_node_pointer: node_size as u64,
        free_node_pointer: u64::MAX,
        maximum_size: 0,
    }
    .encode(&mut buf, fs_type)
    .unwrap();
    buf
}
