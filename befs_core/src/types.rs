//! BeFS 磁盘数据结构
//!
//! 每个结构都以字段列表的形式给出 `decode` / `encode`，字节序由
//! [`FieldReader`] / [`FieldWriter`] 统一处理。注释里的数字是字段在结构内的字节偏移。

use crate::{
    consts::*,
    endian::{FieldReader, FieldWriter, FsType},
    error::Result,
};

/// Block run：一段连续物理块
///
/// 同时用作 inode 地址（inode 编号 = `(allocation_group << ag_shift) + start`）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BlockRun {
    pub allocation_group: u32, // 0: 分配组
    pub start: u16,            // 4: 组内起始块
    pub len: u16,              // 6: 块数
}

impl BlockRun {
    /// 空地址，遍历遇到它即终止
    pub const EMPTY: BlockRun = BlockRun {
        allocation_group: 0,
        start: 0,
        len: 0,
    };

    pub const fn new(allocation_group: u32, start: u16, len: u16) -> Self {
        Self {
            allocation_group,
            start,
            len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.allocation_group == 0 && self.start == 0 && self.len == 0
    }

    /// 起始块的绝对块号
    ///
    /// 超出 u64 时饱和为 `u64::MAX`，由块层作为越界拒绝。
    pub fn block_number(&self, ag_shift: u32) -> u64 {
        1u64.checked_shl(ag_shift)
            .and_then(|group_size| (self.allocation_group as u64).checked_mul(group_size))
            .and_then(|base| base.checked_add(self.start as u64))
            .unwrap_or(u64::MAX)
    }

    /// 从 inode 编号还原地址（len 固定为 1）
    pub fn from_ino(ino: u64, ag_shift: u32) -> Self {
        let mask = (1u64 << ag_shift) - 1;
        Self {
            allocation_group: (ino >> ag_shift) as u32,
            start: (ino & mask) as u16,
            len: 1,
        }
    }

    /// 跳过开头 `blocks` 个块后剩余的 run，跳过后为空则返回 `None`
    pub fn advance(&self, blocks: u64) -> Option<BlockRun> {
        if blocks >= self.len as u64 {
            return None;
        }
        Some(BlockRun {
            allocation_group: self.allocation_group,
            start: self.start.wrapping_add(blocks as u16),
            len: self.len - blocks as u16,
        })
    }

    pub fn decode(r: &mut FieldReader<'_>) -> Self {
        Self {
            allocation_group: r.u32(),
            start: r.u16(),
            len: r.u16(),
        }
    }

    pub fn encode(&self, w: &mut FieldWriter<'_>) {
        w.u32(self.allocation_group);
        w.u16(self.start);
        w.u16(self.len);
    }

    pub fn from_bytes(buf: &[u8], fs_type: FsType) -> Result<Self> {
        let mut r = FieldReader::new(buf, BEFS_BLOCK_RUN_SIZE, fs_type)?;
        Ok(Self::decode(&mut r))
    }

    pub fn to_bytes(&self, buf: &mut [u8], fs_type: FsType) -> Result<()> {
        let mut w = FieldWriter::new(buf, BEFS_BLOCK_RUN_SIZE, fs_type)?;
        self.encode(&mut w);
        Ok(())
    }
}

/// 数据流：文件 / 目录内容的三级寻址描述
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataStream {
    pub direct: [BlockRun; BEFS_NUM_DIRECT_BLOCKS], // 0: 直接 run
    pub max_direct_range: u64,                      // 96
    pub indirect: BlockRun,                         // 104
    pub max_indirect_range: u64,                    // 112
    pub double_indirect: BlockRun,                  // 120
    pub max_double_indirect_range: u64,             // 128
    pub size: u64,                                  // 136: 逻辑大小（字节）
}

impl DataStream {
    pub fn decode(r: &mut FieldReader<'_>) -> Self {
        let mut direct = [BlockRun::EMPTY; BEFS_NUM_DIRECT_BLOCKS];
        for run in direct.iter_mut() {
            *run = BlockRun::decode(r);
        }
        Self {
            direct,
            max_direct_range: r.u64(),
            indirect: BlockRun::decode(r),
            max_indirect_range: r.u64(),
            double_indirect: BlockRun::decode(r),
            max_double_indirect_range: r.u64(),
            size: r.u64(),
        }
    }

    pub fn encode(&self, w: &mut FieldWriter<'_>) {
        for run in &self.direct {
            run.encode(w);
        }
        w.u64(self.max_direct_range);
        self.indirect.encode(w);
        w.u64(self.max_indirect_range);
        self.double_indirect.encode(w);
        w.u64(self.max_double_indirect_range);
        w.u64(self.size);
    }

    pub fn from_bytes(buf: &[u8], fs_type: FsType) -> Result<Self> {
        let mut r = FieldReader::new(buf, BEFS_DATA_STREAM_SIZE, fs_type)?;
        Ok(Self::decode(&mut r))
    }

    pub fn to_bytes(&self, buf: &mut [u8], fs_type: FsType) -> Result<()> {
        let mut w = FieldWriter::new(buf, BEFS_DATA_STREAM_SIZE, fs_type)?;
        self.encode(&mut w);
        Ok(())
    }

    /// 间接层的结束位置
    pub fn indirect_end(&self) -> u64 {
        self.max_direct_range.saturating_add(self.max_indirect_range)
    }

    /// 二级间接层的结束位置
    pub fn double_indirect_end(&self) -> u64 {
        self.indirect_end()
            .saturating_add(self.max_double_indirect_range)
    }
}

/// Superblock 磁盘结构
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskSuperblock {
    pub name: [u8; B_OS_NAME_LENGTH], // 0: 卷名
    pub magic1: u32,                  // 32
    pub fs_byte_order: u32,           // 36
    pub block_size: u32,              // 40
    pub block_shift: u32,             // 44
    pub num_blocks: u64,              // 48
    pub used_blocks: u64,             // 56
    pub inode_size: u32,              // 64
    pub magic2: u32,                  // 68
    pub blocks_per_ag: u32,           // 72
    pub ag_shift: u32,                // 76
    pub num_ags: u32,                 // 80
    pub flags: u32,                   // 84: BEFS_CLEAN / BEFS_DIRTY
    pub log_blocks: BlockRun,         // 88
    pub log_start: u64,               // 96
    pub log_end: u64,                 // 104
    pub magic3: u32,                  // 112
    pub root_dir: BlockRun,           // 116
    pub indices: BlockRun,            // 124
                                      // 132: pad[8]
}

impl Default for DiskSuperblock {
    fn default() -> Self {
        Self {
            name: [0; B_OS_NAME_LENGTH],
            magic1: 0,
            fs_byte_order: 0,
            block_size: 0,
            block_shift: 0,
            num_blocks: 0,
            used_blocks: 0,
            inode_size: 0,
            magic2: 0,
            blocks_per_ag: 0,
            ag_shift: 0,
            num_ags: 0,
            flags: 0,
            log_blocks: BlockRun::EMPTY,
            log_start: 0,
            log_end: 0,
            magic3: 0,
            root_dir: BlockRun::EMPTY,
            indices: BlockRun::EMPTY,
        }
    }
}

impl DiskSuperblock {
    pub fn decode(buf: &[u8], fs_type: FsType) -> Result<Self> {
        let mut r = FieldReader::new(buf, BEFS_SUPERBLOCK_SIZE, fs_type)?;
        Ok(Self {
            name: r.bytes(),
            magic1: r.u32(),
            fs_byte_order: r.u32(),
            block_size: r.u32(),
            block_shift: r.u32(),
            num_blocks: r.u64(),
            used_blocks: r.u64(),
            inode_size: r.u32(),
            magic2: r.u32(),
            blocks_per_ag: r.u32(),
            ag_shift: r.u32(),
            num_ags: r.u32(),
            flags: r.u32(),
            log_blocks: BlockRun::decode(&mut r),
            log_start: r.u64(),
            log_end: r.u64(),
            magic3: r.u32(),
            root_dir: BlockRun::decode(&mut r),
            indices: BlockRun::decode(&mut r),
        })
    }

    pub fn encode(&self, buf: &mut [u8], fs_type: FsType) -> Result<()> {
        let mut w = FieldWriter::new(buf, BEFS_SUPERBLOCK_SIZE, fs_type)?;
        w.bytes(&self.name);
        w.u32(self.magic1);
        w.u32(self.fs_byte_order);
        w.u32(self.block_size);
        w.u32(self.block_shift);
        w.u64(self.num_blocks);
        w.u64(self.used_blocks);
        w.u32(self.inode_size);
        w.u32(self.magic2);
        w.u32(self.blocks_per_ag);
        w.u32(self.ag_shift);
        w.u32(self.num_ags);
        w.u32(self.flags);
        self.log_blocks.encode(&mut w);
        w.u64(self.log_start);
        w.u64(self.log_end);
        w.u32(self.magic3);
        self.root_dir.encode(&mut w);
        self.indices.encode(&mut w);
        w.skip(32);
        Ok(())
    }
}

/// Inode 磁盘结构
///
/// `data` 是数据流 / 符号链接共用的原始字节，由 [`crate::inode`] 按 mode 解释。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskInode {
    pub magic1: u32,                  // 0
    pub inode_num: BlockRun,          // 4
    pub uid: u32,                     // 12
    pub gid: u32,                     // 16
    pub mode: u32,                    // 20
    pub flags: u32,                   // 24
    pub create_time: u64,             // 28
    pub last_modified_time: u64,      // 36
    pub parent: BlockRun,             // 44
    pub attributes: BlockRun,         // 52
    pub inode_type: u32,              // 60
    pub inode_size: u32,              // 64
    pub etc: u32,                     // 68
    pub data: [u8; BEFS_SYMLINK_LEN], // 72: 数据流或内联链接
                                      // 232: pad[4]
}

impl Default for DiskInode {
    fn default() -> Self {
        Self {
            magic1: 0,
            inode_num: BlockRun::EMPTY,
            uid: 0,
            gid: 0,
            mode: 0,
            flags: 0,
            create_time: 0,
            last_modified_time: 0,
            parent: BlockRun::EMPTY,
            attributes: BlockRun::EMPTY,
            inode_type: 0,
            inode_size: 0,
            etc: 0,
            data: [0; BEFS_SYMLINK_LEN],
        }
    }
}

impl DiskInode {
    pub fn decode(buf: &[u8], fs_type: FsType) -> Result<Self> {
        let mut r = FieldReader::new(buf, BEFS_INODE_SIZE, fs_type)?;
        Ok(Self {
            magic1: r.u32(),
            inode_num: BlockRun::decode(&mut r),
            uid: r.u32(),
            gid: r.u32(),
            mode: r.u32(),
            flags: r.u32(),
            create_time: r.u64(),
            last_modified_time: r.u64(),
            parent: BlockRun::decode(&mut r),
            attributes: BlockRun::decode(&mut r),
            inode_type: r.u32(),
            inode_size: r.u32(),
            etc: r.u32(),
            data: r.bytes(),
        })
    }

    pub fn encode(&self, buf: &mut [u8], fs_type: FsType) -> Result<()> {
        let mut w = FieldWriter::new(buf, BEFS_INODE_SIZE, fs_type)?;
        w.u32(self.magic1);
        self.inode_num.encode(&mut w);
        w.u32(self.uid);
        w.u32(self.gid);
        w.u32(self.mode);
        w.u32(self.flags);
        w.u64(self.create_time);
        w.u64(self.last_modified_time);
        self.parent.encode(&mut w);
        self.attributes.encode(&mut w);
        w.u32(self.inode_type);
        w.u32(self.inode_size);
        w.u32(self.etc);
        w.bytes(&self.data);
        w.skip(16);
        Ok(())
    }
}

/// 索引头部，只出现在索引第一个块的开头
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexEntryHeader {
    pub magic: u32,                // 0
    pub node_size: u32,            // 4: 第一个节点相对本块的字节偏移
    pub max_number_of_levels: u32, // 8
    pub data_type: u32,            // 12
    pub root_node_pointer: u64,    // 16
    pub free_node_pointer: u64,    // 24
    pub maximum_size: u64,         // 32
}

impl IndexEntryHeader {
    pub fn decode(buf: &[u8], fs_type: FsType) -> Result<Self> {
        let mut r = FieldReader::new(buf, BEFS_INDEX_ENTRY_SIZE, fs_type)?;
        Ok(Self {
            magic: r.u32(),
            node_size: r.u32(),
            max_number_of_levels: r.u32(),
            data_type: r.u32(),
            root_node_pointer: r.u64(),
            free_node_pointer: r.u64(),
            maximum_size: r.u64(),
        })
    }

    pub fn encode(&self, buf: &mut [u8], fs_type: FsType) -> Result<()> {
        let mut w = FieldWriter::new(buf, BEFS_INDEX_ENTRY_SIZE, fs_type)?;
        w.u32(self.magic);
        w.u32(self.node_size);
        w.u32(self.max_number_of_levels);
        w.u32(self.data_type);
        w.u64(self.root_node_pointer);
        w.u64(self.free_node_pointer);
        w.u64(self.maximum_size);
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.magic == BEFS_INDEX_MAGIC
    }
}

/// 索引节点头部
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexNodeHeader {
    pub left: u64,           // 0
    pub right: u64,          // 8
    pub overflow: u64,       // 16
    pub all_key_count: u16,  // 24
    pub all_key_length: u16, // 26
}

impl IndexNodeHeader {
    pub fn decode(buf: &[u8], fs_type: FsType) -> Result<Self> {
        let mut r = FieldReader::new(buf, BEFS_INDEX_NODE_HEADER_SIZE, fs_type)?;
        Ok(Self {
            left: r.u64(),
            right: r.u64(),
            overflow: r.u64(),
            all_key_count: r.u16(),
            all_key_length: r.u16(),
        })
    }

    pub fn encode(&self, buf: &mut [u8], fs_type: FsType) -> Result<()> {
        let mut w = FieldWriter::new(buf, BEFS_INDEX_NODE_HEADER_SIZE, fs_type)?;
        w.u64(self.left);
        w.u64(self.right);
        w.u64(self.overflow);
        w.u16(self.all_key_count);
        w.u16(self.all_key_length);
        Ok(())
    }
}
