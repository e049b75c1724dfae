//! 集成测试共用的内存设备和卷镜像构造器

#![allow(dead_code)]

use befs_core::{
    consts::*,
    endian::FieldWriter,
    types::{DiskInode, DiskSuperblock, IndexEntryHeader, IndexNodeHeader},
    BefsFileSystem, BlockDev, BlockDevice, BlockRun, DataStream, Error, ErrorKind, FsConfig,
    FsType, InodeFlags, Result,
};

/// 物理扇区大小
pub const SECTOR: usize = 512;

/// 测试卷的块大小
pub const BLOCK_SIZE: usize = 1024;

/// 分配组移位，只用分配组 0
pub const AG_SHIFT: u32 = 13;

/// 修改时间（秒）
pub const MTIME: u64 = 1_600_000_000;

/// 磁盘上的属主 / 属组
pub const DISK_UID: u32 = 1000;
pub const DISK_GID: u32 = 100;

/// 内存块设备
pub struct MemDevice {
    data: Vec<u8>,
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

/// 按块写入 BeFS 结构的镜像构造器
pub struct ImageBuilder {
    data: Vec<u8>,
    fs_type: FsType,
}

fn run(block: u64, len: u16) -> BlockRun {
    BlockRun::new(0, block as u16, len)
}

impl ImageBuilder {
    pub fn new(blocks: usize, fs_type: FsType) -> Self {
        Self {
            data: vec![0u8; blocks * BLOCK_SIZE],
            fs_type,
        }
    }

    fn block_mut(&mut self, block: u64) -> &mut [u8] {
        let start = block as usize * BLOCK_SIZE;
        &mut self.data[start..start + BLOCK_SIZE]
    }

    /// 写入 superblock，`indices` 为 0 表示没有索引目录
    pub fn superblock(&mut self, name: &str, root: u64, indices: u64) -> &mut Self {
        let mut sb = DiskSuperblock {
            magic1: BEFS_SUPER_BLOCK_MAGIC1,
            magic2: BEFS_SUPER_BLOCK_MAGIC2,
            magic3: BEFS_SUPER_BLOCK_MAGIC3,
            fs_byte_order: self.fs_type.raw(),
            block_size: BLOCK_SIZE as u32,
            block_shift: BLOCK_SIZE.trailing_zeros(),
            num_blocks: (self.data.len() / BLOCK_SIZE) as u64,
            used_blocks: 40,
            inode_size: BLOCK_SIZE as u32,
            blocks_per_ag: 1 << AG_SHIFT,
            ag_shift: AG_SHIFT,
            num_ags: 1,
            flags: BEFS_CLEAN,
            root_dir: run(root, 1),
            indices: if indices == 0 { BlockRun::EMPTY } else { run(indices, 1) },
            ..DiskSuperblock::default()
        };
        sb.name[..name.len()].copy_from_slice(name.as_bytes());

        let offset = self.fs_type.superblock_offset() as usize;
        let fs_type = self.fs_type;
        sb.encode(&mut self.data[offset..offset + BEFS_SUPERBLOCK_SIZE], fs_type)
            .unwrap();
        self
    }

    fn inode(&mut self, ino: u64, mode: u32, attributes: u64, data: [u8; BEFS_SYMLINK_LEN]) {
        let raw = DiskInode {
            magic1: BEFS_INODE_MAGIC1,
            inode_num: run(ino, 1),
            uid: DISK_UID,
            gid: DISK_GID,
            mode,
            flags: InodeFlags::IN_USE.bits(),
            create_time: MTIME << 16,
            last_modified_time: (MTIME << 16) | 0x1234,
            attributes: if attributes == 0 { BlockRun::EMPTY } else { run(attributes, 1) },
            inode_size: BLOCK_SIZE as u32,
            data,
            ..DiskInode::default()
        };
        let fs_type = self.fs_type;
        raw.encode(self.block_mut(ino), fs_type).unwrap();
    }

    fn stream_inode(&mut self, ino: u64, mode: u32, attributes: u64, ds: &DataStream) {
        let mut data = [0u8; BEFS_SYMLINK_LEN];
        ds.to_bytes(&mut data, self.fs_type).unwrap();
        self.inode(ino, mode, attributes, data);
    }

    /// 单块目录：块开头是索引头部，唯一的节点在偏移 512 处
    pub fn dir(&mut self, ino: u64, data_block: u64, entries: &[(&str, u64)]) -> &mut Self {
        self.dir_with_attrs(ino, data_block, entries, 0)
    }

    pub fn dir_with_attrs(
        &mut self,
        ino: u64,
        data_block: u64,
        entries: &[(&str, u64)],
        attributes: u64,
    ) -> &mut Self {
        let fs_type = self.fs_type;
        let header = IndexEntryHeader {
            magic: BEFS_INDEX_MAGIC,
            node_size: 512,
            max_number_of_levels: 1,
            data_type: 0,
            root_node_pointer: 512,
            free_node_pointer: u64::MAX,
            maximum_size: BLOCK_SIZE as u64,
        };
        let node = build_node(entries, fs_type);
        let block = self.block_mut(data_block);
        header.encode(block, fs_type).unwrap();
        block[512..512 + node.len()].copy_from_slice(&node);

        let mut ds = DataStream::default();
        ds.direct[0] = run(data_block, 1);
        ds.max_direct_range = 1;
        ds.size = BLOCK_SIZE as u64;
        self.stream_inode(ino, S_IFDIR | 0o755, attributes, &ds);
        self
    }

    /// 普通文件，内容连续存放在 `first_block` 开始的一个 run 中
    pub fn file(&mut self, ino: u64, first_block: u64, content: &[u8], attributes: u64) -> &mut Self {
        self.file_sized(ino, first_block, content, content.len() as u64, attributes)
    }

    /// 与 `file` 相同，但数据流记录的大小由调用方给出
    pub fn file_sized(
        &mut self,
        ino: u64,
        first_block: u64,
        content: &[u8],
        size: u64,
        attributes: u64,
    ) -> &mut Self {
        let blocks = content.len().div_ceil(BLOCK_SIZE).max(1);
        let start = first_block as usize * BLOCK_SIZE;
        self.data[start..start + content.len()].copy_from_slice(content);

        let mut ds = DataStream::default();
        ds.direct[0] = run(first_block, blocks as u16);
        ds.max_direct_range = 1;
        ds.size = size;
        self.stream_inode(ino, S_IFREG | 0o644, attributes, &ds);
        self
    }

    pub fn symlink(&mut self, ino: u64, target: &str) -> &mut Self {
        let mut data = [0u8; BEFS_SYMLINK_LEN];
        data[..target.len()].copy_from_slice(target.as_bytes());
        self.inode(ino, S_IFLNK | 0o777, 0, data);
        self
    }

    pub fn into_device(self) -> MemDevice {
        MemDevice { data: self.data }
    }
}

/// 编码一个索引节点：头部、键字节、8 字节对齐的偏移数组、值数组
pub fn build_node(entries: &[(&str, u64)], fs_type: FsType) -> Vec<u8> {
    let key_len: usize = entries.iter().map(|(k, _)| k.len()).sum();
    let offsets_at =
        (BEFS_INDEX_NODE_HEADER_SIZE + key_len).next_multiple_of(BEFS_INDEX_KEY_ALIGN);
    let mut buf = vec![0u8; offsets_at + entries.len() * 10];

    IndexNodeHeader {
        left: u64::MAX,
        right: u64::MAX,
        overflow: u64::MAX,
        all_key_count: entries.len() as u16,
        all_key_length: key_len as u16,
    }
    .encode(&mut buf, fs_type)
    .unwrap();

    let keys: Vec<u8> = entries.iter().flat_map(|(k, _)| k.bytes()).collect();
    buf[BEFS_INDEX_NODE_HEADER_SIZE..BEFS_INDEX_NODE_HEADER_SIZE + key_len].copy_from_slice(&keys);

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

/// `home/notes.txt` 的内容，跨三个块
pub fn notes_content() -> Vec<u8> {
    (0..2500u32).map(|i| (i % 251) as u8).collect()
}

/// 标准测试卷
///
/// ```text
/// /                 ino 2   data 30
/// ├── home          ino 3   data 31
/// │   └── notes.txt ino 4   data 20..23, 属性目录 ino 7
/// └── link -> home/notes.txt  ino 5
/// 索引目录           ino 6   data 32
/// notes.txt 属性目录 ino 7   data 33
/// ```
pub fn sample_image(fs_type: FsType) -> MemDevice {
    let mut image = ImageBuilder::new(64, fs_type);
    image
        .superblock("sample", 2, 6)
        .dir(2, 30, &[(".", 2), ("..", 2), ("home", 3), ("link", 5)])
        .dir(3, 31, &[(".", 3), ("..", 2), ("notes.txt", 4)])
        .file(4, 20, &notes_content(), 7)
        .symlink(5, "home/notes.txt")
        .dir(6, 32, &[("last_modified", 11), ("name", 12), ("size", 13)])
        .dir(7, 33, &[("BEOS:TYPE", 14), ("author", 15)]);
    image.into_device()
}

pub fn mount_sample(fs_type: FsType) -> BefsFileSystem<MemDevice> {
    mount_with(fs_type, FsConfig::new(fs_type))
}

pub fn mount_with(fs_type: FsType, config: FsConfig) -> BefsFileSystem<MemDevice> {
    BefsFileSystem::mount(BlockDev::new(sample_image(fs_type)), config).unwrap()
}
