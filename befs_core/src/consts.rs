//! BeFS 常量定义

/// X86 卷上 superblock 的字节偏移（第 1 个 512 字节扇区）
pub const BEFS_SUPERBLOCK_OFFSET_X86: u64 = 512;

/// PPC 卷上 superblock 的字节偏移（第 0 个 1024 字节块）
pub const BEFS_SUPERBLOCK_OFFSET_PPC: u64 = 0;

/// Superblock 磁盘结构大小
pub const BEFS_SUPERBLOCK_SIZE: usize = 164;

/// Superblock 魔数
pub const BEFS_SUPER_BLOCK_MAGIC1: u32 = 0x4246_5331; // "BFS1"
pub const BEFS_SUPER_BLOCK_MAGIC2: u32 = 0xdd12_1031;
pub const BEFS_SUPER_BLOCK_MAGIC3: u32 = 0x15b6_830e;

/// Inode 魔数
pub const BEFS_INODE_MAGIC1: u32 = 0x3bbe_0ad9;

/// 索引（B+树）头部魔数
pub const BEFS_INDEX_MAGIC: u32 = 0x69f6_c2e8;

/// Superblock 状态：干净卸载
pub const BEFS_CLEAN: u32 = 0x434c_454e;
/// Superblock 状态：未干净卸载
pub const BEFS_DIRTY: u32 = 0x4449_5254;

/// 文件名最大长度
pub const BEFS_NAME_LEN: usize = 255;

/// Inode 内联符号链接缓冲区长度
pub const BEFS_SYMLINK_LEN: usize = 160;

/// 卷名长度
pub const B_OS_NAME_LENGTH: usize = 32;

/// 数据流中的直接块数量
pub const BEFS_NUM_DIRECT_BLOCKS: usize = 12;

/// 磁盘上 block run 的大小
pub const BEFS_BLOCK_RUN_SIZE: usize = 8;

/// 数据流磁盘结构大小
pub const BEFS_DATA_STREAM_SIZE: usize = 144;

/// Inode 磁盘结构大小
pub const BEFS_INODE_SIZE: usize = 248;

/// Inode 中数据联合体（数据流 / 符号链接）的起始偏移
pub const BEFS_INODE_DATA_OFFSET: usize = 72;

/// 索引头部磁盘结构大小
pub const BEFS_INDEX_ENTRY_SIZE: usize = 40;

/// 索引节点头部磁盘结构大小
pub const BEFS_INDEX_NODE_HEADER_SIZE: usize = 28;

/// 索引节点中偏移数组的对齐
pub const BEFS_INDEX_KEY_ALIGN: usize = 8;

/// 支持的块大小
pub const BEFS_BLOCK_SIZES: [u32; 4] = [1024, 2048, 4096, 8192];

/// Superblock 中的字节序标记
pub const BEFS_PPC: u32 = 1;
pub const BEFS_X86: u32 = 2;

/// 错误码（兼容 C errno）
pub const ENOENT: i32 = 2;
pub const EIO: i32 = 5;
pub const ENOTDIR: i32 = 20;
pub const EISDIR: i32 = 21;
pub const EINVAL: i32 = 22;
pub const ERANGE: i32 = 34;
pub const ENAMETOOLONG: i32 = 36;
pub const ENODATA: i32 = 61;
pub const ENOTSUP: i32 = 95;

/// Inode 模式位
pub const S_IFMT: u32 = 0o170000;
pub const S_IFSOCK: u32 = 0o140000;
pub const S_IFLNK: u32 = 0o120000;
pub const S_IFREG: u32 = 0o100000;
pub const S_IFBLK: u32 = 0o060000;
pub const S_IFDIR: u32 = 0o040000;
pub const S_IFCHR: u32 = 0o020000;
pub const S_IFIFO: u32 = 0o010000;
