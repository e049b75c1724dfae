//! BeFS 文件系统核心结构

use crate::{
    block::{BlockDev, BlockDevice},
    consts::*,
    dir::{lookup_path, read_entry, DirCursor, DirEntry, DirIter},
    error::{Error, ErrorKind, Result},
    extent::Resolver,
    inode::Inode,
    superblock::{Superblock, Volume},
    types::BlockRun,
};
use alloc::vec::Vec;
use log::{debug, info};

use super::{
    config::FsConfig,
    file::File,
    metadata::{FileMetadata, StatFs},
};

/// 只读挂载的 BeFS 卷
///
/// # 示例
///
/// ```rust,ignore
/// use befs_core::{BefsFileSystem, BlockDev, FsConfig, FsType};
///
/// let bdev = BlockDev::new(MyBlockDevice::new());
/// let mut fs = BefsFileSystem::mount(bdev, FsConfig::new(FsType::X86))?;
///
/// let mut file = fs.open("/home/notes.txt")?;
/// let content = file.read_to_end(&mut fs)?;
///
/// for entry in fs.read_dir("/home")? {
///     println!("{:?} -> {}", entry.name_str(), entry.inode());
/// }
/// ```
pub struct BefsFileSystem<D: BlockDevice> {
    pub(crate) bdev: BlockDev<D>,
    sb: Superblock,
    config: FsConfig,
}

impl<D: BlockDevice> BefsFileSystem<D> {
    /// 挂载文件系统
    ///
    /// 读取并校验 superblock，然后把块层的块大小设为卷的块大小。
    ///
    /// # 参数
    ///
    /// * `bdev` - 块设备包装器
    /// * `config` - 挂载配置，字节序变体由它决定
    ///
    /// # 错误
    ///
    /// - `ErrorKind::Corrupted` - 无效的 superblock
    /// - `ErrorKind::Io` - 设备读取失败
    pub fn mount(mut bdev: BlockDev<D>, config: FsConfig) -> Result<Self> {
        let sb = Superblock::load(&mut bdev, config.fs_type)?;
        bdev.set_block_size(sb.block_size());

        if !sb.is_clean() {
            info!("befs volume was not cleanly unmounted");
        }
        debug!(
            "mounted befs volume {:?}: {} blocks of {} bytes",
            sb.volume_name(),
            sb.num_blocks(),
            sb.block_size()
        );

        Ok(Self { bdev, sb, config })
    }

    /// 卸载并取回块设备
    pub fn unmount(self) -> BlockDev<D> {
        self.bdev
    }

    pub fn superblock(&self) -> &Superblock {
        &self.sb
    }

    pub fn volume(&self) -> &Volume {
        self.sb.volume()
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    pub fn block_device(&self) -> &BlockDev<D> {
        &self.bdev
    }

    /// 根目录 inode 编号
    pub fn root_ino(&self) -> u64 {
        self.volume().ino(&self.sb.root_dir())
    }

    fn resolver(&mut self) -> Resolver<'_, D> {
        let vol = *self.sb.volume();
        Resolver::new(&mut self.bdev, vol)
    }

    /// 按 inode 编号加载 inode
    pub fn inode(&mut self, ino: u64) -> Result<Inode> {
        let vol = *self.volume();
        Inode::load(&mut self.bdev, &vol, ino)
    }

    /// 解析路径为 inode 编号，不跟随符号链接
    pub fn lookup_path(&mut self, path: &str) -> Result<u64> {
        let vol = *self.volume();
        let root = self.root_ino();
        lookup_path(&mut self.bdev, &vol, root, path)
    }

    fn inode_at(&mut self, path: &str) -> Result<(u64, Inode)> {
        let ino = self.lookup_path(path)?;
        Ok((ino, self.inode(ino)?))
    }

    fn dir_at(&mut self, path: &str) -> Result<Inode> {
        let (_, inode) = self.inode_at(path)?;
        if !inode.is_dir() {
            return Err(Error::new(ErrorKind::NotDirectory, "not a directory"));
        }
        Ok(inode)
    }

    /// 打开普通文件
    ///
    /// # 错误
    ///
    /// - `ErrorKind::IsDirectory` - 路径是目录
    /// - `ErrorKind::InvalidInput` - 路径不是普通文件
    pub fn open(&mut self, path: &str) -> Result<File<D>> {
        let (ino, inode) = self.inode_at(path)?;
        if inode.is_dir() {
            return Err(Error::new(ErrorKind::IsDirectory, "is a directory"));
        }
        match (inode.is_file(), inode.data_stream()) {
            (true, Some(ds)) => Ok(File::new(ino, *ds)),
            _ => Err(Error::new(ErrorKind::InvalidInput, "not a regular file")),
        }
    }

    /// 从 inode 的数据流中按字节偏移读取
    ///
    /// # 返回
    ///
    /// 实际读取的字节数；符号链接没有数据流，返回 `InvalidInput`
    pub fn read_at(&mut self, ino: u64, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let inode = self.inode(ino)?;
        let ds = inode
            .data_stream()
            .ok_or(Error::new(ErrorKind::InvalidInput, "inode has no data stream"))?;
        self.resolver().read_at(ds, offset, buf)
    }

    /// 读取目录内容
    ///
    /// 目录中保存的 `.` 和 `..` 也会出现在结果里。
    ///
    /// # 示例
    ///
    /// ```rust,ignore
    /// for entry in fs.read_dir("/")? {
    ///     println!("{:?} (inode: {})", entry.name_str(), entry.inode());
    /// }
    /// ```
    pub fn read_dir(&mut self, path: &str) -> Result<Vec<DirEntry>> {
        let dir = self.dir_at(path)?;
        self.collect_entries(&dir)
    }

    fn collect_entries(&mut self, dir: &Inode) -> Result<Vec<DirEntry>> {
        let ds = dir
            .data_stream()
            .ok_or(Error::new(ErrorKind::NotDirectory, "not a directory"))?;
        DirIter::new(&mut self.resolver(), ds).collect()
    }

    /// 从游标处读取目录 `dir_ino` 的下一项
    ///
    /// 游标在两次调用之间由调用方保存，对应 readdir 的 f_pos。
    ///
    /// # 返回
    ///
    /// 没有更多项时返回 `Ok(None)`
    pub fn read_entry(&mut self, dir_ino: u64, cursor: &mut DirCursor) -> Result<Option<DirEntry>> {
        let dir = self.inode(dir_ino)?;
        let ds = match (dir.is_dir(), dir.data_stream()) {
            (true, Some(ds)) => *ds,
            _ => return Err(Error::new(ErrorKind::NotDirectory, "not a directory")),
        };
        read_entry(&mut self.resolver(), &ds, cursor)
    }

    /// 读取符号链接目标（原始字节，不含结尾 NUL）
    ///
    /// # 错误
    ///
    /// 路径不是符号链接返回 `InvalidInput`
    pub fn read_link(&mut self, path: &str) -> Result<Vec<u8>> {
        let (_, inode) = self.inode_at(path)?;
        inode
            .symlink_target()
            .map(<[u8]>::to_vec)
            .ok_or(Error::new(ErrorKind::InvalidInput, "not a symbolic link"))
    }

    /// 获取文件元数据，属主 / 属组已应用挂载覆盖
    pub fn metadata(&mut self, path: &str) -> Result<FileMetadata> {
        let (ino, inode) = self.inode_at(path)?;
        Ok(FileMetadata::from_inode(
            &inode,
            ino,
            self.sb.block_size(),
            &self.config,
        ))
    }

    /// 卷统计信息
    pub fn statfs(&self) -> StatFs {
        let free = self.sb.free_blocks();
        StatFs {
            f_type: BEFS_SUPER_BLOCK_MAGIC1,
            bsize: self.sb.block_size(),
            blocks: self.sb.num_blocks(),
            bfree: free,
            bavail: free,
            files: 0,
            ffree: 0,
            namelen: BEFS_NAME_LEN as u32,
        }
    }

    /// 列出文件的属性名
    ///
    /// 属性目录与普通目录结构相同，值为属性 inode 编号。
    /// 没有属性目录时返回空列表。
    pub fn list_attributes(&mut self, path: &str) -> Result<Vec<DirEntry>> {
        let (_, inode) = self.inode_at(path)?;
        if !inode.has_attributes() {
            return Ok(Vec::new());
        }
        let attr_dir = inode.attributes();
        self.list_dir_at(&attr_dir)
    }

    /// 列出卷上的索引（索引目录的内容）
    pub fn list_indices(&mut self) -> Result<Vec<DirEntry>> {
        let indices = self.sb.indices();
        if indices.is_empty() {
            return Ok(Vec::new());
        }
        self.list_dir_at(&indices)
    }

    fn list_dir_at(&mut self, run: &BlockRun) -> Result<Vec<DirEntry>> {
        let vol = *self.volume();
        let dir = Inode::load_run(&mut self.bdev, &vol, run)?;
        self.collect_entries(&dir)
    }

    /// 检查路径是否存在
    pub fn exists(&mut self, path: &str) -> bool {
        self.lookup_path(path).is_ok()
    }

    pub fn is_dir(&mut self, path: &str) -> Result<bool> {
        Ok(self.inode_at(path)?.1.is_dir())
    }

    pub fn is_file(&mut self, path: &str) -> Result<bool> {
        Ok(self.inode_at(path)?.1.is_file())
    }
}
