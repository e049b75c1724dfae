//! 文件句柄

use core::marker::PhantomData;

use crate::{
    block::BlockDevice,
    error::{Error, ErrorKind, Result},
    extent::Resolver,
    types::DataStream,
};
use alloc::{vec, vec::Vec};

use super::filesystem::BefsFileSystem;

/// 文件句柄
///
/// 表示一个打开的普通文件，支持读取和定位。句柄只保存数据流的副本，
/// 读取时借用文件系统。
pub struct File<D: BlockDevice> {
    ino: u64,
    ds: DataStream,
    offset: u64,
    _phantom: PhantomData<D>,
}

impl<D: BlockDevice> File<D> {
    pub(super) fn new(ino: u64, ds: DataStream) -> Self {
        Self {
            ino,
            ds,
            offset: 0,
            _phantom: PhantomData,
        }
    }

    /// 读取文件内容
    ///
    /// 从当前位置读取数据到缓冲区，并更新文件位置
    ///
    /// # 参数
    ///
    /// * `fs` - 文件系统引用
    /// * `buf` - 目标缓冲区
    ///
    /// # 返回
    ///
    /// 实际读取的字节数，到达文件末尾返回 0
    ///
    /// # 示例
    ///
    /// ```rust,ignore
    /// let mut file = fs.open("/home/notes.txt")?;
    /// let mut buf = vec![0u8; 1024];
    /// let n = file.read(&mut fs, &mut buf)?;
    /// ```
    pub fn read(&mut self, fs: &mut BefsFileSystem<D>, buf: &mut [u8]) -> Result<usize> {
        let vol = *fs.volume();
        let n = Resolver::new(&mut fs.bdev, vol).read_at(&self.ds, self.offset, buf)?;
        self.offset += n as u64;
        Ok(n)
    }

    /// 从当前位置读到文件末尾
    ///
    /// 按块大小分段读取，缓冲区随实际读到的数据增长，不按磁盘上记录的
    /// 大小预先分配。
    pub fn read_to_end(&mut self, fs: &mut BefsFileSystem<D>) -> Result<Vec<u8>> {
        let mut chunk = vec![0u8; fs.volume().block_size() as usize];
        let mut out = Vec::new();
        loop {
            let n = self.read(fs, &mut chunk)?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
        }
        Ok(out)
    }

    /// 移动文件指针
    ///
    /// # 错误
    ///
    /// 位置超出文件大小返回 `InvalidInput`
    pub fn seek(&mut self, pos: u64) -> Result<u64> {
        if pos > self.size() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "seek position beyond file size",
            ));
        }
        self.offset = pos;
        Ok(self.offset)
    }

    pub fn position(&self) -> u64 {
        self.offset
    }

    pub fn size(&self) -> u64 {
        self.ds.size
    }

    pub fn inode_num(&self) -> u64 {
        self.ino
    }

    pub fn rewind(&mut self) {
        self.offset = 0;
    }
}
