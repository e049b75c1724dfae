//! 基于镜像文件的块设备（需要 `std` 特性）

use std::{
    fs::File,
    io::{Read, Seek, SeekFrom},
    path::Path,
};

use super::BlockDevice;
use crate::error::{Error, ErrorKind, Result};

const SECTOR_SIZE: u32 = 512;

/// 把磁盘镜像文件当作只读块设备
pub struct FileBlockDevice {
    file: File,
    len: u64,
}

impl FileBlockDevice {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)
            .map_err(|_| Error::new(ErrorKind::Io, "failed to open image file"))?;
        let len = file
            .metadata()
            .map_err(|_| Error::new(ErrorKind::Io, "failed to stat image file"))?
            .len();
        Ok(Self { file, len })
    }
}

impl BlockDevice for FileBlockDevice {
    fn sector_size(&self) -> u32 {
        SECTOR_SIZE
    }

    fn total_sectors(&self) -> u64 {
        self.len / SECTOR_SIZE as u64
    }

    fn read_sectors(&mut self, lba: u64, count: u32, buf: &mut [u8]) -> Result<usize> {
        let len = count as usize * SECTOR_SIZE as usize;
        self.file
            .seek(SeekFrom::Start(lba * SECTOR_SIZE as u64))
            .map_err(|_| Error::new(ErrorKind::Io, "seek failed"))?;
        self.file
            .read_exact(&mut buf[..len])
            .map_err(|_| Error::new(ErrorKind::Io, "read failed"))?;
        Ok(len)
    }
}
