//! 字节序编解码
//!
//! BeFS 卷只有两种字节序：小端的 X86 卷和大端的 PPC 卷。所有磁盘结构都通过
//! 同一个按字段读取的游标 [`FieldReader`] 解码，结构体只需要按顺序列出字段。

use core::str::FromStr;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::{
    consts::*,
    error::{Error, ErrorKind, Result},
};

/// 卷的字节序变体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsType {
    /// 大端（PowerPC）
    Ppc,
    /// 小端（x86）
    X86,
}

impl FsType {
    /// 从数值标记构造（1 = PPC，2 = X86）
    pub fn from_raw(tag: u32) -> Result<Self> {
        match tag {
            BEFS_PPC => Ok(FsType::Ppc),
            BEFS_X86 => Ok(FsType::X86),
            _ => Err(Error::new(
                ErrorKind::Unsupported,
                "unknown befs byte-order variant",
            )),
        }
    }

    /// 数值标记
    pub fn raw(self) -> u32 {
        match self {
            FsType::Ppc => BEFS_PPC,
            FsType::X86 => BEFS_X86,
        }
    }

    /// 编译目标的原生字节序对应的变体
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            FsType::Ppc
        } else {
            FsType::X86
        }
    }

    /// superblock 在设备上的字节偏移
    pub fn superblock_offset(self) -> u64 {
        match self {
            FsType::Ppc => BEFS_SUPERBLOCK_OFFSET_PPC,
            FsType::X86 => BEFS_SUPERBLOCK_OFFSET_X86,
        }
    }

    pub fn read_u16(self, buf: &[u8]) -> u16 {
        match self {
            FsType::Ppc => BigEndian::read_u16(buf),
            FsType::X86 => LittleEndian::read_u16(buf),
        }
    }

    pub fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            FsType::Ppc => BigEndian::read_u32(buf),
            FsType::X86 => LittleEndian::read_u32(buf),
        }
    }

    pub fn read_u64(self, buf: &[u8]) -> u64 {
        match self {
            FsType::Ppc => BigEndian::read_u64(buf),
            FsType::X86 => LittleEndian::read_u64(buf),
        }
    }

    pub fn write_u16(self, buf: &mut [u8], value: u16) {
        match self {
            FsType::Ppc => BigEndian::write_u16(buf, value),
            FsType::X86 => LittleEndian::write_u16(buf, value),
        }
    }

    pub fn write_u32(self, buf: &mut [u8], value: u32) {
        match self {
            FsType::Ppc => BigEndian::write_u32(buf, value),
            FsType::X86 => LittleEndian::write_u32(buf, value),
        }
    }

    pub fn write_u64(self, buf: &mut [u8], value: u64) {
        match self {
            FsType::Ppc => BigEndian::write_u64(buf, value),
            FsType::X86 => LittleEndian::write_u64(buf, value),
        }
    }
}

impl FromStr for FsType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x86" => Ok(FsType::X86),
            "ppc" => Ok(FsType::Ppc),
            _ => Err(Error::new(
                ErrorKind::Unsupported,
                "unknown befs filesystem type",
            )),
        }
    }
}

/// 按字段顺序读取磁盘结构的游标
///
/// 调用方先用 [`FieldReader::new`] 检查缓冲区至少容纳整个结构，
/// 之后的字段读取不会失败。
pub struct FieldReader<'a> {
    buf: &'a [u8],
    pos: usize,
    fs_type: FsType,
}

impl<'a> FieldReader<'a> {
    /// 创建游标，`size` 为结构体在磁盘上的大小
    pub fn new(buf: &'a [u8], size: usize, fs_type: FsType) -> Result<Self> {
        if buf.len() < size {
            return Err(Error::corrupted(
                crate::error::Corruption::OutOfBounds,
                "buffer too small for on-disk structure",
            ));
        }
        Ok(Self {
            buf: &buf[..size],
            pos: 0,
            fs_type,
        })
    }

    pub fn fs_type(&self) -> FsType {
        self.fs_type
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, len: usize) -> &'a [u8] {
        let buf = self.buf;
        let bytes = &buf[self.pos..self.pos + len];
        self.pos += len;
        bytes
    }

    pub fn u16(&mut self) -> u16 {
        let fs_type = self.fs_type;
        fs_type.read_u16(self.take(2))
    }

    pub fn u32(&mut self) -> u32 {
        let fs_type = self.fs_type;
        fs_type.read_u32(self.take(4))
    }

    pub fn u64(&mut self) -> u64 {
        let fs_type = self.fs_type;
        fs_type.read_u64(self.take(8))
    }

    /// 原样拷贝的字节数组（不做字节序转换）
    pub fn bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N));
        out
    }

    pub fn skip(&mut self, len: usize) {
        self.pos += len;
    }
}

/// [`FieldReader`] 的逆操作
pub struct FieldWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
    fs_type: FsType,
}

impl<'a> FieldWriter<'a> {
    pub fn new(buf: &'a mut [u8], size: usize, fs_type: FsType) -> Result<Self> {
        if buf.len() < size {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "buffer too small for on-disk structure",
            ));
        }
        Ok(Self {
            buf,
            pos: 0,
            fs_type,
        })
    }

    fn take(&mut self, len: usize) -> &mut [u8] {
        let start = self.pos;
        self.pos += len;
        &mut self.buf[start..start + len]
    }

    pub fn u16(&mut self, value: u16) {
        let fs_type = self.fs_type;
        fs_type.write_u16(self.take(2), value);
    }

    pub fn u32(&mut self, value: u32) {
        let fs_type = self.fs_type;
        fs_type.write_u32(self.take(4), value);
    }

    pub fn u64(&mut self, value: u64) {
        let fs_type = self.fs_type;
        fs_type.write_u64(self.take(8), value);
    }

    pub fn bytes(&mut self, value: &[u8]) {
        self.take(value.len()).copy_from_slice(value);
    }

    pub fn skip(&mut self, len: usize) {
        self.take(len).fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_tags() {
        assert_eq!(FsType::from_raw(1).unwrap(), FsType::Ppc);
        assert_eq!(FsType::from_raw(2).unwrap(), FsType::X86);
        let err = FsType::from_raw(3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);

        assert_eq!("x86".parse::<FsType>().unwrap(), FsType::X86);
        assert_eq!("ppc".parse::<FsType>().unwrap(), FsType::Ppc);
        assert_eq!(
            "m68k".parse::<FsType>().unwrap_err().kind(),
            ErrorKind::Unsupported
        );
    }

    #[test]
    fn test_field_byte_order() {
        let bytes = [0x12, 0x34, 0x56, 0x78];
        assert_eq!(FsType::X86.read_u32(&bytes), 0x7856_3412);
        assert_eq!(FsType::Ppc.read_u32(&bytes), 0x1234_5678);
        assert_eq!(FsType::X86.read_u16(&bytes), 0x3412);
        assert_eq!(FsType::Ppc.read_u16(&bytes), 0x1234);
    }

    #[test]
    fn test_reader_writer_sequence() {
        for fs_type in [FsType::X86, FsType::Ppc] {
            let mut buf = [0u8; 16];
            let mut w = FieldWriter::new(&mut buf, 16, fs_type).unwrap();
            w.u16(0xbeef);
            w.skip(2);
            w.u32(0xdead_beef);
            w.u64(0x0102_0304_0506_0708);

            let mut r = FieldReader::new(&buf, 16, fs_type).unwrap();
            assert_eq!(r.u16(), 0xbeef);
            r.skip(2);
            assert_eq!(r.u32(), 0xdead_beef);
            assert_eq!(r.u64(), 0x0102_0304_0506_0708);
            assert_eq!(r.position(), 16);
        }
    }

    #[test]
    fn test_reader_rejects_short_buffer() {
        let buf = [0u8; 4];
        assert!(FieldReader::new(&buf, 8, FsType::X86).is_err());
    }
}
