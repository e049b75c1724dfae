//! 块设备抽象
//!
//! 提供块设备接口和块级 I/O 操作。

mod device;
#[cfg(feature = "std")]
mod file;
mod io;

pub use device::{BlockDev, BlockDevice};
#[cfg(feature = "std")]
pub use file::FileBlockDevice;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemDevice;

    #[test]
    fn test_read_block_uses_volume_block_size() {
        let mut image = alloc::vec![0u8; 8192];
        image[2048..4096].fill(0xab);
        let mut bdev = BlockDev::new(MemDevice::new(image));

        bdev.set_block_size(2048);
        let data = bdev.read_blocks(1, 1).unwrap();
        assert_eq!(data.len(), 2048);
        assert!(data.iter().all(|&b| b == 0xab));
        assert_eq!(bdev.read_count(), 1);
    }

    #[test]
    fn test_read_bytes_unaligned() {
        let image: alloc::vec::Vec<u8> = (0..4096u32).map(|i| i as u8).collect();
        let mut bdev = BlockDev::new(MemDevice::new(image));

        let mut buf = [0u8; 10];
        bdev.read_bytes(510, &mut buf).unwrap();
        assert_eq!(buf, [254, 255, 0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_read_past_end_is_io_error() {
        let mut bdev = BlockDev::new(MemDevice::new(alloc::vec![0u8; 2048]));
        let err = bdev.read_blocks(2, 1).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Io);
    }
}
