//! 数据流的顺序字节读取

use super::Resolver;
use crate::{
    block::BlockDevice,
    error::{Error, ErrorKind, Result},
    types::DataStream,
};
use log::{trace, warn};

impl<D: BlockDevice> Resolver<'_, D> {
    /// 从数据流的字节偏移处读取
    ///
    /// 从位置 0 开始累加每个 run 的字节数，找到包含 `offset` 的 run 后
    /// 逐块拷贝，首尾不对齐的部分块单独处理。
    ///
    /// # 参数
    ///
    /// * `ds` - 数据流
    /// * `offset` - 起始字节偏移
    /// * `buf` - 目标缓冲区
    ///
    /// # 返回
    ///
    /// 成功返回读取的字节数，超出 `ds.size` 的部分被截断；
    /// 在到达所需字节之前 run 用尽返回 `Gap`
    pub fn read_at(&mut self, ds: &DataStream, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if offset >= ds.size || buf.is_empty() {
            return Ok(0);
        }

        let want = (buf.len() as u64).min(ds.size - offset) as usize;
        let vol = *self.volume();
        let block_size = vol.block_size() as u64;

        trace!("read_at offset={} len={} size={}", offset, want, ds.size);

        let mut sum = 0u64;
        let mut pos = 0u64;
        let mut copied = 0usize;

        while copied < want {
            let run = match self.resolve(ds, pos) {
                Ok(run) => run,
                Err(e) if e.is_not_found() => {
                    warn!(
                        "data stream ends at position {} ({} bytes) before offset {}",
                        pos,
                        sum,
                        offset + copied as u64
                    );
                    return Err(Error::new(ErrorKind::Gap, "hole in data stream"));
                }
                Err(e) => return Err(e),
            };
            pos += 1;

            let run_bytes = vol.run_bytes(&run);
            let cur = offset + copied as u64;
            if cur >= sum + run_bytes {
                sum += run_bytes;
                continue;
            }

            let first = vol.block_number(&run);
            let mut in_block = ((cur - sum) % block_size) as usize;

            for blk in (cur - sum) / block_size..run.len as u64 {
                let data = self.bdev().read_blocks(first.saturating_add(blk), 1)?;
                let n = (block_size as usize - in_block).min(want - copied);
                buf[copied..copied + n].copy_from_slice(&data[in_block..in_block + n]);
                copied += n;
                in_block = 0;
                if copied == want {
                    break;
                }
            }
            sum += run_bytes;
        }

        Ok(copied)
    }
}
