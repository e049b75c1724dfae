//! 数据流位置解析
//!
//! 把数据流中的位置计数器映射为一个 block run。位置从 0 开始，
//! 每解析成功一次调用方就前进 1；解析失败或得到空 run 即表示流结束。

use crate::{
    block::{BlockDev, BlockDevice},
    consts::*,
    error::{Error, ErrorKind, Result},
    superblock::Volume,
    types::{BlockRun, DataStream},
};
use log::{debug, trace};

const END_OF_STREAM: Error = Error::new(ErrorKind::NotFound, "position beyond data stream");

/// 数据流解析器
///
/// 不做缓存，每次解析都重新读取间接块，可以乱序调用。
pub struct Resolver<'a, D: BlockDevice> {
    bdev: &'a mut BlockDev<D>,
    vol: Volume,
}

impl<'a, D: BlockDevice> Resolver<'a, D> {
    pub fn new(bdev: &'a mut BlockDev<D>, vol: Volume) -> Self {
        Self { bdev, vol }
    }

    pub fn volume(&self) -> &Volume {
        &self.vol
    }

    pub(crate) fn bdev(&mut self) -> &mut BlockDev<D> {
        &mut *self.bdev
    }

    /// 解析位置 `pos` 对应的 block run
    ///
    /// # 参数
    ///
    /// * `ds` - 数据流
    /// * `pos` - 位置计数器
    ///
    /// # 返回
    ///
    /// 找到返回非空 run；超出所有层级或遇到空槽返回 `NotFound`；
    /// 块读取失败原样返回 `Io`
    pub fn resolve(&mut self, ds: &DataStream, pos: u64) -> Result<BlockRun> {
        if pos < ds.max_direct_range {
            // 直接层：位置同时就是数组下标
            trace!("resolve {} in direct tier", pos);
            return match ds.direct.get(pos as usize) {
                Some(run) if !run.is_empty() => Ok(*run),
                _ => Err(END_OF_STREAM),
            };
        }

        if pos < ds.indirect_end() {
            let p = pos - ds.max_direct_range;
            trace!("resolve {} in indirect tier (offset {})", pos, p);
            return self.indirect_lookup(&ds.indirect, p);
        }

        if pos < ds.double_indirect_end() {
            let p = pos - ds.indirect_end();
            trace!("resolve {} in double-indirect tier (offset {})", pos, p);
            return self.double_indirect_lookup(&ds.double_indirect, p);
        }

        Err(END_OF_STREAM)
    }

    /// 在间接块数组中取第 `p` 个 run
    fn indirect_lookup(&mut self, indirect: &BlockRun, p: u64) -> Result<BlockRun> {
        let rpb = self.vol.records_per_block();

        // 间接 run 可能跨多个块
        let addr = indirect.advance(p / rpb).ok_or(END_OF_STREAM)?;
        let slot = (p % rpb) as usize;

        let block = self.bdev.read_blocks(self.vol.block_number(&addr), 1)?;
        let off = slot * BEFS_BLOCK_RUN_SIZE;
        let run = BlockRun::from_bytes(&block[off..], self.vol.fs_type())?;

        if run.is_empty() {
            return Err(END_OF_STREAM);
        }
        Ok(run)
    }

    /// 顺序扫描二级间接 run 的各个块，找到覆盖 `p` 的间接指针后转入间接查找
    fn double_indirect_lookup(&mut self, double: &BlockRun, mut p: u64) -> Result<BlockRun> {
        let rpb = self.vol.records_per_block();
        let fs_type = self.vol.fs_type();
        let first = self.vol.block_number(double);

        for i in 0..double.len as u64 {
            let block = self.bdev.read_blocks(first.saturating_add(i), 1)?;

            for record in block.chunks_exact(BEFS_BLOCK_RUN_SIZE) {
                let indirect = BlockRun::from_bytes(record, fs_type)?;
                let covered = indirect.len as u64 * rpb;
                if p < covered {
                    return self.indirect_lookup(&indirect, p);
                }
                p -= covered;
            }
        }

        debug!("double-indirect run {:?} exhausted", double);
        Err(END_OF_STREAM)
    }

    /// 从位置 0 开始依次产出数据流的所有 run
    pub fn runs<'r>(&'r mut self, ds: &DataStream) -> Runs<'r, 'a, D> {
        Runs {
            resolver: self,
            ds: *ds,
            pos: 0,
            done: false,
        }
    }
}

/// [`Resolver::runs`] 返回的迭代器
///
/// 遇到 `NotFound` 正常结束，其他错误产出一次后结束。
pub struct Runs<'r, 'a, D: BlockDevice> {
    resolver: &'r mut Resolver<'a, D>,
    ds: DataStream,
    pos: u64,
    done: bool,
}

impl<D: BlockDevice> Runs<'_, '_, D> {
    /// 下一个要解析的位置
    pub fn position(&self) -> u64 {
        self.pos
    }
}

impl<D: BlockDevice> Iterator for Runs<'_, '_, D> {
    type Item = Result<BlockRun>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.resolver.resolve(&self.ds, self.pos) {
            Ok(run) => {
                self.pos += 1;
                Some(Ok(run))
            }
            Err(e) if e.is_not_found() => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
