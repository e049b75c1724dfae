//! 索引头部与节点定位
//!
//! 目录和属性索引的数据流被当作一串节点：第一个 run 以索引头部开头，
//! 头部的 `node_size` 指出第一个节点的位置；之后每个 run 的开头各有一个节点。

use crate::{
    block::BlockDevice,
    error::{Corruption, Error, Result},
    extent::Resolver,
    superblock::Volume,
    types::{BlockRun, DataStream, IndexEntryHeader},
};
use log::{debug, error};

use super::IndexNode;

/// 根据索引头部计算第一个节点的 (块号, 块内偏移)
///
/// # 参数
///
/// * `vol` - 卷上下文
/// * `run` - 数据流的第一个 run
/// * `header` - 已解码的索引头部
pub fn first_node_location(
    vol: &Volume,
    run: &BlockRun,
    header: &IndexEntryHeader,
) -> Result<(u64, usize)> {
    let block_size = vol.block_size();

    if header.node_size < block_size {
        return Ok((vol.block_number(run), header.node_size as usize));
    }

    let skip = (header.node_size / block_size) as u64;
    let addr = run.advance(skip).ok_or(Error::corrupted(
        Corruption::OutOfBounds,
        "index node lies beyond the first run",
    ))?;
    Ok((
        vol.block_number(&addr),
        (header.node_size % block_size) as usize,
    ))
}

impl<D: BlockDevice> Resolver<'_, D> {
    /// 读取数据流中的第 `index` 个节点
    ///
    /// # 返回
    ///
    /// 流已结束返回 `Ok(None)`；索引头部魔数错误返回 `Corrupted(BadMagic)`
    pub fn read_index_node(&mut self, ds: &DataStream, index: u64) -> Result<Option<IndexNode>> {
        let run = match self.resolve(ds, index) {
            Ok(run) => run,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        let vol = *self.volume();
        let (block, offset) = if index == 0 {
            let first = self.bdev().read_blocks(vol.block_number(&run), 1)?;
            let header = IndexEntryHeader::decode(&first, vol.fs_type())?;
            if !header.is_valid() {
                error!("bad index entry magic {:#x}", header.magic);
                return Err(Error::corrupted(
                    Corruption::BadMagic,
                    "index entry has bad magic header",
                ));
            }
            first_node_location(&vol, &run, &header)?
        } else {
            (vol.block_number(&run), 0)
        };

        debug!("index node {} at block {} offset {}", index, block, offset);
        let data = self.bdev().read_blocks(block, 1)?;
        IndexNode::decode(&data, offset, vol.fs_type()).map(Some)
    }
}
