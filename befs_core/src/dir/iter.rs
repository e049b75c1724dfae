//! 惰性目录遍历

use crate::{
    block::BlockDevice,
    error::Result,
    extent::Resolver,
    index::IndexNode,
    types::DataStream,
};
use log::trace;

use super::{DirCursor, DirEntry};

/// 按位置顺序产出索引数据流中的全部键值
///
/// 节点按需读取，每次只持有当前节点。出错时产出一次错误后结束。
pub struct DirIter<'r, 'a, D: BlockDevice> {
    resolver: &'r mut Resolver<'a, D>,
    ds: DataStream,
    cursor: DirCursor,
    node: Option<IndexNode>,
    done: bool,
}

impl<'r, 'a, D: BlockDevice> DirIter<'r, 'a, D> {
    /// 从头开始遍历
    pub fn new(resolver: &'r mut Resolver<'a, D>, ds: &DataStream) -> Self {
        Self::resume(resolver, ds, DirCursor::START)
    }

    /// 从之前得到的游标处继续
    pub fn resume(resolver: &'r mut Resolver<'a, D>, ds: &DataStream, cursor: DirCursor) -> Self {
        Self {
            resolver,
            ds: *ds,
            cursor,
            node: None,
            done: false,
        }
    }

    /// 下一项的位置
    pub fn cursor(&self) -> DirCursor {
        self.cursor
    }
}

impl<D: BlockDevice> Iterator for DirIter<'_, '_, D> {
    type Item = Result<DirEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let Some(node) = &self.node else {
                match self.resolver.read_index_node(&self.ds, self.cursor.node) {
                    Ok(Some(node)) => self.node = Some(node),
                    Ok(None) => self.done = true,
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
                continue;
            };

            if let Ok((name, value)) = node.key_at(self.cursor.key) {
                self.cursor.key += 1;
                return Some(Ok(DirEntry::new(name, value, self.cursor)));
            }

            trace!("index node {} exhausted", self.cursor.node);
            self.cursor = DirCursor::new(self.cursor.node + 1, 0);
            self.node = None;
        }
        None
    }
}

/// 一次读取一项并推进游标
///
/// # 返回
///
/// 没有更多项时返回 `Ok(None)`，游标保持不变
pub fn read_entry<D: BlockDevice>(
    resolver: &mut Resolver<'_, D>,
    ds: &DataStream,
    cursor: &mut DirCursor,
) -> Result<Option<DirEntry>> {
    match DirIter::resume(resolver, ds, *cursor).next() {
        Some(Ok(entry)) => {
            *cursor = entry.next_cursor();
            Ok(Some(entry))
        }
        Some(Err(e)) => Err(e),
        None => Ok(None),
    }
}
