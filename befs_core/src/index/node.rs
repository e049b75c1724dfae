//! 索引节点解码

use alloc::vec::Vec;

use crate::{
    consts::*,
    endian::{FieldReader, FsType},
    error::{Corruption, Error, ErrorKind, Result},
    types::IndexNodeHeader,
};
use log::error;

/// 已解码的索引节点
///
/// 键字节、偏移数组、值数组都拷贝出来，解码时一次性校验完毕，
/// 之后的 [`IndexNode::key_at`] 不会再遇到越界。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexNode {
    header: IndexNodeHeader,
    keys: Vec<u8>,
    offsets: Vec<u16>,
    values: Vec<u64>,
}

impl IndexNode {
    /// 从块内偏移 `offset` 处解码节点
    ///
    /// # 参数
    ///
    /// * `block` - 节点所在块的内容
    /// * `offset` - 节点头在块内的字节偏移
    /// * `fs_type` - 字节序变体
    ///
    /// # 返回
    ///
    /// 任何越界返回 `Corrupted(OutOfBounds)`；偏移数组非递增或末项不等于键总长
    /// 返回 `Corrupted(KeyOffsets)`
    pub fn decode(block: &[u8], offset: usize, fs_type: FsType) -> Result<Self> {
        let node = block.get(offset..).ok_or(Error::corrupted(
            Corruption::OutOfBounds,
            "index node offset beyond block",
        ))?;
        let header = IndexNodeHeader::decode(node, fs_type)?;

        let count = header.all_key_count as usize;
        let key_len = header.all_key_length as usize;

        let keys_end = BEFS_INDEX_NODE_HEADER_SIZE + key_len;
        let offsets_at = keys_end.next_multiple_of(BEFS_INDEX_KEY_ALIGN);
        let values_at = offsets_at + count * 2;
        let end = values_at + count * 8;

        if end > node.len() {
            error!(
                "index node ({} keys, {} key bytes) overruns block at offset {}",
                count, key_len, offset
            );
            return Err(Error::corrupted(
                Corruption::OutOfBounds,
                "index node overruns block",
            ));
        }

        let keys = node[BEFS_INDEX_NODE_HEADER_SIZE..keys_end].to_vec();

        let mut r = FieldReader::new(&node[offsets_at..], count * 10, fs_type)?;
        let offsets: Vec<u16> = (0..count).map(|_| r.u16()).collect();
        let values: Vec<u64> = (0..count).map(|_| r.u64()).collect();

        if offsets.windows(2).any(|w| w[0] > w[1]) {
            error!("index node key offsets not monotonic: {:?}", offsets);
            return Err(Error::corrupted(
                Corruption::KeyOffsets,
                "index key offsets are not monotonic",
            ));
        }
        if let Some(&last) = offsets.last() {
            if last as usize != key_len {
                error!("last key offset {} != key length {}", last, key_len);
                return Err(Error::corrupted(
                    Corruption::KeyOffsets,
                    "last key offset does not match key length",
                ));
            }
        }

        Ok(Self {
            header,
            keys,
            offsets,
            values,
        })
    }

    pub fn header(&self) -> &IndexNodeHeader {
        &self.header
    }

    /// 左兄弟节点（不被遍历使用）
    pub fn left(&self) -> u64 {
        self.header.left
    }

    /// 右兄弟节点（不被遍历使用）
    pub fn right(&self) -> u64 {
        self.header.right
    }

    pub fn overflow(&self) -> u64 {
        self.header.overflow
    }

    /// 键的数量
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// 第 `i` 个键及其值
    ///
    /// 键 `i` 占据 `[offsets[i-1], offsets[i])`，`offsets[-1]` 视为 0。
    pub fn key_at(&self, i: usize) -> Result<(&[u8], u64)> {
        if i >= self.len() {
            return Err(Error::new(ErrorKind::OutOfRange, "key index out of range"));
        }
        let start = if i == 0 { 0 } else { self.offsets[i - 1] as usize };
        let end = self.offsets[i] as usize;
        Ok((&self.keys[start..end], self.values[i]))
    }

    /// 按位置顺序遍历全部键值
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], u64)> + '_ {
        (0..self.len()).filter_map(move |i| self.key_at(i).ok())
    }

    /// 线性扫描查找完全相同的键，返回第一个匹配的值
    pub fn find(&self, name: &[u8]) -> Option<u64> {
        self.iter().find(|(key, _)| *key == name).map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::build_node;

    #[test]
    fn test_bin_home_node() {
        for fs_type in [FsType::X86, FsType::Ppc] {
            let node = build_node(&[("bin", 100), ("home", 200)], fs_type);
            let node = IndexNode::decode(&node, 0, fs_type).unwrap();

            assert_eq!(node.len(), 2);
            assert_eq!(node.key_at(0).unwrap(), (&b"bin"[..], 100));
            assert_eq!(node.key_at(1).unwrap(), (&b"home"[..], 200));
            assert_eq!(
                node.key_at(2).unwrap_err().kind(),
                ErrorKind::OutOfRange
            );
            assert_eq!(node.left(), u64::MAX);
        }
    }

    #[test]
    fn test_offset_array_alignment() {
        // 28 + 7 = 35，偏移数组对齐到 40
        let raw = build_node(&[("bin", 100), ("home", 200)], FsType::X86);
        assert_eq!(&raw[40..44], &[3, 0, 7, 0]);
        assert_eq!(raw.len(), 40 + 4 + 16);
    }

    #[test]
    fn test_key_lengths_and_values_reproduced() {
        let entries = [
            (".", 8),
            ("..", 8),
            ("", 3),
            ("a-much-longer-name.txt", 0x1_0000_0001),
            ("z", 42),
        ];
        let raw = build_node(&entries, FsType::Ppc);
        let node = IndexNode::decode(&raw, 0, FsType::Ppc).unwrap();

        for (i, (key, value)) in entries.iter().enumerate() {
            let (k, v) = node.key_at(i).unwrap();
            assert_eq!(k.len(), key.len());
            assert_eq!((k, v), (key.as_bytes(), *value));
        }
        assert_eq!(node.find(b"z"), Some(42));
        assert_eq!(node.find(b"missing"), None);
    }

    #[test]
    fn test_decode_at_block_offset() {
        let node = build_node(&[("x", 1)], FsType::X86);
        let mut block = alloc::vec![0u8; 1024];
        block[512..512 + node.len()].copy_from_slice(&node);

        let node = IndexNode::decode(&block, 512, FsType::X86).unwrap();
        assert_eq!(node.key_at(0).unwrap(), (&b"x"[..], 1));
    }

    #[test]
    fn test_empty_node() {
        let raw = build_node(&[], FsType::X86);
        let node = IndexNode::decode(&raw, 0, FsType::X86).unwrap();
        assert!(node.is_empty());
        assert_eq!(node.iter().count(), 0);
    }

    #[test]
    fn test_rejects_non_monotonic_offsets() {
        let mut raw = build_node(&[("bin", 100), ("home", 200)], FsType::X86);
        // 偏移 [3, 7] 改成 [8, 7]
        raw[40] = 8;
        let err = IndexNode::decode(&raw, 0, FsType::X86).unwrap_err();
        assert_eq!(err.corruption(), Some(Corruption::KeyOffsets));
    }

    #[test]
    fn test_rejects_last_offset_mismatch() {
        let mut raw = build_node(&[("bin", 100), ("home", 200)], FsType::X86);
        raw[42] = 6;
        let err = IndexNode::decode(&raw, 0, FsType::X86).unwrap_err();
        assert_eq!(err.corruption(), Some(Corruption::KeyOffsets));
    }

    #[test]
    fn test_rejects_overrun() {
        let raw = build_node(&[("bin", 100), ("home", 200)], FsType::X86);
        let err = IndexNode::decode(&raw[..raw.len() - 1], 0, FsType::X86).unwrap_err();
        assert_eq!(err.corruption(), Some(Corruption::OutOfBounds));

        let err = IndexNode::decode(&raw, raw.len() + 1, FsType::X86).unwrap_err();
        assert_eq!(err.corruption(), Some(Corruption::OutOfBounds));
    }
}
