//! 名称查找与路径解析

use crate::{
    block::{BlockDev, BlockDevice},
    consts::*,
    error::{Error, ErrorKind, Result},
    extent::Resolver,
    inode::Inode,
    superblock::Volume,
    types::DataStream,
};
use log::{debug, trace};

/// 在索引数据流中查找名称
///
/// 逐个节点线性扫描，逐字节比较，返回第一个匹配项的值。
///
/// # 参数
///
/// * `resolver` - 数据流解析器
/// * `ds` - 目录（或索引）的数据流
/// * `name` - UTF-8 编码的名称
///
/// # 返回
///
/// 找到返回值（目录中为 inode 编号），数据流走完仍未找到返回 `NotFound`
pub fn find<D: BlockDevice>(
    resolver: &mut Resolver<'_, D>,
    ds: &DataStream,
    name: &[u8],
) -> Result<u64> {
    let mut index = 0u64;
    while let Some(node) = resolver.read_index_node(ds, index)? {
        if let Some(value) = node.find(name) {
            trace!("found {:?} in node {} -> {}", name, index, value);
            return Ok(value);
        }
        index += 1;
    }
    Err(Error::new(ErrorKind::NotFound, "no such entry"))
}

/// 在目录 inode 中查找一个名称
///
/// # 返回
///
/// 找到返回 inode 编号；名称超过 255 字节返回 `NameTooLong`；
/// 不是目录返回 `NotDirectory`
pub fn lookup<D: BlockDevice>(
    bdev: &mut BlockDev<D>,
    vol: &Volume,
    dir: &Inode,
    name: &[u8],
) -> Result<u64> {
    if name.len() > BEFS_NAME_LEN {
        return Err(Error::new(ErrorKind::NameTooLong, "name too long"));
    }
    let ds = match (dir.is_dir(), dir.data_stream()) {
        (true, Some(ds)) => ds,
        _ => return Err(Error::new(ErrorKind::NotDirectory, "not a directory")),
    };
    find(&mut Resolver::new(bdev, *vol), ds, name)
}

/// 从 `root` 开始逐级解析路径
///
/// 空分量会被忽略，`.` / `..` 按目录中实际存储的键查找。
///
/// # 参数
///
/// * `bdev` - 块设备引用
/// * `vol` - 卷上下文
/// * `root` - 根目录 inode 编号
/// * `path` - 以 `/` 分隔的路径
///
/// # 返回
///
/// 成功返回目标 inode 编号
pub fn lookup_path<D: BlockDevice>(
    bdev: &mut BlockDev<D>,
    vol: &Volume,
    root: u64,
    path: &str,
) -> Result<u64> {
    debug!("lookup path {:?}", path);

    let mut ino = root;
    for component in path.split('/').filter(|c| !c.is_empty()) {
        let dir = Inode::load(bdev, vol, ino)?;
        ino = lookup(bdev, vol, &dir, component.as_bytes())?;
    }
    Ok(ino)
}
