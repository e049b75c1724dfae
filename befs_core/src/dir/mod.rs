//! 目录操作模块
//!
//! 目录内容是一个索引：键为文件名，值为 inode 编号。这里提供按名查找、
//! 可恢复的惰性遍历，以及路径解析。属性目录和索引目录使用同样的结构。

mod entry;
mod iter;
mod lookup;

pub use entry::{DirCursor, DirEntry};
pub use iter::{read_entry, DirIter};
pub use lookup::{find, lookup, lookup_path};
