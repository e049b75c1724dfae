//! Superblock 操作模块
//!
//! 这个模块提供 BeFS superblock 的读取、验证，以及由它得到的卷上下文。

mod read;
mod volume;

pub use read::*;
pub use volume::Volume;
