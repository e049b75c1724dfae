//! 数据流寻址模块
//!
//! BeFS 的文件、目录、属性内容都由数据流描述：12 个直接 run，
//! 一个间接 run（指向存放 run 数组的块），一个二级间接 run
//! （指向存放间接 run 数组的块）。这个模块把位置映射为 run，
//! 并在此之上提供按字节偏移的顺序读取。

mod read;
mod resolve;

pub use resolve::{Resolver, Runs};
