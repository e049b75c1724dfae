//! 索引（B+树）节点模块
//!
//! 节点布局：28 字节头部，紧跟拼接在一起的键字节，然后是按 8 字节对齐的
//! u16 累计偏移数组，最后是 u64 值数组。`left` / `right` / `overflow`
//! 会被解码，但遍历只把数据流看作节点的线性序列，不跟随这些指针。

mod entry;
mod node;

pub use entry::first_node_location;
pub use node::IndexNode;
