//! 文件系统高级 API
//!
//! 这个模块提供只读 BeFS 卷的挂载、路径访问和元数据接口。

mod config;
mod file;
mod filesystem;
mod metadata;

pub use config::FsConfig;
pub use file::File;
pub use filesystem::BefsFileSystem;
pub use metadata::{FileMetadata, FileType, StatFs};
