//! 挂载配置

use crate::{
    endian::FsType,
    error::{Error, ErrorKind, Result},
};
use log::debug;

/// 文件系统挂载配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsConfig {
    pub fs_type: FsType,    // 字节序变体，不做自动探测
    pub uid: Option<u32>,   // 覆盖所有 inode 的属主
    pub gid: Option<u32>,   // 覆盖所有 inode 的属组
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            fs_type: FsType::native(),
            uid: None,
            gid: None,
        }
    }
}

impl FsConfig {
    pub fn new(fs_type: FsType) -> Self {
        Self {
            fs_type,
            ..Self::default()
        }
    }

    /// 解析逗号分隔的挂载选项
    ///
    /// 支持 `uid=N`、`gid=N`、`type=x86|ppc`，空项忽略。
    ///
    /// # 返回
    ///
    /// 未知的 `type` 返回 `Unsupported`，其他无法识别的选项返回 `InvalidInput`
    pub fn parse_options(options: &str) -> Result<Self> {
        let mut config = Self::default();

        for opt in options.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            let (key, value) = opt.split_once('=').unwrap_or((opt, ""));
            match key {
                "uid" => config.uid = Some(parse_id(value)?),
                "gid" => config.gid = Some(parse_id(value)?),
                "type" => config.fs_type = value.parse()?,
                _ => {
                    debug!("unrecognized mount option {:?}", opt);
                    return Err(Error::new(ErrorKind::InvalidInput, "unrecognized mount option"));
                }
            }
        }
        Ok(config)
    }

    /// 实际生效的 uid：覆盖值为 0 时不生效
    pub fn effective_uid(&self, disk_uid: u32) -> u32 {
        match self.uid {
            Some(uid) if uid != 0 => uid,
            _ => disk_uid,
        }
    }

    /// 实际生效的 gid
    pub fn effective_gid(&self, disk_gid: u32) -> u32 {
        match self.gid {
            Some(gid) if gid != 0 => gid,
            _ => disk_gid,
        }
    }
}

fn parse_id(value: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|_| Error::new(ErrorKind::InvalidInput, "invalid uid/gid value"))
}
