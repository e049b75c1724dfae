//! 列出 BeFS 镜像中的目录或打印文件内容
//!
//! 用法：`cargo run --example ls_volume --features std -- <image> [options] [path]`
//!
//! `options` 与挂载选项相同，例如 `type=ppc,uid=1000`。

use std::{env, io::Write, process::ExitCode};

use befs_core::{BefsFileSystem, BlockDev, FileBlockDevice, FsConfig, Result};

fn run(image: &str, options: &str, path: &str) -> Result<()> {
    let config = FsConfig::parse_options(options)?;
    let device = FileBlockDevice::open(image)?;
    let mut fs = BefsFileSystem::mount(BlockDev::new(device), config)?;

    let sb = fs.superblock();
    println!(
        "volume {:?}: {} blocks of {} bytes, {} free",
        sb.volume_name().unwrap_or("?"),
        sb.num_blocks(),
        sb.block_size(),
        sb.free_blocks()
    );

    let meta = fs.metadata(path)?;
    if meta.is_dir() {
        for entry in fs.read_dir(path)? {
            let name = String::from_utf8_lossy(entry.name());
            println!("{:>10} {}", entry.inode(), name);
        }
    } else if meta.is_symlink() {
        let target = fs.read_link(path)?;
        println!("{} -> {}", path, String::from_utf8_lossy(&target));
    } else {
        let mut file = fs.open(path)?;
        let content = file.read_to_end(&mut fs)?;
        std::io::stdout()
            .write_all(&content)
            .map_err(|_| befs_core::Error::new(befs_core::ErrorKind::Io, "stdout write failed"))?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let Some(image) = args.get(1) else {
        eprintln!("usage: {} <image> [options] [path]", args[0]);
        return ExitCode::FAILURE;
    };
    let options = args.get(2).map(String::as_str).unwrap_or("");
    let path = args.get(3).map(String::as_str).unwrap_or("/");

    match run(image, options, path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(e.code() as u8)
        }
    }
}
