// aqfield\apps\aq_cli\src\commands\mod.rs

//! 子命令实现

pub mod info;
pub mod interpolate;
pub mod lookup;
pub mod validate;

use anyhow::{Context, Result};
use aq_config::AppConfig;
use std::path::Path;

/// 加载配置文件；未指定时使用默认配置
pub(crate) fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}
