// crates/aq_config/src/lib.rs

//! 配置层 (Layer 3)
//!
//! 把区域投影参数、插值参数和默认边界框组合为一个可从 JSON 加载的部署配置。
//!
//! # 模块概览
//!
//! - [`app_config`]: AppConfig 部署配置
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 4: aq_cli      ─> uses AppConfig
//! Layer 3: aq_config   ─> AppConfig (本层)
//! Layer 2: aq_kriging  ─> KrigingParams, FieldInterpolator
//! Layer 1: aq_geo      ─> RegionParams, GeoBounds
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app_config;
pub mod error;

/// 层级标识
pub const LAYER: u8 = 3;

// 重导出核心类型
pub use app_config::AppConfig;
pub use error::ConfigError;
