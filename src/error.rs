use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// 配置与磁盘上的项目结构不一致，或变体声明本身有误
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// 变体声明的 include 目录在项目根目录下不存在
    #[error("include directory of variant '{variant}' not found: {}", .path.display())]
    MissingIncludeDir { variant: String, path: PathBuf },

    /// 强制包含的头文件在所有 include 目录中都找不到
    #[error("forced include '{header}' of variant '{variant}' not found in its include directories")]
    MissingForcedInclude { variant: String, header: String },

    #[error("invalid variant: {0}")]
    InvalidVariant(String),

    #[error("invalid manifest: {0}")]
    Manifest(String),

    #[error("failed to parse manifest XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
