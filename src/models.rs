use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 补全引擎传入的查询：当前分析的文件路径，以及引擎附带的其他关键字参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Query {
    pub filename: PathBuf,
    /// 引擎附带的其他参数（例如 client_data），只保留，不参与解析
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Query {
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Query {
            filename: filename.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// 解析结果：一次查询对应一份全新的编译参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfiguration {
    pub variant: String,
    pub flags: Vec<String>,
    pub include_paths_relative_to: PathBuf,
}

impl CompilerConfiguration {
    /// 提取所有 -I 参数对应的目录（保持顺序）
    pub fn include_dirs(&self) -> Vec<&str> {
        self.flags
            .iter()
            .filter_map(|f| f.strip_prefix("-I"))
            .map(|p| p.strip_prefix("./").unwrap_or(p))
            .collect()
    }

    pub fn defines(&self) -> Vec<&str> {
        self.flags.iter().filter_map(|f| f.strip_prefix("-D")).collect()
    }

    pub fn forced_include(&self) -> Option<&str> {
        self.flags.iter().find_map(|f| f.strip_prefix("--include="))
    }
}

/// 引擎期望的返回结构，用于输出 {"flags": [...]} JSON
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub flags: Vec<String>,
    pub include_paths_relative_to_dir: String,
}

/// 编译命令结构，用于生成compile_commands.json
#[derive(Debug, Serialize)]
pub struct CompileCommand {
    pub directory: String,
    pub arguments: Vec<String>,
    pub file: String,
}
