use crate::debug_println;
use crate::error::{ConfigurationError, Result};
use std::collections::HashSet;

pub const DEFAULT_STANDARD: &str = "c++20";

/// GPU 后端：头文件目录与启用宏必须同时出现
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuBackend {
    pub include_dir: String,
    pub define: String,
}

/// 一个子项目（变体）的编译参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectVariant {
    pub name: String,
    pub path_prefixes: Vec<String>, // 相对项目根目录，例如 "src/engine"
    pub standard: String,           // e.g., "c++20"
    pub debug_info: bool,
    pub all_warnings: bool,
    pub include_dirs: Vec<String>, // 相对项目根目录
    pub forced_include: Option<String>,
    pub gpu: Option<GpuBackend>,
    pub defines: Vec<String>,
}

impl ProjectVariant {
    pub fn new(name: &str) -> Self {
        ProjectVariant {
            name: name.to_string(),
            path_prefixes: Vec::new(),
            standard: DEFAULT_STANDARD.to_string(),
            debug_info: true,
            all_warnings: false,
            include_dirs: Vec::new(),
            forced_include: None,
            gpu: None,
            defines: Vec::new(),
        }
    }

    /// 所有 include 目录，GPU 后端的目录排在最后
    pub fn all_include_dirs(&self) -> Vec<&str> {
        let mut dirs: Vec<&str> = self.include_dirs.iter().map(String::as_str).collect();
        if let Some(gpu) = &self.gpu {
            dirs.push(&gpu.include_dir);
        }
        dirs
    }

    /// 按固定顺序生成参数：-g, -Wall, -std, -I..., --include=..., -D...
    pub fn to_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if self.debug_info {
            flags.push("-g".to_string());
        }
        if self.all_warnings {
            flags.push("-Wall".to_string());
        }
        flags.push(format!("-std={}", self.standard));

        for dir in self.all_include_dirs() {
            flags.push(format!("-I./{}", dir.trim_start_matches("./")));
        }
        if let Some(header) = &self.forced_include {
            flags.push(format!("--include={}", header));
        }
        for define in &self.defines {
            flags.push(format!("-D{}", define));
        }
        if let Some(gpu) = &self.gpu {
            flags.push(format!("-D{}", gpu.define));
        }
        debug_println!("[DEBUG config] Flags for variant {}: {:?}", self.name, flags);
        flags
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigurationError::InvalidVariant("variant name is empty".into()));
        }
        if self.standard.trim().is_empty() || self.standard.starts_with("-std") {
            return Err(ConfigurationError::InvalidVariant(format!(
                "variant '{}' has invalid language standard '{}'",
                self.name, self.standard
            )));
        }
        for define in &self.defines {
            if !is_valid_define(define) {
                return Err(ConfigurationError::InvalidVariant(format!(
                    "variant '{}' has invalid define '{}'",
                    self.name, define
                )));
            }
        }
        if let Some(gpu) = &self.gpu {
            if gpu.include_dir.trim().is_empty() || !is_valid_define(&gpu.define) {
                return Err(ConfigurationError::InvalidVariant(format!(
                    "variant '{}' has an incomplete GPU backend",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// 变体名到编译参数的映射，外加默认变体
#[derive(Debug, Clone)]
pub struct VariantTable {
    variants: Vec<ProjectVariant>,
    default_variant: String,
}

impl VariantTable {
    pub fn new(variants: Vec<ProjectVariant>, default_variant: &str) -> Result<Self> {
        debug_println!(
            "[DEBUG config] Building variant table with {} variants, default: {}",
            variants.len(),
            default_variant
        );
        if variants.is_empty() {
            return Err(ConfigurationError::InvalidVariant("no variants declared".into()));
        }

        let mut names = HashSet::new();
        let mut prefixes = HashSet::new();
        for variant in &variants {
            variant.validate()?;
            if !names.insert(variant.name.as_str()) {
                return Err(ConfigurationError::InvalidVariant(format!(
                    "duplicate variant name '{}'",
                    variant.name
                )));
            }
            for prefix in &variant.path_prefixes {
                let normalized = normalize_prefix(prefix);
                if !prefixes.insert(normalized.clone()) {
                    return Err(ConfigurationError::InvalidVariant(format!(
                        "path prefix '{}' is claimed by more than one variant",
                        normalized
                    )));
                }
            }
        }

        // GPU 宏只能随 <Gpu> 一起出现，不能作为普通 define 单独启用
        let gpu_macros: HashSet<&str> = variants
            .iter()
            .filter_map(|v| v.gpu.as_ref())
            .map(|gpu| define_name(&gpu.define))
            .collect();
        for variant in &variants {
            if let Some(define) = variant
                .defines
                .iter()
                .find(|d| gpu_macros.contains(define_name(d)))
            {
                return Err(ConfigurationError::InvalidVariant(format!(
                    "variant '{}' defines GPU backend macro '{}' without its backend",
                    variant.name, define
                )));
            }
        }

        if !names.contains(default_variant) {
            return Err(ConfigurationError::InvalidVariant(format!(
                "default variant '{}' is not declared",
                default_variant
            )));
        }

        Ok(VariantTable {
            variants,
            default_variant: default_variant.to_string(),
        })
    }

    /// 内置的三个变体：engine（Vulkan + RapidXML）、game（窗口 + 音频）、libme（仅基础库）
    pub fn builtin() -> Self {
        let engine = ProjectVariant {
            path_prefixes: vec!["src/engine".to_string()],
            all_warnings: true,
            include_dirs: vec![
                "extern/libme/include".to_string(),
                "extern/glfw/include".to_string(),
                "extern/portaudio/include".to_string(),
                "extern/rapidxml/include".to_string(),
            ],
            forced_include: Some("lme/type.hpp".to_string()),
            gpu: Some(GpuBackend {
                include_dir: "extern/vulkan/include".to_string(),
                define: "ME_USE_VULKAN".to_string(),
            }),
            ..ProjectVariant::new("engine")
        };

        let game = ProjectVariant {
            path_prefixes: vec!["src/game".to_string()],
            all_warnings: true,
            include_dirs: vec![
                "extern/libme/include".to_string(),
                "extern/glfw/include".to_string(),
                "extern/portaudio/include".to_string(),
            ],
            forced_include: Some("lme/type.hpp".to_string()),
            ..ProjectVariant::new("game")
        };

        let libme = ProjectVariant {
            path_prefixes: vec!["extern".to_string()],
            include_dirs: vec!["extern/libme/include".to_string()],
            ..ProjectVariant::new("libme")
        };

        VariantTable {
            variants: vec![engine, game, libme],
            default_variant: "engine".to_string(),
        }
    }

    pub fn variants(&self) -> &[ProjectVariant] {
        &self.variants
    }

    pub fn get(&self, name: &str) -> Option<&ProjectVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    pub fn default_variant(&self) -> &ProjectVariant {
        // new() 保证默认变体存在
        self.get(&self.default_variant)
            .unwrap_or(&self.variants[0])
    }

    /// 按最长路径前缀选择变体，找不到时使用默认变体
    pub fn select(&self, relative_path: &std::path::Path) -> &ProjectVariant {
        let mut best: Option<(&ProjectVariant, usize)> = None;
        for variant in &self.variants {
            for prefix in &variant.path_prefixes {
                let normalized = normalize_prefix(prefix);
                let prefix_path = std::path::Path::new(&normalized);
                if relative_path.starts_with(prefix_path) {
                    let depth = prefix_path.components().count();
                    if best.is_none_or(|(_, d)| depth > d) {
                        best = Some((variant, depth));
                    }
                }
            }
        }
        match best {
            Some((variant, _)) => {
                debug_println!(
                    "[DEBUG config] {} matched variant {}",
                    relative_path.display(),
                    variant.name
                );
                variant
            }
            None => {
                debug_println!(
                    "[DEBUG config] {} matched no prefix, using default {}",
                    relative_path.display(),
                    self.default_variant
                );
                self.default_variant()
            }
        }
    }
}

impl Default for VariantTable {
    fn default() -> Self {
        VariantTable::builtin()
    }
}

/// "NAME=VALUE" 中的宏名
fn define_name(define: &str) -> &str {
    define.split_once('=').map_or(define, |(name, _)| name)
}

/// 宏名必须是合法的 C 标识符
fn is_valid_define(define: &str) -> bool {
    let mut chars = define_name(define).chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// 前缀统一为正斜杠、去掉 "./" 和结尾斜杠
pub(crate) fn normalize_prefix(prefix: &str) -> String {
    let s = prefix.replace('\\', "/");
    let s = s.trim_start_matches("./");
    s.trim_end_matches('/').to_string()
}
