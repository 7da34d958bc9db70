//! 根据文件所属的子项目（变体）解析编译参数

use crate::config::{ProjectVariant, VariantTable};
use crate::debug_println;
use crate::error::{ConfigurationError, Result};
use crate::models::{CompilerConfiguration, Query};
use crate::parser::{MANIFEST_FILE_NAME, load_manifest};
use crate::utils::{compute_absolute_path, get_clean_absolute_path, relative_to_root};
use std::path::{Path, PathBuf};

/// 无状态解析器，可在线程间共享
#[derive(Debug, Clone)]
pub struct FlagResolver {
    root: PathBuf,
    table: VariantTable,
    validate: bool,
}

impl FlagResolver {
    /// 宽松模式：不访问文件系统
    /// 相对的 root 按当前目录转为绝对路径，引擎传入的文件路径都是绝对路径
    pub fn new(root: impl Into<PathBuf>, table: VariantTable) -> Self {
        FlagResolver {
            root: absolute_root(root.into()),
            table,
            validate: false,
        }
    }

    /// 校验模式：每次解析都检查 include 目录和强制包含的头文件是否存在
    pub fn validating(root: impl Into<PathBuf>, table: VariantTable) -> Self {
        FlagResolver {
            validate: true,
            ..FlagResolver::new(root, table)
        }
    }

    /// 根目录下存在 ycmconf.xml 时使用清单，否则使用内置变体
    pub fn discover(root: impl Into<PathBuf>) -> Result<Self> {
        let root = absolute_root(root.into());
        let manifest = root.join(MANIFEST_FILE_NAME);
        let table = if manifest.is_file() {
            load_manifest(&manifest)?
        } else {
            debug_println!(
                "[DEBUG resolver] No {} under {}, using built-in variants",
                MANIFEST_FILE_NAME,
                root.display()
            );
            VariantTable::builtin()
        };
        Ok(FlagResolver::new(root, table))
    }

    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn table(&self) -> &VariantTable {
        &self.table
    }

    /// 选择文件所属的变体，项目外的文件使用默认变体
    pub fn resolve_variant(&self, file: &Path) -> &ProjectVariant {
        match relative_to_root(&self.root, file) {
            Some(relative) => self.table.select(&relative),
            None => {
                debug_println!(
                    "[DEBUG resolver] {} is outside {}, using default variant",
                    file.display(),
                    self.root.display()
                );
                self.table.default_variant()
            }
        }
    }

    pub fn resolve(&self, query: &Query) -> Result<CompilerConfiguration> {
        debug_println!("[DEBUG resolver] Resolving flags for {}", query.filename.display());
        let variant = self.resolve_variant(&query.filename);
        self.configuration_for(variant)
    }

    /// 直接生成指定变体的配置，不经过路径选择
    pub fn configuration_for(&self, variant: &ProjectVariant) -> Result<CompilerConfiguration> {
        if self.validate {
            self.check_on_disk(variant)?;
        }
        Ok(CompilerConfiguration {
            variant: variant.name.clone(),
            flags: variant.to_flags(),
            include_paths_relative_to: self.root.clone(),
        })
    }

    fn check_on_disk(&self, variant: &ProjectVariant) -> Result<()> {
        let include_dirs: Vec<PathBuf> = variant
            .all_include_dirs()
            .into_iter()
            .map(|dir| get_clean_absolute_path(&self.root, Path::new(dir)))
            .collect();

        for dir in &include_dirs {
            debug_println!("[DEBUG resolver] Checking include directory: {}", dir.display());
            if !dir.is_dir() {
                return Err(ConfigurationError::MissingIncludeDir {
                    variant: variant.name.clone(),
                    path: dir.clone(),
                });
            }
        }

        if let Some(header) = &variant.forced_include {
            let found = include_dirs.iter().any(|dir| dir.join(header).is_file())
                || self.root.join(header).is_file();
            if !found {
                return Err(ConfigurationError::MissingForcedInclude {
                    variant: variant.name.clone(),
                    header: header.clone(),
                });
            }
        }
        Ok(())
    }
}

/// 逻辑上转为绝对路径；取不到当前目录时保留原路径
fn absolute_root(root: PathBuf) -> PathBuf {
    match compute_absolute_path(&root) {
        Ok(abs) => abs,
        Err(e) => {
            debug_println!(
                "[DEBUG resolver] Cannot make {} absolute: {}",
                root.display(),
                e
            );
            root
        }
    }
}
