// 公共API暴露
mod cli;
mod config;
mod error;
mod generator;
mod models;
mod parser;
mod resolver;
mod utils;

pub use cli::{CliArgs, Command, DEFAULT_COMPILER, parse_args, parse_from, usage};
pub use config::{GpuBackend, ProjectVariant, VariantTable};
pub use error::{ConfigurationError, Result};
pub use generator::{
    absolutize_flag, generate_clangd_fragments, generate_compile_commands, generate_settings,
    merge_clangd,
};
pub use models::{CompileCommand, CompilerConfiguration, Query, Settings};
pub use parser::{MANIFEST_FILE_NAME, load_manifest, parse_manifest};
pub use resolver::FlagResolver;
pub use utils::{compute_absolute_path, is_debug_mode, set_debug_mode};
