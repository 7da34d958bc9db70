use crate::config::{ProjectVariant, normalize_prefix};
use crate::debug_println;
use crate::error::Result;
use crate::models::{CompileCommand, CompilerConfiguration, Settings};
use crate::resolver::FlagResolver;
use crate::utils::{get_clean_absolute_path, to_forward_slashes};
use std::path::{Path, PathBuf};

/// 生成的 .clangd 片段都以此注释开头，合并时据此识别旧片段
const FRAGMENT_MARKER: &str = "# ycmconf: variant ";

/// 编译数据库遍历时跳过的目录
const SKIPPED_DIRS: &[&str] = &["build", "target", "node_modules"];

const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx", "C", "CPP"];

/// 转换为引擎期望的 {"flags": [...]} 结构
pub fn generate_settings(config: &CompilerConfiguration) -> Settings {
    Settings {
        flags: config.flags.clone(),
        include_paths_relative_to_dir: to_forward_slashes(&config.include_paths_relative_to),
    }
}

/// 将 -I 相对路径转为基于项目根目录的绝对路径，其他参数保持原样
pub fn absolutize_flag(flag: &str, root: &Path) -> String {
    if let Some(path_part) = flag.strip_prefix("-I") {
        let abs_path = get_clean_absolute_path(root, Path::new(path_part));
        format!("-I{}", to_forward_slashes(&abs_path))
    } else {
        flag.to_string()
    }
}

/// 为每个变体生成一个 .clangd 片段
/// 默认变体用 PathExclude 排除其他变体负责的目录
pub fn generate_clangd_fragments(resolver: &FlagResolver) -> Result<Vec<String>> {
    debug_println!("[DEBUG generator] Generating clangd fragments...");
    let table = resolver.table();
    let default_name = &table.default_variant().name;

    let mut fragments = Vec::with_capacity(table.variants().len());
    for variant in table.variants() {
        let condition = if &variant.name == default_name {
            let others: Vec<String> = table
                .variants()
                .iter()
                .filter(|v| &v.name != default_name)
                .flat_map(|v| v.path_prefixes.iter())
                .map(|p| path_regex(p))
                .collect();
            if others.is_empty() {
                "  PathMatch: .*".to_string()
            } else {
                format!("  PathExclude: [{}]", others.join(", "))
            }
        } else if variant.path_prefixes.is_empty() {
            // 没有前缀的非默认变体不会被选中，跳过
            debug_println!(
                "[DEBUG generator] Variant {} owns no paths, skipping",
                variant.name
            );
            continue;
        } else {
            let matches: Vec<String> = variant.path_prefixes.iter().map(|p| path_regex(p)).collect();
            format!("  PathMatch: [{}]", matches.join(", "))
        };

        let config = resolver.configuration_for(variant)?;
        fragments.push(render_fragment(variant, &condition, &config, resolver.root()));
    }

    debug_println!("[DEBUG generator] Generated {} fragments", fragments.len());
    Ok(fragments)
}

fn path_regex(prefix: &str) -> String {
    let normalized = normalize_prefix(prefix);
    if normalized.is_empty() {
        ".*".to_string()
    } else {
        format!("{}/.*", normalized)
    }
}

fn render_fragment(
    variant: &ProjectVariant,
    condition: &str,
    config: &CompilerConfiguration,
    root: &Path,
) -> String {
    let mut content = format!("{}{}\nIf:\n{}\n\nCompileFlags:\n  Add:\n", FRAGMENT_MARKER, variant.name, condition);
    for flag in &config.flags {
        let flag = absolutize_flag(flag, root);
        debug_println!("[DEBUG generator] Added flag: {}", flag);
        content.push_str(&format!("    - \"{}\"\n", flag.replace('\\', "\\\\").replace('"', "\\\"")));
    }
    content.trim_end().to_string()
}

/// 合并已有的 .clangd：保留非本工具生成的片段，替换旧的生成片段
pub fn merge_clangd(existing_content: &str, fragments: &[String]) -> String {
    let mut final_parts: Vec<String> = Vec::new();

    if !existing_content.trim().is_empty() {
        for part in existing_content.split("\n---") {
            let trimmed_part = part.trim();
            if trimmed_part.is_empty() {
                continue;
            }
            if trimmed_part.contains(FRAGMENT_MARKER) {
                debug_println!("[DEBUG generator] Dropping previously generated fragment");
            } else {
                final_parts.push(trimmed_part.to_string());
            }
        }
    }

    final_parts.extend(fragments.iter().cloned());
    let mut merged = final_parts.join("\n\n---\n");
    merged.push('\n');
    merged
}

/// 遍历项目目录，为每个源文件生成编译命令
pub fn generate_compile_commands(
    resolver: &FlagResolver,
    compiler: &str,
) -> Result<Vec<CompileCommand>> {
    let root = resolver.root();
    debug_println!(
        "[DEBUG generator] Generating compile commands under {}",
        root.display()
    );

    let mut sources = Vec::new();
    collect_sources(root, &mut sources)?;
    sources.sort();

    let directory = to_forward_slashes(root);
    let mut compile_commands = Vec::with_capacity(sources.len());
    for src in sources {
        let config = resolver.resolve(&crate::models::Query::new(&src))?;
        let file = to_forward_slashes(&src);

        let mut arguments = vec![compiler.to_string(), "-c".to_string()];
        arguments.extend(config.flags.iter().map(|f| absolutize_flag(f, root)));
        arguments.push(file.clone());

        debug_println!(
            "[DEBUG generator] {} -> variant {}",
            file,
            config.variant
        );
        compile_commands.push(CompileCommand {
            directory: directory.clone(),
            arguments,
            file,
        });
    }

    debug_println!(
        "[DEBUG generator] Successfully generated {} compile commands",
        compile_commands.len()
    );
    Ok(compile_commands)
}

fn collect_sources(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if entry.file_type()?.is_dir() {
            if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref()) {
                continue;
            }
            collect_sources(&path, out)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
        {
            out.push(path);
        }
    }
    Ok(())
}
