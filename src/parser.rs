use crate::config::{DEFAULT_STANDARD, GpuBackend, ProjectVariant, VariantTable};
use crate::debug_println;
use crate::error::{ConfigurationError, Result};
use roxmltree::{Document, Node};
use std::path::Path;

/// 项目根目录下的默认清单文件名
pub const MANIFEST_FILE_NAME: &str = "ycmconf.xml";

const ROOT_TAG: &str = "YcmConf_project_file";

/// 从文件读取并解析变体清单
pub fn load_manifest(path: &Path) -> Result<VariantTable> {
    debug_println!("[DEBUG parser] Reading manifest: {}", path.display());
    let xml_content = std::fs::read_to_string(path)?;
    parse_manifest(&xml_content)
}

/// 解析变体清单
pub fn parse_manifest(xml_content: &str) -> Result<VariantTable> {
    let doc = Document::parse(xml_content)?;
    let root = doc.root_element();

    if root.tag_name().name() != ROOT_TAG {
        return Err(ConfigurationError::Manifest(format!(
            "expected <{}> root element, found <{}>",
            ROOT_TAG,
            root.tag_name().name()
        )));
    }

    let project = child(root, "Project")
        .ok_or_else(|| ConfigurationError::Manifest("No <Project> found".into()))?;

    // === 变体 ===
    let mut variants = Vec::new();
    for node in children(project, "Variant") {
        variants.push(parse_variant(node)?);
    }
    if variants.is_empty() {
        return Err(ConfigurationError::Manifest("No <Variant> found in project".into()));
    }

    // === 默认变体，未指定时取第一个 ===
    let default_variant = children(project, "Option")
        .find_map(|n| n.attribute("default"))
        .map(str::to_string)
        .unwrap_or_else(|| variants[0].name.clone());
    debug_println!("[DEBUG parser] Default variant: {}", default_variant);

    VariantTable::new(variants, &default_variant)
}

fn parse_variant(node: Node) -> Result<ProjectVariant> {
    let name = node
        .attribute("name")
        .ok_or_else(|| ConfigurationError::Manifest("<Variant> without name attribute".into()))?;
    debug_println!("[DEBUG parser] Parsing variant: {}", name);

    let mut variant = ProjectVariant::new(name);

    for option in children(node, "Option") {
        if let Some(standard) = option.attribute("std") {
            variant.standard = standard.trim_start_matches("-std=").to_string();
        }
        if let Some(debug) = option.attribute("debug") {
            variant.debug_info = parse_bool(debug, name, "debug")?;
        }
        if let Some(warnings) = option.attribute("warnings") {
            variant.all_warnings = match warnings {
                "all" => true,
                "none" | "default" => false,
                other => {
                    return Err(ConfigurationError::Manifest(format!(
                        "variant '{}': unknown warnings level '{}'",
                        name, other
                    )));
                }
            };
        }
    }
    if variant.standard.is_empty() {
        variant.standard = DEFAULT_STANDARD.to_string();
    }

    for path in children(node, "Path") {
        variant.path_prefixes.push(required(path, "prefix", name)?.to_string());
    }
    for include in children(node, "Include") {
        variant.include_dirs.push(required(include, "directory", name)?.to_string());
    }

    let mut forced = children(node, "ForcedInclude");
    if let Some(forced_node) = forced.next() {
        variant.forced_include = Some(required(forced_node, "header", name)?.to_string());
        if forced.next().is_some() {
            return Err(ConfigurationError::Manifest(format!(
                "variant '{}' declares more than one <ForcedInclude>",
                name
            )));
        }
    }

    let mut gpu_nodes = children(node, "Gpu");
    if let Some(gpu) = gpu_nodes.next() {
        // 目录和宏缺一不可，避免只启用一半的后端
        variant.gpu = Some(GpuBackend {
            include_dir: required(gpu, "directory", name)?.to_string(),
            define: required(gpu, "define", name)?.to_string(),
        });
        if gpu_nodes.next().is_some() {
            return Err(ConfigurationError::Manifest(format!(
                "variant '{}' declares more than one <Gpu>",
                name
            )));
        }
    }

    for define in children(node, "Define") {
        variant.defines.push(required(define, "name", name)?.to_string());
    }

    debug_println!("[DEBUG parser] Parsed variant: {:?}", variant);
    Ok(variant)
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.tag_name().name() == tag)
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |n| n.tag_name().name() == tag)
}

fn required<'a>(node: Node<'a, '_>, attr: &str, variant: &str) -> Result<&'a str> {
    node.attribute(attr).ok_or_else(|| {
        ConfigurationError::Manifest(format!(
            "variant '{}': <{}> is missing the '{}' attribute",
            variant,
            node.tag_name().name(),
            attr
        ))
    })
}

fn parse_bool(value: &str, variant: &str, attr: &str) -> Result<bool> {
    match value {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigurationError::Manifest(format!(
            "variant '{}': invalid value '{}' for '{}'",
            variant, other, attr
        ))),
    }
}
