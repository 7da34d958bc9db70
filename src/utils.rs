use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

// 全局调试控制标志，默认关闭
static DEBUG_MODE: AtomicBool = AtomicBool::new(false);

/// 设置调试模式
pub fn set_debug_mode(enabled: bool) {
    DEBUG_MODE.store(enabled, Ordering::Relaxed);
}

/// 获取当前调试模式状态
pub fn is_debug_mode() -> bool {
    DEBUG_MODE.load(Ordering::Relaxed)
}

/// 条件打印宏，只有在调试模式下才会打印
/// 输出到 stderr，保证 stdout 上的 JSON 不被污染
#[macro_export]
macro_rules! debug_println {
    ($($arg:tt)*) => {
        if $crate::is_debug_mode() {
            eprintln!($($arg)*);
        }
    };
}

/// 逻辑上解析绝对路径（不依赖文件系统存在性，仅处理路径组件）
/// 用于 root + ../extern/include 这类路径计算
pub fn get_clean_absolute_path(base: &Path, rel: &Path) -> PathBuf {
    let mut result = base.to_path_buf();

    let mut components = rel.components();
    while let Some(component) = components.next() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(c) => {
                result.push(c);
            }
            Component::RootDir => {
                result = PathBuf::from(component.as_os_str());
            }
            Component::Prefix(prefix) => {
                // Windows 盘符，后面紧跟的根目录一并处理
                result = PathBuf::from(prefix.as_os_str());
                if let Some(next_component) = components.next() {
                    result.push(next_component);
                }
            }
            Component::CurDir => {}
        }
    }
    result
}

/// 逻辑上计算绝对路径（不解析符号链接或映射驱动器）
/// 替代 std::fs::canonicalize，避免将 Z: 解析为 UNC 路径
pub fn compute_absolute_path(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(get_clean_absolute_path(Path::new(""), &absolute))
}

/// 计算文件相对于项目根目录的逻辑路径
/// 不在根目录下的绝对路径返回 None
pub fn relative_to_root(root: &Path, file: &Path) -> Option<PathBuf> {
    let clean_root = get_clean_absolute_path(Path::new(""), root);
    if file.is_absolute() {
        if !root.is_absolute() {
            return None;
        }
        let clean_file = get_clean_absolute_path(Path::new(""), file);
        clean_file
            .strip_prefix(&clean_root)
            .ok()
            .map(Path::to_path_buf)
    } else {
        // 相对路径视为相对于项目根目录，".." 越界时视为不在项目内
        let mut depth = 0usize;
        let mut result = PathBuf::new();
        for component in file.components() {
            match component {
                Component::Normal(c) => {
                    result.push(c);
                    depth += 1;
                }
                Component::ParentDir => {
                    if depth == 0 {
                        return None;
                    }
                    result.pop();
                    depth -= 1;
                }
                _ => {}
            }
        }
        Some(result)
    }
}

/// 统一使用正斜杠，保证 flags 在各平台上逐字节一致
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_mode_toggle() {
        set_debug_mode(true);
        assert!(is_debug_mode());

        set_debug_mode(false);
        assert!(!is_debug_mode());
    }

    #[test]
    fn test_get_clean_absolute_path() {
        let base = PathBuf::from("/proj");
        assert_eq!(
            get_clean_absolute_path(&base, Path::new("../libs/test.cpp")),
            PathBuf::from("/libs/test.cpp")
        );
        assert_eq!(
            get_clean_absolute_path(&base, Path::new("./src/Main.cpp")),
            PathBuf::from("/proj/src/Main.cpp")
        );
        // 绝对路径输入直接覆盖 base
        assert_eq!(
            get_clean_absolute_path(&base, Path::new("/other/file.cpp")),
            PathBuf::from("/other/file.cpp")
        );
    }

    #[test]
    fn test_compute_absolute_path() {
        let abs = compute_absolute_path(Path::new("test/../src/main.rs")).unwrap();
        assert!(abs.is_absolute());
        assert!(!abs.to_string_lossy().contains(".."));
        assert!(abs.ends_with("src/main.rs"));
    }

    #[test]
    fn test_relative_to_root() {
        let root = Path::new("/proj");
        assert_eq!(
            relative_to_root(root, Path::new("/proj/src/game/Main.cpp")),
            Some(PathBuf::from("src/game/Main.cpp"))
        );
        assert_eq!(
            relative_to_root(root, Path::new("/proj/src/../extern/src/file.cpp")),
            Some(PathBuf::from("extern/src/file.cpp"))
        );
        assert_eq!(relative_to_root(root, Path::new("/elsewhere/a.cpp")), None);
        assert_eq!(
            relative_to_root(root, Path::new("./src/engine/Logger.cpp")),
            Some(PathBuf::from("src/engine/Logger.cpp"))
        );
        assert_eq!(relative_to_root(root, Path::new("../a.cpp")), None);
    }

    #[test]
    fn test_to_forward_slashes() {
        assert_eq!(to_forward_slashes(Path::new("extern\\glfw\\include")), "extern/glfw/include");
        assert_eq!(to_forward_slashes(Path::new("extern/libme/include")), "extern/libme/include");
    }
}
