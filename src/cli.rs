use std::path::PathBuf;

/// 子命令
#[derive(Debug, PartialEq)]
pub enum Command {
    /// 输出单个文件的 settings JSON；"-" 表示从 stdin 读取 JSON 查询
    Settings(String),
    Variants,
    Clangd,
    CompDb { compiler: String },
}

/// 命令行参数结构
#[derive(Debug)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub validate: bool,
    pub debug: bool,
    pub show_version: bool,
    pub command: Option<Command>,
}

pub const DEFAULT_COMPILER: &str = "clang++";

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {0} [--root DIR] [--manifest FILE] [--validate] [--debug] <command>\n\
         Commands:\n\
         \x20 settings <FILE|->           Print completion flags for a file (\"-\" reads a JSON query from stdin)\n\
         \x20 variants                    List project variants and their flags\n\
         \x20 clangd                      Write or merge <root>/.clangd\n\
         \x20 compdb [--compiler CC]      Write <root>/compile_commands.json\n\
         \x20 {0} --version | -v          Show version information",
        program
    )
}

/// 解析命令行参数
pub fn parse_args() -> Result<CliArgs, Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    parse_from(&args)
}

/// 解析参数列表（第一个元素为程序名）
pub fn parse_from(args: &[String]) -> Result<CliArgs, Box<dyn std::error::Error>> {
    let program = args.first().map(String::as_str).unwrap_or("ycmconf");
    let mut cli = CliArgs {
        root: None,
        manifest: None,
        validate: false,
        debug: false,
        show_version: false,
        command: None,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--version" | "-v" => cli.show_version = true,
            "--validate" => cli.validate = true,
            "--debug" => cli.debug = true,
            "--root" => {
                let value = iter.next().ok_or("--root requires a directory")?;
                cli.root = Some(PathBuf::from(value));
            }
            "--manifest" => {
                let value = iter.next().ok_or("--manifest requires a file")?;
                cli.manifest = Some(PathBuf::from(value));
            }
            "settings" => {
                let file = iter.next().ok_or("settings requires a file path or \"-\"")?;
                cli.command = Some(Command::Settings(file.clone()));
            }
            "variants" => cli.command = Some(Command::Variants),
            "clangd" => cli.command = Some(Command::Clangd),
            "compdb" => {
                let mut compiler = DEFAULT_COMPILER.to_string();
                if let Some(next) = iter.next() {
                    if next != "--compiler" {
                        return Err(format!("unexpected argument after compdb: {}", next).into());
                    }
                    compiler = iter.next().ok_or("--compiler requires a value")?.clone();
                }
                cli.command = Some(Command::CompDb { compiler });
            }
            other => {
                return Err(format!("unknown argument: {}\n{}", other, usage(program)).into());
            }
        }
    }

    if !cli.show_version && cli.command.is_none() {
        return Err(usage(program).into());
    }
    Ok(cli)
}
