use std::fs;
use std::io::Read;
use std::path::PathBuf;

use ycmconf::{
    Command, FlagResolver, Query, VariantTable, compute_absolute_path, debug_println,
    generate_clangd_fragments, generate_compile_commands, generate_settings, load_manifest,
    merge_clangd, parse_args, set_debug_mode,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args()?;
    set_debug_mode(args.debug);

    if args.show_version {
        println!("ycmconf v{}", VERSION);
        return Ok(());
    }

    // 项目根目录，默认当前目录
    let root = compute_absolute_path(&args.root.clone().unwrap_or_else(|| PathBuf::from(".")))?;
    debug_println!("[DEBUG] Project Root: {}", root.display());

    let resolver = match &args.manifest {
        Some(manifest) => FlagResolver::new(&root, load_manifest(manifest)?),
        None => FlagResolver::discover(&root)?,
    }
    .with_validation(args.validate);

    let Some(command) = args.command else {
        return Ok(());
    };

    match command {
        Command::Settings(file) => {
            let query = if file == "-" {
                let mut input = String::new();
                std::io::stdin().read_to_string(&mut input)?;
                serde_json::from_str::<Query>(&input)?
            } else {
                Query::new(file)
            };
            let config = resolver.resolve(&query)?;
            debug_println!("[DEBUG] Resolved variant: {}", config.variant);
            println!("{}", serde_json::to_string_pretty(&generate_settings(&config))?);
        }
        Command::Variants => {
            print_variants(resolver.table());
        }
        Command::Clangd => {
            let clangd_path = root.join(".clangd");
            let fragments = generate_clangd_fragments(&resolver)?;

            let existing_content = if clangd_path.exists() {
                fs::read_to_string(&clangd_path)?
            } else {
                String::new()
            };
            fs::write(&clangd_path, merge_clangd(&existing_content, &fragments))?;
            println!(
                "Updated {} ({} variants)",
                clangd_path.display(),
                fragments.len()
            );
        }
        Command::CompDb { compiler } => {
            let compile_commands = generate_compile_commands(&resolver, &compiler)?;
            let cdb_path = root.join("compile_commands.json");
            fs::write(&cdb_path, serde_json::to_string_pretty(&compile_commands)?)?;
            println!(
                "Generated {} ({} entries)",
                cdb_path.display(),
                compile_commands.len()
            );
        }
    }

    Ok(())
}

fn print_variants(table: &VariantTable) {
    let default_name = &table.default_variant().name;
    for variant in table.variants() {
        let marker = if &variant.name == default_name { " (default)" } else { "" };
        println!("{}{}", variant.name, marker);
        if !variant.path_prefixes.is_empty() {
            println!("  paths: {}", variant.path_prefixes.join(", "));
        }
        println!("  flags: {}", variant.to_flags().join(" "));
    }
}
