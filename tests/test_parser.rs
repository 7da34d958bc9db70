use std::path::Path;
use ycmconf::{ConfigurationError, FlagResolver, Query, parse_manifest};

const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<YcmConf_project_file>
    <Project>
        <Option default="engine" />
        <Variant name="engine">
            <Option std="c++20" debug="1" warnings="all" />
            <Path prefix="src/engine" />
            <Include directory="extern/libme/include" />
            <Include directory="extern/glfw/include" />
            <Include directory="extern/portaudio/include" />
            <Include directory="extern/rapidxml/include" />
            <ForcedInclude header="lme/type.hpp" />
            <Gpu directory="extern/vulkan/include" define="ME_USE_VULKAN" />
        </Variant>
        <Variant name="game">
            <Option warnings="all" />
            <Path prefix="src/game" />
            <Include directory="extern/libme/include" />
            <Include directory="extern/glfw/include" />
            <Include directory="extern/portaudio/include" />
            <ForcedInclude header="lme/type.hpp" />
            <Define name="GAME_BUILD=1" />
        </Variant>
        <Variant name="libme">
            <Option std="-std=c++17" debug="0" />
            <Path prefix="extern" />
            <Include directory="extern/libme/include" />
        </Variant>
    </Project>
</YcmConf_project_file>"#;

#[test]
fn test_parse_manifest() {
    let table = parse_manifest(MANIFEST).unwrap();
    assert_eq!(table.variants().len(), 3);
    assert_eq!(table.default_variant().name, "engine");

    let engine = table.get("engine").unwrap();
    assert!(engine.all_warnings);
    assert_eq!(engine.include_dirs.len(), 4);
    assert_eq!(engine.forced_include.as_deref(), Some("lme/type.hpp"));
    assert_eq!(engine.gpu.as_ref().unwrap().define, "ME_USE_VULKAN");

    let game = table.get("game").unwrap();
    assert_eq!(game.standard, "c++20");
    assert!(game.debug_info);
    assert_eq!(game.defines, vec!["GAME_BUILD=1"]);
    assert!(game.gpu.is_none());

    let libme = table.get("libme").unwrap();
    assert_eq!(libme.standard, "c++17");
    assert!(!libme.debug_info);
    assert!(!libme.all_warnings);
}

#[test]
fn test_manifest_resolution_matches_builtin() {
    let from_manifest = FlagResolver::new("/proj", parse_manifest(MANIFEST).unwrap());
    let builtin = FlagResolver::new("/proj", ycmconf::VariantTable::builtin());
    let query = Query::new("src/engine/audio/portaudio/PortAudio.cpp");
    assert_eq!(
        from_manifest.resolve(&query).unwrap().flags,
        builtin.resolve(&query).unwrap().flags
    );

    let game = from_manifest.resolve(&Query::new(Path::new("src/game/Main.cpp"))).unwrap();
    assert_eq!(game.flags.last().map(String::as_str), Some("-DGAME_BUILD=1"));
}

#[test]
fn test_default_falls_back_to_first_variant() {
    let xml = r#"<YcmConf_project_file><Project>
        <Variant name="only"><Include directory="include"/></Variant>
    </Project></YcmConf_project_file>"#;
    let table = parse_manifest(xml).unwrap();
    assert_eq!(table.default_variant().name, "only");
    assert_eq!(
        table.default_variant().to_flags(),
        vec!["-g", "-std=c++20", "-I./include"]
    );
}

#[test]
fn test_partial_gpu_backend_is_rejected() {
    let xml = r#"<YcmConf_project_file><Project>
        <Variant name="engine"><Gpu directory="extern/vulkan/include"/></Variant>
    </Project></YcmConf_project_file>"#;
    assert!(matches!(parse_manifest(xml), Err(ConfigurationError::Manifest(_))));
}

#[test]
fn test_invalid_manifests() {
    // 根元素错误
    assert!(matches!(
        parse_manifest("<Other><Project/></Other>"),
        Err(ConfigurationError::Manifest(_))
    ));
    // 没有变体
    assert!(parse_manifest("<YcmConf_project_file><Project/></YcmConf_project_file>").is_err());
    // 默认变体不存在
    let xml = r#"<YcmConf_project_file><Project>
        <Option default="missing"/>
        <Variant name="a"/>
    </Project></YcmConf_project_file>"#;
    assert!(matches!(parse_manifest(xml), Err(ConfigurationError::InvalidVariant(_))));
    // 非法的 warnings 取值
    let xml = r#"<YcmConf_project_file><Project>
        <Variant name="a"><Option warnings="loud"/></Variant>
    </Project></YcmConf_project_file>"#;
    assert!(parse_manifest(xml).is_err());
    // XML 语法错误
    assert!(matches!(
        parse_manifest("<YcmConf_project_file>"),
        Err(ConfigurationError::Xml(_))
    ));
}

#[test]
fn test_gpu_macro_without_backend_is_rejected() {
    let xml = r#"<YcmConf_project_file><Project>
        <Option default="engine"/>
        <Variant name="engine">
            <Path prefix="src/engine"/>
            <Gpu directory="extern/vulkan/include" define="ME_USE_VULKAN"/>
        </Variant>
        <Variant name="game">
            <Path prefix="src/game"/>
            <Define name="ME_USE_VULKAN"/>
        </Variant>
    </Project></YcmConf_project_file>"#;
    assert!(matches!(parse_manifest(xml), Err(ConfigurationError::InvalidVariant(_))));
}

#[test]
fn test_invalid_define_name_is_rejected() {
    let xml = r#"<YcmConf_project_file><Project>
        <Variant name="a"><Define name="-std=c++17"/></Variant>
    </Project></YcmConf_project_file>"#;
    assert!(matches!(parse_manifest(xml), Err(ConfigurationError::InvalidVariant(_))));
}
