//! Resolver corpus tests
//!
//! Each test pairs a config with a command token and the exact expected
//! invocation (or script / error).

use xc_core::{
    resolve, CommandConfig, Destination, GlobalConfig, LoadedConfig, ProjectConfig, XcError,
};

// Helper to create argv from string slice
fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

fn project(yaml: &str) -> ProjectConfig {
    ProjectConfig::from_yaml_str(yaml).unwrap()
}

fn loaded(yaml: &str) -> LoadedConfig {
    LoadedConfig::new(project(yaml), None)
}

fn with_global(yaml: &str, global: CommandConfig) -> LoadedConfig {
    LoadedConfig::new(
        project(yaml),
        Some(GlobalConfig {
            defaults: Some(global),
            settings: None,
        }),
    )
}

const APP: &str = r#"
project: MyApp.xcodeproj
destinations:
  sim: "platform=iOS Simulator,name=iPhone 16"
  mac: "platform=macOS"
defaults:
  scheme: MyApp
  configuration: Debug
  destination: sim
commands:
  build:
    variants:
      release:
        configuration: Release
      mac:
        destination: mac
  test:
    test-plan: UnitTests
    result-bundle-path: build/Tests.xcresult
  test-without-building:
    test-plan: UnitTests
    result-bundle-path: build/Tests.xcresult
  build-for-testing:
    test-plan: UnitTests
    result-bundle-path: build/Tests.xcresult
    archive-path: build/App.xcarchive
  archive:
    configuration: Release
    archive-path: build/App.xcarchive
    test-plan: UnitTests
  lint:
    run: swiftlint lint
"#;

// =============================================================================
// Category 1: Documented examples
// =============================================================================

#[test]
fn test_example_build_with_defaults() {
    let config = loaded(APP);
    let resolved = resolve("build", None, &config, None, &[]).unwrap();

    assert_eq!(
        resolved.invocation(),
        argv(&[
            "xcodebuild",
            "build",
            "-project",
            "MyApp.xcodeproj",
            "-scheme",
            "MyApp",
            "-configuration",
            "Debug",
            "-destination",
            "platform=iOS Simulator,name=iPhone 16",
        ])
        .as_slice()
    );
    assert!(resolved.script().is_none());
}

#[test]
fn test_example_script_with_passthrough() {
    let config = loaded(APP);
    let resolved = resolve("lint", None, &config, None, &argv(&["--fix"])).unwrap();

    assert_eq!(resolved.script(), Some("swiftlint lint --fix"));
    assert!(resolved.invocation().is_empty());
}

// =============================================================================
// Category 2: Unknown commands and variants
// =============================================================================

#[test]
fn test_unknown_command_lists_sorted_names() {
    let config = loaded(APP);
    let err = resolve("deploy", None, &config, None, &[]).unwrap_err();

    match err {
        XcError::UnknownCommand { name, available } => {
            assert_eq!(name, "deploy");
            assert_eq!(
                available,
                argv(&[
                    "archive",
                    "build",
                    "build-for-testing",
                    "lint",
                    "test",
                    "test-without-building",
                ])
            );
        }
        other => panic!("expected UnknownCommand, got {:?}", other),
    }
}

#[test]
fn test_unknown_variant_lists_sorted_variants() {
    let config = loaded(APP);
    let err = resolve("build", Some("staging"), &config, None, &[]).unwrap_err();

    match &err {
        XcError::UnknownVariant {
            command,
            variant,
            available,
        } => {
            assert_eq!(command, "build");
            assert_eq!(variant, "staging");
            assert_eq!(available, &argv(&["mac", "release"]));
        }
        other => panic!("expected UnknownVariant, got {:?}", other),
    }
    assert!(err.to_string().contains("Available variants: mac, release."));
}

#[test]
fn test_unknown_variant_when_none_defined() {
    let config = loaded(APP);
    let err = resolve("test", Some("ci"), &config, None, &[]).unwrap_err();

    assert!(matches!(&err, XcError::UnknownVariant { available, .. } if available.is_empty()));
    assert!(err.to_string().contains("No variants are defined."));
}

#[test]
fn test_unknown_command_checked_before_variant() {
    let config = loaded(APP);
    let err = resolve("nope", Some("release"), &config, None, &[]).unwrap_err();
    assert!(matches!(err, XcError::UnknownCommand { .. }));
}

// =============================================================================
// Category 3: Four-layer precedence
// =============================================================================

type Setter = fn(&mut CommandConfig, &str);

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn set_scheme(c: &mut CommandConfig, v: &str) {
    c.scheme = Some(v.to_string());
}

fn set_configuration(c: &mut CommandConfig, v: &str) {
    c.configuration = Some(v.to_string());
}

fn set_test_plan(c: &mut CommandConfig, v: &str) {
    c.test_plan = Some(v.to_string());
}

fn set_result_bundle_path(c: &mut CommandConfig, v: &str) {
    c.result_bundle_path = Some(v.to_string());
}

fn set_xcconfig(c: &mut CommandConfig, v: &str) {
    c.xcconfig = Some(v.to_string());
}

fn set_derived_data_path(c: &mut CommandConfig, v: &str) {
    c.derived_data_path = Some(v.to_string());
}

fn set_destination(c: &mut CommandConfig, v: &str) {
    c.destination = Some(Destination::from(v));
}

/// (field, setter, flag) for every field that follows the 4-level chain.
/// The command is named "test" so the test-only flags are emitted.
fn layered_fields() -> Vec<(&'static str, Setter, &'static str)> {
    vec![
        ("scheme", set_scheme as Setter, "-scheme"),
        ("configuration", set_configuration, "-configuration"),
        ("test-plan", set_test_plan, "-testPlan"),
        ("result-bundle-path", set_result_bundle_path, "-resultBundlePath"),
        ("xcconfig", set_xcconfig, "-xcconfig"),
        ("derived-data-path", set_derived_data_path, "-derivedDataPath"),
        ("destination", set_destination, "-destination"),
    ]
}

/// Build a config where the selected layers set `field`
fn layered_config(
    set: Setter,
    variant: bool,
    command: bool,
    project_default: bool,
    global: bool,
) -> LoadedConfig {
    let mut variant_config = CommandConfig::default();
    let mut command_config = CommandConfig::default();
    let mut defaults = CommandConfig::default();
    let mut global_defaults = CommandConfig::default();

    if variant {
        set(&mut variant_config, "from-variant");
    }
    if command {
        set(&mut command_config, "from-command");
    }
    if project_default {
        set(&mut defaults, "from-project");
    }
    if global {
        set(&mut global_defaults, "from-global");
    }

    command_config.variants.insert("v".to_string(), variant_config);
    let mut project = ProjectConfig {
        defaults: Some(defaults),
        ..Default::default()
    };
    project.commands.insert("test".to_string(), command_config);

    LoadedConfig::new(
        project,
        Some(GlobalConfig {
            defaults: Some(global_defaults),
            settings: None,
        }),
    )
}

#[test]
fn test_every_layered_field_follows_precedence() {
    let cases: [(bool, bool, bool, bool, Option<&str>); 6] = [
        (true, false, false, false, Some("from-variant")),
        (true, true, true, true, Some("from-variant")),
        (false, true, true, true, Some("from-command")),
        (false, false, true, true, Some("from-project")),
        (false, false, false, true, Some("from-global")),
        (false, false, false, false, None),
    ];

    for (field, set, flag) in layered_fields() {
        for (variant, command, project_default, global, expected) in cases {
            let config = layered_config(set, variant, command, project_default, global);
            let resolved = resolve("test", Some("v"), &config, None, &[]).unwrap();
            assert_eq!(
                flag_value(resolved.invocation(), flag).as_deref(),
                expected,
                "field {} with layers (variant={}, command={}, project={}, global={})",
                field,
                variant,
                command,
                project_default,
                global
            );
        }
    }
}

#[test]
fn test_command_without_variant_skips_variant_layer() {
    let config = loaded(APP);
    let resolved = resolve("build", None, &config, None, &[]).unwrap();
    assert_eq!(flag_value(resolved.invocation(), "-configuration").as_deref(), Some("Debug"));

    let resolved = resolve("build", Some("release"), &config, None, &[]).unwrap();
    assert_eq!(flag_value(resolved.invocation(), "-configuration").as_deref(), Some("Release"));
}

#[test]
fn test_global_defaults_fill_gaps() {
    let config = with_global(
        "commands:\n  build: {}\n",
        CommandConfig {
            scheme: Some("Shared".to_string()),
            destination: Some(Destination::from("platform=macOS")),
            ..Default::default()
        },
    );
    let resolved = resolve("build", None, &config, None, &[]).unwrap();
    assert_eq!(
        resolved.invocation(),
        argv(&["xcodebuild", "build", "-scheme", "Shared", "-destination", "platform=macOS"]).as_slice()
    );
}

#[test]
fn test_archive_path_has_no_default_fallback() {
    let config = with_global(
        r#"
defaults:
  archive-path: project.xcarchive
  extra-args: ["-fromDefaults"]
commands:
  archive: {}
"#,
        CommandConfig {
            archive_path: Some("global.xcarchive".to_string()),
            extra_args: Some(argv(&["-fromGlobal"])),
            ..Default::default()
        },
    );
    let resolved = resolve("archive", None, &config, None, &[]).unwrap();
    assert_eq!(resolved.invocation(), argv(&["xcodebuild", "archive"]).as_slice());
}

// =============================================================================
// Category 4: Destinations
// =============================================================================

#[test]
fn test_alias_expanded() {
    let config = loaded(APP);
    let resolved = resolve("build", Some("mac"), &config, None, &[]).unwrap();
    assert_eq!(
        flag_value(resolved.invocation(), "-destination").as_deref(),
        Some("platform=macOS")
    );
}

#[test]
fn test_unknown_alias_passes_through() {
    let config = loaded(APP);
    let resolved = resolve(
        "build",
        None,
        &config,
        Some("platform=iOS Simulator,name=iPad Pro"),
        &[],
    )
    .unwrap();
    assert_eq!(
        flag_value(resolved.invocation(), "-destination").as_deref(),
        Some("platform=iOS Simulator,name=iPad Pro")
    );
}

#[test]
fn test_override_replaces_all_layers() {
    let config = loaded(
        r#"
destinations:
  sim: "platform=iOS Simulator,name=iPhone 16"
commands:
  test:
    destination: [sim, "platform=macOS"]
"#,
    );
    let resolved = resolve("test", None, &config, Some("sim"), &[]).unwrap();
    let destinations: Vec<_> = resolved
        .invocation()
        .iter()
        .filter(|a| *a == "-destination")
        .collect();
    assert_eq!(destinations.len(), 1);
    assert_eq!(
        flag_value(resolved.invocation(), "-destination").as_deref(),
        Some("platform=iOS Simulator,name=iPhone 16")
    );
}

#[test]
fn test_list_destination_one_flag_per_entry_in_order() {
    let config = loaded(
        r#"
destinations:
  sim: "platform=iOS Simulator,name=iPhone 16"
  mac: "platform=macOS"
commands:
  test:
    destination: [mac, "platform=tvOS Simulator,name=Apple TV", sim]
"#,
    );
    let resolved = resolve("test", None, &config, None, &[]).unwrap();
    assert_eq!(
        resolved.invocation(),
        argv(&[
            "xcodebuild",
            "test",
            "-destination",
            "platform=macOS",
            "-destination",
            "platform=tvOS Simulator,name=Apple TV",
            "-destination",
            "platform=iOS Simulator,name=iPhone 16",
        ])
        .as_slice()
    );
}

#[test]
fn test_variant_list_replaces_command_list() {
    let config = loaded(
        r#"
commands:
  test:
    destination: [a, b, c]
    variants:
      one:
        destination: d
"#,
    );
    let resolved = resolve("test", Some("one"), &config, None, &[]).unwrap();
    assert_eq!(
        resolved.invocation(),
        argv(&["xcodebuild", "test", "-destination", "d"]).as_slice()
    );
}

// =============================================================================
// Category 5: Action-gated flags
// =============================================================================

#[test]
fn test_test_flags_for_test_actions() {
    let config = loaded(APP);
    for action in ["test", "test-without-building"] {
        let resolved = resolve(action, None, &config, None, &[]).unwrap();
        let args = resolved.invocation();
        assert_eq!(args[1], action);
        assert_eq!(flag_value(args, "-testPlan").as_deref(), Some("UnitTests"));
        assert_eq!(
            flag_value(args, "-resultBundlePath").as_deref(),
            Some("build/Tests.xcresult")
        );
        assert!(!args.contains(&"-archivePath".to_string()));
    }
}

#[test]
fn test_no_gated_flags_for_other_actions() {
    let config = loaded(APP);
    let resolved = resolve("build-for-testing", None, &config, None, &[]).unwrap();
    let args = resolved.invocation();

    assert_eq!(args[1], "build-for-testing");
    assert!(!args.contains(&"-testPlan".to_string()));
    assert!(!args.contains(&"-resultBundlePath".to_string()));
    assert!(!args.contains(&"-archivePath".to_string()));
}

#[test]
fn test_archive_path_only_for_archive() {
    let config = loaded(APP);
    let resolved = resolve("archive", None, &config, None, &[]).unwrap();
    let args = resolved.invocation();

    assert_eq!(
        flag_value(args, "-archivePath").as_deref(),
        Some("build/App.xcarchive")
    );
    assert!(!args.contains(&"-testPlan".to_string()));
}

#[test]
fn test_variant_does_not_change_action() {
    let config = loaded(APP);
    let resolved = resolve("build", Some("release"), &config, None, &[]).unwrap();
    assert_eq!(resolved.invocation()[1], "build");
}

// =============================================================================
// Category 6: Extra arguments
// =============================================================================

const EXTRA: &str = r#"
commands:
  build:
    extra-args: ["-quiet", "-jobs", "8"]
    variants:
      ci:
        extra-args: ["-enableCodeCoverage", "YES"]
      plain: {}
      none:
        extra-args: []
  fmt:
    run: swiftformat .
    extra-args: ["--lint"]
    variants:
      fix:
        extra-args: ["--swiftversion", "6"]
"#;

#[test]
fn test_variant_extra_args_replace_command_args() {
    let config = loaded(EXTRA);
    let resolved = resolve("build", Some("ci"), &config, None, &argv(&["-dry-run"])).unwrap();
    assert_eq!(
        resolved.invocation(),
        argv(&["xcodebuild", "build", "-enableCodeCoverage", "YES", "-dry-run"]).as_slice()
    );
}

#[test]
fn test_variant_without_extra_args_inherits_command_args() {
    let config = loaded(EXTRA);
    let resolved = resolve("build", Some("plain"), &config, None, &[]).unwrap();
    assert_eq!(
        resolved.invocation(),
        argv(&["xcodebuild", "build", "-quiet", "-jobs", "8"]).as_slice()
    );
}

#[test]
fn test_empty_variant_extra_args_clear_command_args() {
    let config = loaded(EXTRA);
    let resolved = resolve("build", Some("none"), &config, None, &[]).unwrap();
    assert_eq!(resolved.invocation(), argv(&["xcodebuild", "build"]).as_slice());
}

#[test]
fn test_passthrough_after_extra_args() {
    let config = loaded(EXTRA);
    let resolved = resolve("build", None, &config, None, &argv(&["CODE_SIGNING_ALLOWED=NO"])).unwrap();
    let args = resolved.invocation();
    assert_eq!(args.last().map(String::as_str), Some("CODE_SIGNING_ALLOWED=NO"));
    assert_eq!(args[args.len() - 2], "8");
}

#[test]
fn test_script_extra_args_then_passthrough() {
    let config = loaded(EXTRA);

    let resolved = resolve("fmt", None, &config, None, &argv(&["Sources"])).unwrap();
    assert_eq!(resolved.script(), Some("swiftformat . --lint Sources"));

    let resolved = resolve("fmt", Some("fix"), &config, None, &[]).unwrap();
    assert_eq!(resolved.script(), Some("swiftformat . --swiftversion 6"));
}

// =============================================================================
// Category 7: Project vs workspace vs package
// =============================================================================

#[test]
fn test_workspace_flag() {
    let config = loaded("workspace: App.xcworkspace\ncommands:\n  build: {}\n");
    let resolved = resolve("build", None, &config, None, &[]).unwrap();
    assert_eq!(
        resolved.invocation(),
        argv(&["xcodebuild", "build", "-workspace", "App.xcworkspace"]).as_slice()
    );
}

#[test]
fn test_package_has_no_container_flag() {
    let config = loaded("commands:\n  build:\n    scheme: MyPackage\n");
    let resolved = resolve("build", None, &config, None, &[]).unwrap();
    assert!(!resolved.invocation().iter().any(|a| a == "-project" || a == "-workspace"));
}

#[test]
fn test_resolution_is_repeatable() {
    let config = loaded(APP);
    let first = resolve("test", None, &config, Some("mac"), &argv(&["-quiet"])).unwrap();
    let second = resolve("test", None, &config, Some("mac"), &argv(&["-quiet"])).unwrap();
    assert_eq!(first, second);
}
