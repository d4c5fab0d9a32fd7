#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `compile` command.
//!
//! These tests load profile documents from a temporary repository, compile
//! them, and check the rendered document in every output format.

mod common;

use common::{IntegrationTestContext, TestContextBuilder};
use homestage_cli::cli::{CompileOpts, GlobalOpts};
use homestage_cli::commands::compile;
use homestage_cli::config::Config;
use homestage_cli::error::{ConfigError, OutputError};
use homestage_cli::logging::Logger;
use homestage_cli::tasks::graph::{has_cycle, unresolved_deps};
use homestage_cli::tasks::output::{OutputFormat, render_as};

const SINGLE_PACKAGE: &str = r#"
variables:
  EDITOR: vim
profiles:
  common:
    packages:
      - [vim, {commands: ["echo hi"], links: [.vimrc], templates: [vimrc.local]}]
"#;

// ---------------------------------------------------------------------------
// Rendered document
// ---------------------------------------------------------------------------

#[test]
fn json_document_snapshot() {
    let ctx = TestContextBuilder::new().with_profiles(SINGLE_PACKAGE).build();
    let rendered = compile::render(&ctx.setup(), OutputFormat::Json).unwrap();

    insta::assert_snapshot!(rendered, @r#"
    {
      "tasks": {
        "default": {
          "deps": [
            "common"
          ]
        },
        "config_variables": {
          "envs": [
            [
              "EDITOR",
              "vim"
            ]
          ]
        },
        "common": {
          "deps": [
            "common_vim"
          ]
        },
        "common_vim": {
          "deps": [
            "common_vim_install",
            "common_vim_config"
          ]
        },
        "common_vim_install": {
          "cmds": [
            [
              "@install",
              "vim"
            ]
          ]
        },
        "common_vim_config": {
          "deps": [
            "config_variables"
          ],
          "cmds": [
            [
              "sh",
              "-c",
              "echo hi"
            ]
          ],
          "links": [
            [
              ".vimrc",
              "profiles/common/vim/.vimrc"
            ]
          ],
          "templates": [
            [
              "vimrc.local",
              "profiles/common/vim/vimrc.local"
            ]
          ]
        }
      },
      "macros": {
        "install": {
          "prefix": [
            "sudo",
            "apt",
            "install",
            "-yqq"
          ]
        }
      }
    }
    "#);
}

#[test]
fn yaml_document_preserves_task_order() {
    let ctx = IntegrationTestContext::new();
    let rendered = compile::render(&ctx.setup(), OutputFormat::Yaml).unwrap();

    let document: serde_yaml::Value = serde_yaml::from_str(&rendered).unwrap();
    let names: Vec<&str> = document["tasks"]
        .as_mapping()
        .unwrap()
        .keys()
        .map(|k| k.as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        [
            "default",
            "config_variables",
            "common",
            "common_git",
            "common_git_install",
            "common_git_config",
            "base",
            "base_vim",
            "base_vim_install",
            "base_vim_config",
            "desktop",
            "desktop_i3",
            "desktop_i3_install",
            "desktop_i3_config",
        ]
    );
    assert_eq!(document["tasks"]["desktop"]["deps"][0], "base");
}

#[test]
fn install_prefix_comes_from_settings() {
    let ctx = TestContextBuilder::new()
        .with_settings("install_prefix = [\"brew\", \"install\"]\n")
        .build();
    let rendered = compile::render(&ctx.setup(), OutputFormat::Json).unwrap();
    let document: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(
        document["macros"]["install"]["prefix"],
        serde_json::json!(["brew", "install"])
    );
}

#[test]
fn compilation_is_deterministic() {
    let ctx = IntegrationTestContext::new();
    let first = compile::render(&ctx.setup(), OutputFormat::Yaml).unwrap();
    let second = compile::render(&ctx.setup(), OutputFormat::Yaml).unwrap();
    assert_eq!(first, second);
}

#[test]
fn compiled_graph_is_acyclic_and_closed_with_bootstrap() {
    let tasks = IntegrationTestContext::new().load_config().compile();
    assert!(!has_cycle(&tasks));
    assert!(unresolved_deps(&tasks).is_empty());
}

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

#[test]
fn toml_is_not_implemented() {
    let ctx = IntegrationTestContext::new();
    let err = compile::render(&ctx.setup(), OutputFormat::Toml).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OutputError>(),
        Some(OutputError::NotImplemented(f)) if f == "toml"
    ));
}

#[test]
fn unknown_format_is_unsupported() {
    let config = IntegrationTestContext::new().load_config();
    let document = config.to_document(&[]);
    assert!(matches!(
        render_as(&document, "xml"),
        Err(OutputError::UnsupportedFormat(f)) if f == "xml"
    ));
}

#[test]
fn output_flag_writes_file() {
    let ctx = IntegrationTestContext::new();
    let out = ctx.path("out.json");
    let global = GlobalOpts {
        root: Some(ctx.root_path().to_path_buf()),
        ..GlobalOpts::default()
    };
    let opts = CompileOpts {
        format: OutputFormat::Json,
        output: Some(out.clone()),
    };

    compile::run(&global, &opts, &Logger::new("test")).unwrap();

    let document: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert!(document["tasks"]["desktop_i3_config"]["templates"].is_array());
}

#[test]
fn output_flag_with_dry_run_writes_nothing() {
    let ctx = IntegrationTestContext::new();
    let out = ctx.path("out.yml");
    let global = GlobalOpts {
        root: Some(ctx.root_path().to_path_buf()),
        dry_run: true,
        ..GlobalOpts::default()
    };
    let opts = CompileOpts {
        format: OutputFormat::Yaml,
        output: Some(out.clone()),
    };

    compile::run(&global, &opts, &Logger::new("test")).unwrap();
    assert!(!out.exists());
}

// ---------------------------------------------------------------------------
// Hard errors
// ---------------------------------------------------------------------------

#[test]
fn cyclic_profiles_fail_to_load() {
    let ctx = TestContextBuilder::new()
        .with_profiles("profiles:\n  a:\n    dependencies: [b]\n  b:\n    dependencies: [a]\n")
        .build();
    let err = Config::load(&ctx.path("profiles.yml")).unwrap_err();
    assert!(
        matches!(&err, ConfigError::CyclicDependency(cycle) if cycle == "a -> b -> a"),
        "unexpected error: {err}"
    );
}

#[test]
fn malformed_package_names_its_path() {
    let ctx = TestContextBuilder::new()
        .with_profiles("profiles:\n  base:\n    packages:\n      - git\n      - 42\n")
        .build();
    let err = Config::load(&ctx.path("profiles.yml")).unwrap_err();
    assert!(
        matches!(&err, ConfigError::MalformedEntity { path, .. } if path == "profiles.base.packages[1]"),
        "unexpected error: {err}"
    );
}

#[test]
fn invalid_yaml_is_a_syntax_error() {
    let ctx = TestContextBuilder::new()
        .with_profiles("profiles:\n  base: [unclosed\n")
        .build();
    assert!(matches!(
        Config::load(&ctx.path("profiles.yml")),
        Err(ConfigError::Syntax { .. })
    ));
}

#[test]
fn package_task_shadowing_a_profile_fails_to_load() {
    let ctx = TestContextBuilder::new()
        .with_profiles("profiles:\n  dev_tools:\n    packages: [git]\n  dev:\n    packages: [tools]\n")
        .build();
    let err = Config::load(&ctx.path("profiles.yml")).unwrap_err();
    assert!(
        matches!(&err, ConfigError::TaskNameCollision { profile, task }
            if profile == "dev" && task == "dev_tools"),
        "unexpected error: {err}"
    );
}
