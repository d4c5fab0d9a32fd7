//! Task graph compiler: projects profiles and packages onto a flat task mapping.
//!
//! Naming scheme, for profile `p` and package `k`:
//!
//! ```text
//! default            -> common
//! config_variables   (envs)
//! p                  -> <p's dependencies>, p_k, ...
//! p_k                -> p_k_install, p_k_config
//! p_k_install        @install k
//! p_k_config         sh -c <command>..., links, templates [-> config_variables]
//! ```
pub mod graph;
pub mod output;

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::{Config, Package, Profile};

/// Entry task of the compiled document.
pub const DEFAULT_TASK: &str = "default";

/// Bootstrap task `default` depends on, provided by a `common` profile.
pub const BOOTSTRAP_TASK: &str = "common";

/// Task exporting the config's variables.
pub const CONFIG_VARIABLES_TASK: &str = "config_variables";

/// Macro invocation installing one package.
pub const INSTALL_MACRO: &str = "@install";

/// Ordered mapping from task name to definition.
pub type TaskMap = IndexMap<String, TaskDef>;

/// One node of the compiled execution graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskDef {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cmds: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub envs: Vec<[String; 2]>,
    /// `[destination, source]` pairs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<[String; 2]>,
    /// `[destination, source]` pairs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<[String; 2]>,
}

impl TaskDef {
    fn depending_on<I, S>(deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            deps: deps.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// `{profile}_{package}`
#[must_use]
pub fn package_task_name(profile: &str, package: &str) -> String {
    format!("{profile}_{package}")
}

/// `{profile}_{package}_install`
#[must_use]
pub fn install_task_name(profile: &str, package: &str) -> String {
    format!("{profile}_{package}_install")
}

/// `{profile}_{package}_config`
#[must_use]
pub fn config_task_name(profile: &str, package: &str) -> String {
    format!("{profile}_{package}_config")
}

/// Symbolic source of a link or template: `profiles/{profile}/{package}/{path}`.
#[must_use]
pub fn source_path(profile: &str, package: &str, path: &str) -> String {
    format!("profiles/{profile}/{package}/{path}")
}

/// Compile a validated config into the flat task mapping.
///
/// Deterministic: the same config always yields the same mapping, in the
/// same order. Profile tasks never collide with other tasks, as the config
/// rejects such names; a package task name that is already present is not
/// emitted again.
#[must_use]
pub fn compile(config: &Config) -> TaskMap {
    let mut tasks = TaskMap::new();
    tasks.insert(
        DEFAULT_TASK.to_string(),
        TaskDef::depending_on([BOOTSTRAP_TASK]),
    );
    tasks.insert(
        CONFIG_VARIABLES_TASK.to_string(),
        TaskDef {
            envs: config
                .variables()
                .iter()
                .map(|v| [v.name.clone(), v.value.clone()])
                .collect(),
            ..TaskDef::default()
        },
    );

    for profile in config.profiles() {
        tasks.insert(profile.name.clone(), profile_task(profile));

        for package in &profile.packages {
            let name = package_task_name(&profile.name, &package.name);
            if tasks.contains_key(&name) {
                tracing::warn!("task '{name}' already compiled, not emitting it again");
                continue;
            }
            for (name, task) in package_tasks(profile, package) {
                insert_new(&mut tasks, name, task);
            }
        }
    }

    tracing::debug!("compiled {} tasks", tasks.len());
    tasks
}

fn insert_new(tasks: &mut TaskMap, name: String, task: TaskDef) {
    if tasks.contains_key(&name) {
        tracing::warn!("task '{name}' already compiled, not emitting it again");
        return;
    }
    tasks.insert(name, task);
}

/// The profile task only sequences its dependency profiles and its packages.
fn profile_task(profile: &Profile) -> TaskDef {
    let dependencies = profile.dependencies.iter().map(|d| d.name.clone());
    let packages = profile
        .packages
        .iter()
        .map(|p| package_task_name(&profile.name, &p.name));
    TaskDef::depending_on(dependencies.chain(packages))
}

fn package_tasks(profile: &Profile, package: &Package) -> [(String, TaskDef); 3] {
    let (p, k) = (profile.name.as_str(), package.name.as_str());

    let install = TaskDef {
        cmds: vec![vec![INSTALL_MACRO.to_string(), package.name.clone()]],
        ..TaskDef::default()
    };

    let config = TaskDef {
        deps: if package.templates.is_empty() {
            Vec::new()
        } else {
            vec![CONFIG_VARIABLES_TASK.to_string()]
        },
        cmds: package
            .commands
            .iter()
            .map(|c| vec!["sh".to_string(), "-c".to_string(), c.line.clone()])
            .collect(),
        envs: Vec::new(),
        links: package
            .links
            .iter()
            .map(|l| [l.path.clone(), source_path(p, k, &l.path)])
            .collect(),
        templates: package
            .templates
            .iter()
            .map(|t| [t.path.clone(), source_path(p, k, &t.path)])
            .collect(),
    };

    [
        (
            package_task_name(p, k),
            TaskDef::depending_on([install_task_name(p, k), config_task_name(p, k)]),
        ),
        (install_task_name(p, k), install),
        (config_task_name(p, k), config),
    ]
}
