//! Checks over a compiled task mapping.

use std::collections::HashMap;

use super::TaskMap;

/// Dependencies naming no task in `tasks`, as `(task, missing dependency)`
/// pairs in mapping order.
#[must_use]
pub fn unresolved_deps(tasks: &TaskMap) -> Vec<(&str, &str)> {
    tasks
        .iter()
        .flat_map(|(name, task)| {
            task.deps
                .iter()
                .filter(|dep| !tasks.contains_key(dep.as_str()))
                .map(move |dep| (name.as_str(), dep.as_str()))
        })
        .collect()
}

/// Detect cycles in the task dependency graph using Kahn's algorithm.
///
/// Dependencies on tasks outside the mapping are ignored. Returns `true` if
/// the graph contains at least one cycle.
#[must_use]
pub fn has_cycle(tasks: &TaskMap) -> bool {
    let name_to_idx: HashMap<&str, usize> = tasks
        .keys()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut in_degree: Vec<usize> = tasks
        .values()
        .map(|t| {
            t.deps
                .iter()
                .filter(|d| name_to_idx.contains_key(d.as_str()))
                .count()
        })
        .collect();

    let mut reverse_deps: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
    for (i, t) in tasks.values().enumerate() {
        for dep in &t.deps {
            if let Some(&dep_idx) = name_to_idx.get(dep.as_str())
                && let Some(rd) = reverse_deps.get_mut(dep_idx)
            {
                rd.push(i);
            }
        }
    }

    let mut queue: Vec<usize> = in_degree
        .iter()
        .enumerate()
        .filter_map(|(i, &d)| (d == 0).then_some(i))
        .collect();
    let mut processed = 0usize;

    while let Some(idx) = queue.pop() {
        processed += 1;
        if let Some(dependents) = reverse_deps.get(idx) {
            for &dep in dependents {
                if let Some(count) = in_degree.get_mut(dep) {
                    *count -= 1;
                    if *count == 0 {
                        queue.push(dep);
                    }
                }
            }
        }
    }

    processed != tasks.len()
}
