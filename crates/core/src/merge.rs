//! Precedence-sensitive merging of user and plugin configuration
//!
//! The user-authored configuration always wins. A plugin value only lands in
//! the result when the user left the key unset, meaning absent, `null` or the
//! empty string. Falsy but defined values such as `false` or `0` are kept.

use indexmap::IndexMap;
use serde_json::Value;

use crate::configs::{Configuration, Target};

/// Values that can be "unset" and therefore filled in by a lower-precedence source
pub trait Unset {
    fn is_unset(&self) -> bool;
}

impl Unset for Value {
    fn is_unset(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl Unset for Option<Target> {
    fn is_unset(&self) -> bool {
        self.is_none()
    }
}

/// Merge `addon` into `base` with first-non-empty-wins precedence.
///
/// Keys of both maps are trimmed first, so `" name "` and `"name"` are the same entry.
/// Base entries keep their position; keys only the addon has are appended in addon order.
pub fn merge_maps<V>(
    base: &IndexMap<String, V>,
    addon: &IndexMap<String, V>,
) -> IndexMap<String, V>
where
    V: Unset + Clone,
{
    let mut merged: IndexMap<String, V> = base
        .iter()
        .map(|(key, value)| (key.trim().to_string(), value.clone()))
        .collect();

    for (key, value) in addon {
        let key = key.trim();
        let is_base_unset = merged.get(key).map(Unset::is_unset).unwrap_or(true);
        if is_base_unset {
            merged.insert(key.to_string(), value.clone());
        }
    }

    merged
}

/// Combine the user configuration (`base`) with a plugin-computed one (`addon`).
///
/// Only `config` and `generates` are merged. `tasks` is returned exactly as the
/// user wrote it: raw keys may still carry `name > deps` shorthand, so task
/// precedence is resolved after parsing by [`crate::tasks::TaskSet::merge_missing`].
pub fn merge_configurations(base: &Configuration, addon: &Configuration) -> Configuration {
    Configuration {
        spec: base.spec.clone(),
        config: merge_maps(&base.config, &addon.config),
        plugins: base.plugins.clone(),
        generates: merge_maps(&base.generates, &addon.generates),
        tasks: base.tasks.clone(),
    }
}
