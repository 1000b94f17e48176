//! Action kind tags and their external labels
//!
//! Kinds are closed enums; the label each one exposes to the host is fixed in
//! a constant table rather than derived from a runtime rendering.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Prefix used by the legacy label encoding (`@@conference.joined`)
const LEGACY_SIGIL: &str = "@@";

/// Kind of an action flowing through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActionKind {
    ConferenceWillJoin,
    ConferenceJoined,
    ConferenceWillLeave,
    ConferenceLeft,
    ConferenceFailed,
    ConfigLoadFailed,
    SurfaceMounted,
    SurfaceUnmounted,
}

const ACTION_LABELS: &[(ActionKind, &str)] = &[
    (ActionKind::ConferenceWillJoin, "conference.will_join"),
    (ActionKind::ConferenceJoined, "conference.joined"),
    (ActionKind::ConferenceWillLeave, "conference.will_leave"),
    (ActionKind::ConferenceLeft, "conference.left"),
    (ActionKind::ConferenceFailed, "conference.failed"),
    (ActionKind::ConfigLoadFailed, "config.load.failed"),
    (ActionKind::SurfaceMounted, "surface.mounted"),
    (ActionKind::SurfaceUnmounted, "surface.unmounted"),
];

static ACTION_BY_LABEL: Lazy<HashMap<&'static str, ActionKind>> =
    Lazy::new(|| ACTION_LABELS.iter().map(|(kind, label)| (*label, *kind)).collect());

impl ActionKind {
    pub fn all() -> impl Iterator<Item = ActionKind> {
        ACTION_LABELS.iter().map(|(kind, _)| *kind)
    }

    /// External label of this kind
    pub fn label(self) -> &'static str {
        ACTION_LABELS
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, label)| *label)
            .unwrap_or_default()
    }

    /// Look up a kind by label, accepting the legacy `@@` encoding
    pub fn from_label(label: &str) -> Option<Self> {
        ACTION_BY_LABEL.get(symbol_name(label)).copied()
    }

    /// Whether the bridge forwards this kind to the host
    pub fn is_bridged(self) -> bool {
        !matches!(self, ActionKind::SurfaceMounted | ActionKind::SurfaceUnmounted)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Specific variant of a configuration load failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConfigFailureKind {
    LoadError,
    FetchError,
    NotFound,
}

const CONFIG_FAILURE_LABELS: &[(ConfigFailureKind, &str)] = &[
    (ConfigFailureKind::LoadError, "config.load.error"),
    (ConfigFailureKind::FetchError, "config.fetch.error"),
    (ConfigFailureKind::NotFound, "config.not_found"),
];

impl ConfigFailureKind {
    pub fn all() -> impl Iterator<Item = ConfigFailureKind> {
        CONFIG_FAILURE_LABELS.iter().map(|(kind, _)| *kind)
    }

    pub fn label(self) -> &'static str {
        CONFIG_FAILURE_LABELS
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, label)| *label)
            .unwrap_or_default()
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let name = symbol_name(label);
        CONFIG_FAILURE_LABELS
            .iter()
            .find(|(_, l)| *l == name)
            .map(|(kind, _)| *kind)
    }
}

impl fmt::Display for ConfigFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Plain name of a tag description: strips exactly one legacy `@@` prefix.
pub fn symbol_name(description: &str) -> &str {
    description.strip_prefix(LEGACY_SIGIL).unwrap_or(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_name_strips_sigil() {
        assert_eq!(symbol_name("@@conference.joined"), "conference.joined");
    }

    #[test]
    fn test_symbol_name_without_sigil_unchanged() {
        assert_eq!(symbol_name("config.load.error"), "config.load.error");
    }

    #[test]
    fn test_symbol_name_strips_only_once() {
        assert_eq!(symbol_name("@@@@x"), "@@x");
        assert_eq!(symbol_name("@x"), "@x");
    }

    #[test]
    fn test_labels_are_unique() {
        let labels: std::collections::HashSet<_> = ActionKind::all().map(ActionKind::label).collect();
        assert_eq!(labels.len(), ACTION_LABELS.len());
    }

    #[test]
    fn test_label_lookup_is_deterministic() {
        for kind in ActionKind::all() {
            assert_eq!(ActionKind::from_label(kind.label()), Some(kind));
            assert_eq!(ActionKind::from_label(&format!("@@{}", kind.label())), Some(kind));
            assert_eq!(kind.label(), kind.label());
        }
    }

    #[test]
    fn test_config_failure_labels() {
        assert_eq!(ConfigFailureKind::FetchError.label(), "config.fetch.error");
        assert_eq!(
            ConfigFailureKind::from_label("@@config.not_found"),
            Some(ConfigFailureKind::NotFound)
        );
        assert_eq!(ConfigFailureKind::from_label("config.other"), None);
    }

    #[test]
    fn test_surface_kinds_not_bridged() {
        assert!(ActionKind::ConferenceJoined.is_bridged());
        assert!(!ActionKind::SurfaceMounted.is_bridged());
    }
}
