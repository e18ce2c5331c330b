//! Authorization matrices.
//!
//! Two independent matrices drive access decisions:
//!
//! - [`PermissionMatrix`]: role → resource → allowed actions. Gates the API.
//! - [`UiPermissionMatrix`]: role → UI component → enabled. Tells the front end
//!   which controls to render.
//!
//! They are deliberately separate: a button may be visible to a role that no
//! endpoint will serve, and the reverse.
//!
//! Both evaluators fail closed. A missing role, a missing matrix, a missing
//! entry or an unlisted action all mean "deny"; nothing here returns an error.
//!
//! # Example
//!
//! ```
//! use helmsman_core::permissions::{PermissionMatrix, actions, resources};
//!
//! let matrix = PermissionMatrix::from_rows(vec![(
//!     "coordinateur".to_string(),
//!     resources::FORMATION.to_string(),
//!     vec![actions::EDIT.to_string(), actions::VIEW.to_string()],
//! )]);
//!
//! assert!(matrix.can(Some("coordinateur"), resources::FORMATION, actions::EDIT));
//! assert!(!matrix.can(Some("coordinateur"), resources::FORMATION, actions::DELETE));
//! assert!(!matrix.can(Some("coordinateur"), resources::AGENT, actions::EDIT));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Built-in resource names. Resources are rows in the `resources` table; these
/// are the ones the API handlers are guarded with.
pub mod resources {
    pub const AGENT: &str = "agent";
    pub const FORMATEUR: &str = "formateur";
    pub const COURS: &str = "cours";
    pub const FORMATION: &str = "formation";
    pub const SESSION: &str = "session";
    pub const DASHBOARD: &str = "dashboard";
    pub const USER: &str = "user";
    pub const ROLE: &str = "role";
    pub const RESOURCE: &str = "resource";
    pub const UI_COMPONENT: &str = "ui_component";
}

/// Standard action vocabulary.
pub mod actions {
    pub const VIEW: &str = "view";
    pub const CREATE: &str = "create";
    pub const EDIT: &str = "edit";
    pub const DELETE: &str = "delete";
}

/// Built-in role names.
pub mod roles {
    /// Full administrative access; cannot be deleted.
    pub const ADMIN: &str = "admin";
    /// Users of a deleted role fall back to this one; cannot be deleted.
    pub const DEFAULT: &str = "user";
}

/// Resource → actions granted to one role.
pub type RoleGrants = BTreeMap<String, Vec<String>>;

/// Role → resource → allowed actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PermissionMatrix(BTreeMap<String, BTreeMap<String, Vec<String>>>);

impl PermissionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds `(role, resource, actions)` rows into a matrix.
    ///
    /// Rows are applied in iteration order; a later row for the same
    /// (role, resource) pair replaces the earlier one.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String, Vec<String>)>,
    {
        let mut matrix = Self::new();
        for (role, resource, actions) in rows {
            matrix.insert(role, resource, actions);
        }
        matrix
    }

    /// Sets the actions for (role, resource), replacing any previous entry.
    pub fn insert(&mut self, role: String, resource: String, actions: Vec<String>) {
        self.0.entry(role).or_default().insert(resource, actions);
    }

    /// May `role` perform `action` on `resource`?
    pub fn can(&self, role: Option<&str>, resource: &str, action: &str) -> bool {
        let Some(role) = role else {
            return false;
        };

        self.0
            .get(role)
            .and_then(|grants| grants.get(resource))
            .is_some_and(|allowed| allowed.iter().any(|a| a == action))
    }

    /// The grants of a single role, if it has any.
    pub fn for_role(&self, role: &str) -> Option<&RoleGrants> {
        self.0.get(role)
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Evaluates against a matrix that may not have been loaded.
pub fn can(
    matrix: Option<&PermissionMatrix>,
    role: Option<&str>,
    resource: &str,
    action: &str,
) -> bool {
    matrix.is_some_and(|m| m.can(role, resource, action))
}

/// Role → UI component → enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UiPermissionMatrix(BTreeMap<String, BTreeMap<String, bool>>);

impl UiPermissionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds `(role, component, enabled)` rows; later rows win.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String, bool)>,
    {
        let mut matrix = Self::new();
        for (role, component, enabled) in rows {
            matrix.insert(role, component, enabled);
        }
        matrix
    }

    pub fn insert(&mut self, role: String, component: String, enabled: bool) {
        self.0.entry(role).or_default().insert(component, enabled);
    }

    pub fn is_enabled(&self, role: Option<&str>, component: &str) -> bool {
        let Some(role) = role else {
            return false;
        };

        self.0
            .get(role)
            .and_then(|components| components.get(component))
            .copied()
            .unwrap_or(false)
    }

    /// Components explicitly enabled for `role`, sorted by name.
    pub fn enabled_for_role(&self, role: &str) -> Vec<String> {
        self.0
            .get(role)
            .map(|components| {
                components
                    .iter()
                    .filter(|(_, enabled)| **enabled)
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn for_role(&self, role: &str) -> Option<&BTreeMap<String, bool>> {
        self.0.get(role)
    }
}

pub fn is_component_enabled(
    matrix: Option<&UiPermissionMatrix>,
    role: Option<&str>,
    component: &str,
) -> bool {
    matrix.is_some_and(|m| m.is_enabled(role, component))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(role: &str, resource: &str, actions: &[&str]) -> (String, String, Vec<String>) {
        (
            role.to_string(),
            resource.to_string(),
            actions.iter().map(|a| a.to_string()).collect(),
        )
    }

    fn coordinateur_matrix() -> PermissionMatrix {
        PermissionMatrix::from_rows(vec![row(
            "coordinateur",
            resources::FORMATION,
            &[actions::EDIT, actions::VIEW],
        )])
    }

    #[test]
    fn test_listed_action_is_allowed() {
        let matrix = coordinateur_matrix();
        assert!(matrix.can(Some("coordinateur"), "formation", "edit"));
        assert!(matrix.can(Some("coordinateur"), "formation", "view"));
    }

    #[test]
    fn test_unlisted_action_is_denied() {
        let matrix = coordinateur_matrix();
        assert!(!matrix.can(Some("coordinateur"), "formation", "delete"));
    }

    #[test]
    fn test_absent_resource_is_denied() {
        let matrix = coordinateur_matrix();
        assert!(!matrix.can(Some("coordinateur"), "agent", "edit"));
    }

    #[test]
    fn test_absent_role_is_denied() {
        let matrix = coordinateur_matrix();
        assert!(!matrix.can(None, "formation", "view"));
        assert!(!matrix.can(Some("formateur"), "formation", "view"));
    }

    #[test]
    fn test_absent_matrix_is_denied() {
        assert!(!can(None, Some("coordinateur"), "formation", "view"));

        let matrix = coordinateur_matrix();
        assert!(can(Some(&matrix), Some("coordinateur"), "formation", "view"));
    }

    #[test]
    fn test_empty_action_list_denies_everything() {
        let matrix = PermissionMatrix::from_rows(vec![row("auditeur", "agent", &[])]);
        for action in [actions::VIEW, actions::CREATE, actions::EDIT, actions::DELETE] {
            assert!(!matrix.can(Some("auditeur"), "agent", action));
        }
    }

    #[test]
    fn test_action_match_is_exact() {
        let matrix = PermissionMatrix::from_rows(vec![row("r", "agent", &["view"])]);
        assert!(!matrix.can(Some("r"), "agent", "View"));
        assert!(!matrix.can(Some("r"), "agent", "vie"));
        assert!(!matrix.can(Some("r"), "Agent", "view"));
    }

    #[test]
    fn test_later_rows_overwrite_earlier_ones() {
        let matrix = PermissionMatrix::from_rows(vec![
            row("coordinateur", "agent", &["view", "edit", "delete"]),
            row("coordinateur", "formation", &["view"]),
            row("coordinateur", "agent", &["view"]),
        ]);

        assert!(matrix.can(Some("coordinateur"), "agent", "view"));
        assert!(!matrix.can(Some("coordinateur"), "agent", "edit"));
        assert!(!matrix.can(Some("coordinateur"), "agent", "delete"));
        assert!(matrix.can(Some("coordinateur"), "formation", "view"));
        assert_eq!(matrix.for_role("coordinateur").unwrap().len(), 2);
    }

    #[test]
    fn test_roles_are_isolated() {
        let matrix = PermissionMatrix::from_rows(vec![
            row("admin", "agent", &["view", "create", "edit", "delete"]),
            row("user", "agent", &["view"]),
        ]);

        assert!(matrix.can(Some("admin"), "agent", "delete"));
        assert!(!matrix.can(Some("user"), "agent", "delete"));
        assert_eq!(matrix.roles().collect::<Vec<_>>(), vec!["admin", "user"]);
    }

    #[test]
    fn test_matrix_serializes_as_nested_map() {
        let matrix = coordinateur_matrix();
        let json = serde_json::to_value(&matrix).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"coordinateur": {"formation": ["edit", "view"]}})
        );
    }

    #[test]
    fn test_ui_component_enabled_flag() {
        let matrix = UiPermissionMatrix::from_rows(vec![
            ("user".to_string(), "agents.export_button".to_string(), true),
            ("user".to_string(), "agents.delete_button".to_string(), false),
        ]);

        assert!(matrix.is_enabled(Some("user"), "agents.export_button"));
        assert!(!matrix.is_enabled(Some("user"), "agents.delete_button"));
    }

    #[test]
    fn test_ui_component_fails_closed() {
        let matrix = UiPermissionMatrix::from_rows(vec![(
            "user".to_string(),
            "agents.export_button".to_string(),
            true,
        )]);

        assert!(!matrix.is_enabled(None, "agents.export_button"));
        assert!(!matrix.is_enabled(Some("admin"), "agents.export_button"));
        assert!(!matrix.is_enabled(Some("user"), "sessions.calendar"));
        assert!(!is_component_enabled(None, Some("user"), "agents.export_button"));
    }

    #[test]
    fn test_ui_enabled_for_role_lists_only_enabled() {
        let matrix = UiPermissionMatrix::from_rows(vec![
            ("user".to_string(), "b".to_string(), true),
            ("user".to_string(), "a".to_string(), true),
            ("user".to_string(), "c".to_string(), false),
            ("user".to_string(), "a".to_string(), false),
        ]);

        assert_eq!(matrix.enabled_for_role("user"), vec!["b".to_string()]);
        assert!(matrix.enabled_for_role("nobody").is_empty());
    }

    #[test]
    fn test_ui_matrix_independent_of_permission_matrix() {
        let permissions = PermissionMatrix::from_rows(vec![row("user", "agent", &["view"])]);
        let ui = UiPermissionMatrix::from_rows(vec![(
            "user".to_string(),
            "agents.delete_button".to_string(),
            true,
        )]);

        assert!(ui.is_enabled(Some("user"), "agents.delete_button"));
        assert!(!permissions.can(Some("user"), "agent", "delete"));
    }
}
