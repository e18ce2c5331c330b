//! Typed permission guards.
//!
//! Each guard is an extractor that resolves the [`RequestContext`] (401 when
//! there is no valid session) and then authorizes one (resource, action) pair
//! (403 when the role lacks it). Both happen before the handler body runs.
//!
//! [`RequestContext`]: crate::middleware::context::RequestContext

use helmsman_core::permissions::{actions, resources};

/// Declares a guard extractor for a (resource, action) pair.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $resource:expr, $action:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::context::RequestContext);

        impl $name {
            pub const RESOURCE: &'static str = $resource;
            pub const ACTION: &'static str = $action;
        }

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = $crate::helmsman_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let ctx = <$crate::middleware::context::RequestContext as axum::extract::FromRequestParts<
                    $crate::state::AppState,
                >>::from_request_parts(parts, state)
                .await?;

                ctx.authorize($resource, $action).await?;

                Ok($name(ctx))
            }
        }
    };
}

// Agents
require_permission!(RequireAgentView, resources::AGENT, actions::VIEW);
require_permission!(RequireAgentCreate, resources::AGENT, actions::CREATE);
require_permission!(RequireAgentEdit, resources::AGENT, actions::EDIT);
require_permission!(RequireAgentDelete, resources::AGENT, actions::DELETE);

// Formateurs
require_permission!(RequireFormateurView, resources::FORMATEUR, actions::VIEW);
require_permission!(RequireFormateurCreate, resources::FORMATEUR, actions::CREATE);
require_permission!(RequireFormateurEdit, resources::FORMATEUR, actions::EDIT);
require_permission!(RequireFormateurDelete, resources::FORMATEUR, actions::DELETE);

// Cours
require_permission!(RequireCoursView, resources::COURS, actions::VIEW);
require_permission!(RequireCoursCreate, resources::COURS, actions::CREATE);
require_permission!(RequireCoursEdit, resources::COURS, actions::EDIT);
require_permission!(RequireCoursDelete, resources::COURS, actions::DELETE);

// Formations
require_permission!(RequireFormationView, resources::FORMATION, actions::VIEW);
require_permission!(RequireFormationCreate, resources::FORMATION, actions::CREATE);
require_permission!(RequireFormationEdit, resources::FORMATION, actions::EDIT);
require_permission!(RequireFormationDelete, resources::FORMATION, actions::DELETE);

// Sessions and enrollments
require_permission!(RequireSessionView, resources::SESSION, actions::VIEW);
require_permission!(RequireSessionCreate, resources::SESSION, actions::CREATE);
require_permission!(RequireSessionEdit, resources::SESSION, actions::EDIT);
require_permission!(RequireSessionDelete, resources::SESSION, actions::DELETE);

// Dashboard
require_permission!(RequireDashboardView, resources::DASHBOARD, actions::VIEW);

// Users
require_permission!(RequireUserView, resources::USER, actions::VIEW);
require_permission!(RequireUserCreate, resources::USER, actions::CREATE);
require_permission!(RequireUserEdit, resources::USER, actions::EDIT);
require_permission!(RequireUserDelete, resources::USER, actions::DELETE);

// Roles and the permission matrix
require_permission!(RequireRoleView, resources::ROLE, actions::VIEW);
require_permission!(RequireRoleCreate, resources::ROLE, actions::CREATE);
require_permission!(RequireRoleEdit, resources::ROLE, actions::EDIT);
require_permission!(RequireRoleDelete, resources::ROLE, actions::DELETE);

// Resources
require_permission!(RequireResourceView, resources::RESOURCE, actions::VIEW);
require_permission!(RequireResourceCreate, resources::RESOURCE, actions::CREATE);
require_permission!(RequireResourceEdit, resources::RESOURCE, actions::EDIT);
require_permission!(RequireResourceDelete, resources::RESOURCE, actions::DELETE);

// UI components
require_permission!(RequireUiComponentView, resources::UI_COMPONENT, actions::VIEW);
require_permission!(RequireUiComponentCreate, resources::UI_COMPONENT, actions::CREATE);
require_permission!(RequireUiComponentEdit, resources::UI_COMPONENT, actions::EDIT);
require_permission!(RequireUiComponentDelete, resources::UI_COMPONENT, actions::DELETE);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guards_carry_their_pair() {
        assert_eq!(RequireAgentCreate::RESOURCE, "agent");
        assert_eq!(RequireAgentCreate::ACTION, "create");
        assert_eq!(RequireSessionEdit::RESOURCE, "session");
        assert_eq!(RequireSessionEdit::ACTION, "edit");
        assert_eq!(RequireUiComponentEdit::RESOURCE, "ui_component");
        assert_eq!(RequireDashboardView::ACTION, "view");
    }
}
