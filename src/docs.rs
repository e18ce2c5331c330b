use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use helmsman_core::pagination::{PaginationMeta, PaginationParams};
use helmsman_core::{PermissionMatrix, UiPermissionMatrix};
use helmsman_models::{
    Agent, AgentEnrollment, AgentFormation, AssignFormateurDto, BanUserDto, Cours,
    CoursFormateur, CreateAgentDto, CreateCoursDto, CreateFormateurDto, CreateFormationDto,
    CreateResourceDto, CreateRoleDto, CreateSessionDto, CreateUiComponentDto, CreateUserDto,
    DashboardStats, EnrollAgentDto, EnrollmentResult, EnrollmentResultCounts, Formateur,
    Formation, LoginRequest, LoginResponse, MeResponse, PaginatedAgentsResponse,
    PaginatedCoursResponse, PaginatedFormateursResponse, PaginatedFormationsResponse,
    PaginatedSessionsResponse, PaginatedUsersResponse, Resource, Role, RoleDeletedResponse,
    RolePermissionsResponse, RoleUiPermissionsResponse, RoleWithUserCount, SessionEnrollment,
    SessionStatus, SessionStatusCounts, SessionSummary, TrainingSession, UiComponent,
    UpdateAgentDto, UpdateCoursDto, UpdateEnrollmentDto, UpdateFormateurDto, UpdateFormationDto,
    UpdateResourceDto, UpdateRoleDto, UpdateRolePermissionsDto, UpdateSessionDto,
    UpdateUiComponentDto, UpdateUiPermissionsDto, UpdateUserDto, User,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::health_check,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::me,
        crate::modules::agents::controller::create_agent,
        crate::modules::agents::controller::get_agents,
        crate::modules::agents::controller::get_agent,
        crate::modules::agents::controller::update_agent,
        crate::modules::agents::controller::delete_agent,
        crate::modules::agents::controller::get_agent_formations,
        crate::modules::formateurs::controller::create_formateur,
        crate::modules::formateurs::controller::get_formateurs,
        crate::modules::formateurs::controller::get_formateur,
        crate::modules::formateurs::controller::update_formateur,
        crate::modules::formateurs::controller::delete_formateur,
        crate::modules::formateurs::controller::get_formateur_cours,
        crate::modules::cours::controller::create_cours,
        crate::modules::cours::controller::get_cours_list,
        crate::modules::cours::controller::get_cours,
        crate::modules::cours::controller::update_cours,
        crate::modules::cours::controller::delete_cours,
        crate::modules::cours::controller::get_cours_formateurs,
        crate::modules::cours::controller::assign_formateur,
        crate::modules::cours::controller::unassign_formateur,
        crate::modules::formations::controller::create_formation,
        crate::modules::formations::controller::get_formations,
        crate::modules::formations::controller::get_formation,
        crate::modules::formations::controller::update_formation,
        crate::modules::formations::controller::delete_formation,
        crate::modules::sessions::controller::get_sessions,
        crate::modules::sessions::controller::get_session,
        crate::modules::sessions::controller::create_session,
        crate::modules::sessions::controller::update_session,
        crate::modules::sessions::controller::delete_session,
        crate::modules::enrollments::controller::get_session_enrollments,
        crate::modules::enrollments::controller::enroll_agent,
        crate::modules::enrollments::controller::update_enrollment,
        crate::modules::enrollments::controller::remove_enrollment,
        crate::modules::stats::controller::get_dashboard_stats,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::ban_user,
        crate::modules::users::controller::unban_user,
        crate::modules::users::controller::delete_user,
        crate::modules::roles::controller::get_roles,
        crate::modules::roles::controller::get_role,
        crate::modules::roles::controller::create_role,
        crate::modules::roles::controller::update_role,
        crate::modules::roles::controller::delete_role,
        crate::modules::permissions::controller::get_permission_matrix,
        crate::modules::permissions::controller::get_role_permissions,
        crate::modules::permissions::controller::update_role_permissions,
        crate::modules::permissions::controller::get_ui_permission_matrix,
        crate::modules::permissions::controller::get_role_ui_permissions,
        crate::modules::permissions::controller::update_role_ui_permissions,
        crate::modules::resources::controller::get_resources,
        crate::modules::resources::controller::get_resource,
        crate::modules::resources::controller::create_resource,
        crate::modules::resources::controller::update_resource,
        crate::modules::resources::controller::delete_resource,
        crate::modules::ui_components::controller::get_components,
        crate::modules::ui_components::controller::get_component,
        crate::modules::ui_components::controller::create_component,
        crate::modules::ui_components::controller::update_component,
        crate::modules::ui_components::controller::delete_component,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            MeResponse,
            User,
            CreateUserDto,
            UpdateUserDto,
            BanUserDto,
            PaginatedUsersResponse,
            Agent,
            CreateAgentDto,
            UpdateAgentDto,
            PaginatedAgentsResponse,
            AgentEnrollment,
            Formateur,
            CreateFormateurDto,
            UpdateFormateurDto,
            PaginatedFormateursResponse,
            Cours,
            CreateCoursDto,
            UpdateCoursDto,
            PaginatedCoursResponse,
            CoursFormateur,
            AssignFormateurDto,
            Formation,
            CreateFormationDto,
            UpdateFormationDto,
            PaginatedFormationsResponse,
            TrainingSession,
            SessionSummary,
            SessionStatus,
            CreateSessionDto,
            UpdateSessionDto,
            PaginatedSessionsResponse,
            AgentFormation,
            SessionEnrollment,
            EnrollmentResult,
            EnrollAgentDto,
            UpdateEnrollmentDto,
            DashboardStats,
            SessionStatusCounts,
            EnrollmentResultCounts,
            Role,
            RoleWithUserCount,
            CreateRoleDto,
            UpdateRoleDto,
            RoleDeletedResponse,
            RolePermissionsResponse,
            UpdateRolePermissionsDto,
            RoleUiPermissionsResponse,
            UpdateUiPermissionsDto,
            PermissionMatrix,
            UiPermissionMatrix,
            Resource,
            CreateResourceDto,
            UpdateResourceDto,
            UiComponent,
            CreateUiComponentDto,
            UpdateUiComponentDto,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Authentication", description = "Login, logout and the current session"),
        (name = "Agents", description = "Trainees"),
        (name = "Formateurs", description = "Trainers"),
        (name = "Cours", description = "Courses and their formateurs"),
        (name = "Formations", description = "Training programs"),
        (name = "Sessions", description = "Scheduled sessions"),
        (name = "Enrollments", description = "Agents enrolled in sessions"),
        (name = "Dashboard", description = "Counters"),
        (name = "Users", description = "Accounts"),
        (name = "Roles", description = "Roles and their permissions"),
        (name = "Permissions", description = "Role → resource → action matrix"),
        (name = "Resources", description = "Permission resources and their actions"),
        (name = "UI Components", description = "Role-gated UI components")
    ),
    info(
        title = "Helmsman API",
        version = "0.1.0",
        description = "Administration backend for a maritime training school, with database-driven role permissions.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("helmsman_session"))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_guarded_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/agents/{id}/formations",
            "/api/sessions/{id}/agents",
            "/api/roles/{name}/permissions",
            "/api/ui-components/permissions",
            "/api/stats",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_security_schemes_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.security_schemes.contains_key("session_cookie"));
    }
}
