//! # Helmsman Models
//!
//! Database rows and request/response DTOs for the Helmsman API.
//!
//! Training domain:
//!
//! - [`agents`], [`formateurs`], [`formations`], [`cours`]
//! - [`sessions`]: scheduled sessions and their computed status
//! - [`enrollments`]: agents enrolled in sessions, with results
//! - [`stats`]: dashboard counters
//!
//! Accounts and authorization:
//!
//! - [`users`], [`auth`]
//! - [`roles`], [`resources`], [`ui_components`]
//!
//! Row types derive `sqlx::FromRow`; request DTOs derive `validator::Validate`;
//! everything exposed over HTTP derives `utoipa::ToSchema`.

pub mod agents;
pub mod auth;
pub mod cours;
pub mod enrollments;
pub mod formateurs;
pub mod formations;
pub mod resources;
pub mod roles;
pub mod sessions;
pub mod stats;
pub mod ui_components;
pub mod users;
pub mod validation;

pub use agents::{
    Agent, AgentFilterParams, CreateAgentDto, PaginatedAgentsResponse, UpdateAgentDto,
};
pub use auth::{LoginRequest, LoginResponse, MeResponse};
pub use cours::{
    AssignFormateurDto, Cours, CoursFilterParams, CoursFormateur, CreateCoursDto,
    PaginatedCoursResponse, UpdateCoursDto,
};
pub use enrollments::{
    AgentEnrollment, AgentFormation, EnrollAgentDto, EnrollmentResult, SessionEnrollment,
    UpdateEnrollmentDto,
};
pub use formateurs::{
    CreateFormateurDto, Formateur, FormateurFilterParams, PaginatedFormateursResponse,
    UpdateFormateurDto,
};
pub use formations::{
    CreateFormationDto, Formation, FormationFilterParams, PaginatedFormationsResponse,
    UpdateFormationDto,
};
pub use resources::{CreateResourceDto, Resource, UpdateResourceDto};
pub use roles::{
    CreateRoleDto, Role, RoleDeletedResponse, RolePermissionsResponse, RoleUiPermissionsResponse,
    RoleWithUserCount, UpdateRoleDto, UpdateRolePermissionsDto, UpdateUiPermissionsDto,
};
pub use sessions::{
    CreateSessionDto, PaginatedSessionsResponse, SessionFilterParams, SessionStatus,
    SessionSummary, TrainingSession, UpdateSessionDto,
};
pub use stats::{DashboardStats, EnrollmentResultCounts, SessionStatusCounts};
pub use ui_components::{
    CreateUiComponentDto, UiComponent, UiComponentFilterParams, UpdateUiComponentDto,
};
pub use users::{
    BanUserDto, CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User, UserCredentials,
    UserFilterParams,
};
