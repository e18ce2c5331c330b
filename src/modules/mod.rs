pub mod agents;
pub mod auth;
pub mod cours;
pub mod enrollments;
pub mod formateurs;
pub mod formations;
pub mod permissions;
pub mod resources;
pub mod roles;
pub mod sessions;
pub mod stats;
pub mod ui_components;
pub mod users;
