//! Application services for identity resolution and role administration.

mod resolver;
mod role_admin;

pub use resolver::{
    IdentityResolutionError, IdentityResolutionResult, IdentityService, ResolveIdentityRequest,
};
pub use role_admin::{
    RoleAdminError, RoleAdminResult, RoleAdminService, RoleSyncFailure, RoleSyncReport,
};
