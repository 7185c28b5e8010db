//! The console's route table and the intent derived for a target path.

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;

use super::{HOME_PATH, LOGIN_PATH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDef {
    pub path: &'static str,
    pub name: &'static str,
    pub access: Access,
}

pub const DEVICES_PATH: &str = "/devices";
pub const PORTS_PATH: &str = "/ports";
pub const VLANS_PATH: &str = "/vlans";
pub const INSPECTIONS_PATH: &str = "/inspections";
pub const CONFIGURATIONS_PATH: &str = "/configurations";
pub const COLLECTION_PATH: &str = "/device-collection";
pub const GIT_CONFIGS_PATH: &str = "/git-configs";
pub const COMMAND_TEMPLATES_PATH: &str = "/command-templates";
pub const COMMAND_HISTORY_PATH: &str = "/command-history";
pub const USERS_PATH: &str = "/users";
pub const PROFILE_PATH: &str = "/profile";

const fn route(path: &'static str, name: &'static str, access: Access) -> RouteDef {
    RouteDef { path, name, access }
}

pub const ROUTES: &[RouteDef] = &[
    route(HOME_PATH, "home", Access::Authenticated),
    route(LOGIN_PATH, "login", Access::Public),
    route(DEVICES_PATH, "devices", Access::Authenticated),
    route(PORTS_PATH, "ports", Access::Authenticated),
    route(VLANS_PATH, "vlans", Access::Authenticated),
    route(INSPECTIONS_PATH, "inspections", Access::Authenticated),
    route(CONFIGURATIONS_PATH, "configurations", Access::Authenticated),
    route(COLLECTION_PATH, "device-collection", Access::Authenticated),
    route(GIT_CONFIGS_PATH, "git-configs", Access::Authenticated),
    route(COMMAND_TEMPLATES_PATH, "command-templates", Access::Authenticated),
    route(COMMAND_HISTORY_PATH, "command-history", Access::Authenticated),
    route(USERS_PATH, "users", Access::Admin),
    route(PROFILE_PATH, "profile", Access::Authenticated),
];

/// Requirements evaluated for one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteIntent {
    pub target: String,
    pub requires_auth: bool,
    pub requires_admin: bool,
    pub public: bool,
}

impl RouteIntent {
    #[must_use]
    pub fn is_login(&self) -> bool {
        route_path(&self.target) == LOGIN_PATH
    }
}

/// Path component of `target`, without query string or fragment.
#[must_use]
pub fn route_path(target: &str) -> &str {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    match &target[..end] {
        "" => HOME_PATH,
        path => path,
    }
}

/// Route owning `target`: exact match, or the longest `base/` prefix.
#[must_use]
pub fn find(target: &str) -> Option<&'static RouteDef> {
    let path = route_path(target);
    ROUTES
        .iter()
        .filter(|def| {
            path == def.path
                || (def.path != HOME_PATH
                    && path.strip_prefix(def.path).is_some_and(|rest| rest.starts_with('/')))
        })
        .max_by_key(|def| def.path.len())
}

/// Intent for `target`. Unknown paths require authentication.
#[must_use]
pub fn intent_for(target: &str) -> RouteIntent {
    let access = find(target).map_or(Access::Authenticated, |def| def.access);
    RouteIntent {
        target: target.to_owned(),
        requires_auth: access != Access::Public,
        requires_admin: access == Access::Admin,
        public: access == Access::Public,
    }
}
