//! Wire DTOs shared by the facades and the stores.
//!
//! DESIGN
//! ======
//! Only the shapes the client reasons about are typed (identity, batch
//! results, devices). Everything else crosses the boundary as
//! `serde_json::Value`. Typed records keep unknown server fields in an
//! `extra` map so a round-trip never drops data.

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role name that grants admin privilege.
pub const ADMIN_ROLE: &str = "admin";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Role {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self { name: name.to_owned(), description: None, extra: Map::new() }
    }
}

/// The authenticated identity as returned by `/auth/me`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    #[must_use]
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|role| role.name == name)
    }

    /// Admin if the profile holds the `admin` role or is a superuser.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_superuser || self.has_role(ADMIN_ROLE)
    }

    /// Display name: nickname when set, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|nickname| !nickname.is_empty())
            .unwrap_or(&self.username)
    }

    /// Overlay the fields of a JSON object onto this profile.
    ///
    /// Keys absent from `patch` keep their current values; non-object patches
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged document no longer forms a valid
    /// profile (for example `username` set to a number).
    pub fn merge(&mut self, patch: &Value) -> Result<(), serde_json::Error> {
        let Value::Object(fields) = patch else {
            return Ok(());
        };
        let mut merged = serde_json::to_value(&*self)?;
        if let Value::Object(current) = &mut merged {
            for (key, value) in fields {
                current.insert(key.clone(), value.clone());
            }
        }
        *self = serde_json::from_value(merged)?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Captcha {
    pub captcha_id: String,
    /// Image as a data URL / base64 string.
    pub captcha_image: String,
    #[serde(default = "default_captcha_ttl")]
    pub expires_in: u64,
}

fn default_captcha_ttl() -> u64 {
    300
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub captcha_id: String,
    #[serde(default)]
    pub captcha_code: String,
    #[serde(default)]
    pub remember: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    pub user: Profile,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

/// Partial update of the caller's own profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

/// Outcome of a batch device operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOperationResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub failed_count: u64,
    #[serde(default)]
    pub failed_devices: Option<Vec<String>>,
}

/// `{success, message, data}` envelope used by collection and command
/// endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub hostname: String,
    pub ip_address: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub model: String,
    #[serde(default = "default_device_status")]
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_device_status() -> String {
    "active".to_owned()
}

impl Device {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// One learned MAC address as stored by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MacAddressEntry {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub device_id: i64,
    pub mac_address: String,
    #[serde(default)]
    pub vlan_id: Option<i64>,
    #[serde(default)]
    pub interface: String,
    #[serde(default = "default_address_type")]
    pub address_type: String,
    #[serde(default)]
    pub last_seen: Option<String>,
}

fn default_address_type() -> String {
    "dynamic".to_owned()
}

/// Paging/filter query shared by list endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<i64>,
}
