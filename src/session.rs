//! Logged-in user context.
//!
//! `school login` saves the user returned by the backend to a session file.
//! Every later invocation loads it once and hands it to the commands that
//! need it as an explicit [`SessionState`] value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Role of a user within the school. Encoded as `0`, `1`, `2` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum UserType {
    /// School administrator.
    Admin,
    /// Teacher.
    Teacher,
    /// Student.
    Student,
}

impl UserType {
    /// Whether this role may see rosters and management views.
    #[must_use]
    pub fn is_staff(self) -> bool {
        !matches!(self, Self::Student)
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }
}

impl TryFrom<u8> for UserType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Admin),
            1 => Ok(Self::Teacher),
            2 => Ok(Self::Student),
            other => Err(format!("unknown user type {other}")),
        }
    }
}

impl From<UserType> for u8 {
    fn from(value: UserType) -> Self {
        match value {
            UserType::Admin => 0,
            UserType::Teacher => 1,
            UserType::Student => 2,
        }
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" | "0" => Ok(Self::Admin),
            "teacher" | "1" => Ok(Self::Teacher),
            "student" | "2" => Ok(Self::Student),
            other => {
                Err(format!("unknown user type {other:?} (expected admin, teacher or student)"))
            }
        }
    }
}

/// The authenticated user as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// Unix timestamp of the previous login.
    #[serde(default)]
    pub last_time_online: i64,
    /// Whether the user has replaced their initial password.
    #[serde(default)]
    pub changed_password: bool,
    /// Contact phone number.
    #[serde(default)]
    pub phone_number: String,
    /// Login email.
    pub email: String,
    /// Backend identity.
    pub user_id: String,
    /// Role.
    pub user_type: UserType,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl User {
    /// `first last`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Login form payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Login email.
    pub email: String,
    /// Password.
    pub password: String,
    /// School the account belongs to.
    pub school_id: String,
}

/// Loading state of the user context.
///
/// A state starts as [`Loading`](Self::Loading) and [`load`](Self::load)
/// settles it. The CLI loads the session file synchronously, so commands
/// only ever see `Failed` or `Ready`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// Not fetched yet.
    #[default]
    Loading,
    /// Fetch failed; the message is suitable for display.
    Failed(String),
    /// The logged-in user.
    Ready(User),
}

impl SessionState {
    /// Reads the saved session and settles the state.
    #[must_use]
    pub fn load(store: &SessionStore) -> Self {
        match store.load() {
            Ok(Some(user)) => {
                tracing::debug!(user_id = %user.user_id, "session ready");
                Self::Ready(user)
            }
            Ok(None) => Self::Failed("Not logged in".to_string()),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load session");
                Self::Failed(err)
            }
        }
    }

    /// The user, when ready.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Ready(user) => Some(user),
            Self::Loading | Self::Failed(_) => None,
        }
    }

    /// The user, or a displayable reason why there is none.
    ///
    /// # Errors
    ///
    /// Returns the failure message when the session is not ready.
    pub fn require(&self) -> Result<&User, String> {
        match self {
            Self::Ready(user) => Ok(user),
            Self::Loading => Err("Session is still loading".to_string()),
            Self::Failed(msg) => Err(msg.clone()),
        }
    }
}

/// File-backed storage for the logged-in [`User`].
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store backed by the given file.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf() }
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved user, or `None` when nobody is logged in.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<User>, String> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read session {}: {e}", self.path.display()))?;
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| format!("Failed to parse session {}: {e}", self.path.display()))
    }

    /// Saves the user, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save(&self, user: &User) -> Result<(), String> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(user)
            .map_err(|e| format!("Failed to serialize session: {e}"))?;
        std::fs::write(&self.path, json)
            .map_err(|e| format!("Failed to write session {}: {e}", self.path.display()))
    }

    /// Removes the saved session. Missing files are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), String> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("Failed to remove session {}: {e}", self.path.display())),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_user(user_type: UserType) -> User {
    User {
        token: "tok".into(),
        last_time_online: 0,
        changed_password: true,
        phone_number: String::new(),
        email: "ada@school.test".into(),
        user_id: "u-1".into(),
        user_type,
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
    }
}
