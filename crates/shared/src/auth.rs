//! Authentication claims for request actors.
//!
//! Token issuance lives in the external auth service; this crate only
//! validates tokens and exposes the actor's identity to handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Project the actor belongs to (workers always have one;
    /// organisation-wide roles may not).
    pub project: Option<Uuid>,
    /// The actor's role (drawer, checker, qa, designer, management roles).
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        project_id: Option<Uuid>,
        role: &str,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            project: project_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the project ID from claims, if any.
    #[must_use]
    pub const fn project_id(&self) -> Option<Uuid> {
        self.project
    }
}
