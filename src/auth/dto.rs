use serde::{Deserialize, Serialize};

/// Request body for login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for registration.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// The user object inside an auth response, whichever nesting level it
/// arrives at.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// The backend answers with either `{ user: { user: {...} } }` or
/// `{ user: {...} }` depending on the auth route variant. Both shapes
/// are accepted here and flattened once, at the session boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserPayload {
    Nested { user: UserProfile },
    Flat(UserProfile),
}

impl UserPayload {
    pub fn into_profile(self) -> UserProfile {
        match self {
            Self::Nested { user } | Self::Flat(user) => user,
        }
    }
}

/// Response returned by both login and register.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSuccess {
    pub user: UserPayload,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_nested_user_shape() {
        let auth: AuthSuccess = serde_json::from_value(serde_json::json!({
            "user": { "user": { "id": "u1", "name": "Ada" } },
            "token": "t0k3n"
        }))
        .expect("nested shape");
        assert_eq!(auth.user.into_profile().id, "u1");
    }

    #[test]
    fn accepts_the_flat_user_shape() {
        let auth: AuthSuccess = serde_json::from_value(serde_json::json!({
            "user": { "id": "u2", "name": "Grace", "email": "grace@example.com" },
            "token": "t0k3n"
        }))
        .expect("flat shape");
        let profile = auth.user.into_profile();
        assert_eq!(profile.id, "u2");
        assert_eq!(profile.email, "grace@example.com");
    }
}
