use serde::{Deserialize, Serialize};

use crate::domain::{Project, UserId};

/// Role the backend assigns to accounts that own projects.
pub const OWNER_ROLE: i64 = 3;

/// Body of both `POST /users` (register) and `POST /users/auth` (login).
#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub success: bool,
    pub email: String,
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<UserId>,
    pub email: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub role: i64,
    #[serde(default, alias = "created_time")]
    pub created_at: Option<String>,
}

impl User {
    pub fn is_owner(&self) -> bool {
        self.role == OWNER_ROLE
    }

    /// Nickname when set, otherwise the email.
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.email)
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileRequest<'a> {
    pub nickname: &'a str,
}

/// `GET /projects` without a `project_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectListing {
    #[serde(default)]
    pub owner_projects: Vec<Project>,
    #[serde(default)]
    pub member_projects: Vec<Project>,
}

impl ProjectListing {
    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.owner_projects.iter().chain(&self.member_projects)
    }

    pub fn is_empty(&self) -> bool {
        self.owner_projects.is_empty() && self.member_projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_from_profile_body() {
        let user: User = serde_json::from_value(json!({
            "email": "owner@example.com",
            "nickname": null,
            "role": 3,
            "created_time": "2025-02-01 10:00:00"
        }))
        .unwrap();

        assert!(user.is_owner());
        assert_eq!(user.display_name(), "owner@example.com");
        assert_eq!(user.created_at.as_deref(), Some("2025-02-01 10:00:00"));
    }

    #[test]
    fn test_listing_tolerates_missing_side() {
        let listing: ProjectListing = serde_json::from_value(json!({
            "owner_projects": [
                { "id": 3, "title": "Atlas", "description": "", "created_at": "2025-02-01" }
            ]
        }))
        .unwrap();

        assert_eq!(listing.iter().map(|p| p.id).collect::<Vec<_>>(), vec![3]);
        assert!(listing.member_projects.is_empty());
        assert!(listing.owner_projects[0].is_active());
    }
}
