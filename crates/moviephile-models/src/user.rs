use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserStats {
    pub watchlist: u32,
    pub watched: u32,
    pub reviews: u32,
    pub followers: u32,
    pub following: u32,
}

/// Signed-in user profile. The email doubles as the watchlist identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub username: String,
    /// Avatar initials
    pub avatar: String,
    #[serde(default)]
    pub bio: String,
    pub email: String,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub stats: UserStats,
}

impl User {
    /// Identity used to scope watchlist rows
    pub fn identity(&self) -> &str {
        &self.email
    }
}
