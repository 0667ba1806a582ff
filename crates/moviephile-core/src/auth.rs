use moviephile_config::SessionStore;
use moviephile_models::{User, UserStats};
use tracing::{debug, info};
use crate::error::CoreError;

/// Local sign-in state. Credentials are not verified anywhere; any non-empty pair
/// produces a profile derived from the email address.
pub struct AuthSession {
    user: Option<User>,
    store: Option<SessionStore>,
}

impl AuthSession {
    /// Session that forgets the user when dropped
    pub fn in_memory() -> Self {
        Self {
            user: None,
            store: None,
        }
    }

    /// Session persisted to the given session file
    pub fn with_store(store: SessionStore) -> Self {
        Self {
            user: None,
            store: Some(store),
        }
    }

    /// Reload the cached user from disk, if any
    pub fn restore(&mut self) -> Result<Option<&User>, CoreError> {
        if let Some(store) = self.store.as_mut() {
            store.load()?;
            self.user = store.user().cloned();
            debug!(
                "Restored session from {:?}: {}",
                store.path(),
                self.user.as_ref().map_or("signed out", |u| u.email.as_str())
            );
        }
        Ok(self.user.as_ref())
    }

    /// Returns false without touching state when either field is blank
    pub fn login(&mut self, email: &str, password: &str) -> Result<bool, CoreError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Ok(false);
        }

        let user = profile_for_email(email);
        if let Some(store) = self.store.as_mut() {
            store.set_user(user.clone());
            store.save()?;
        }
        info!("Signed in as {}", user.email);
        self.user = Some(user);
        Ok(true)
    }

    pub fn logout(&mut self) -> Result<(), CoreError> {
        if let Some(store) = self.store.as_mut() {
            store.clear()?;
        }
        if let Some(user) = self.user.take() {
            info!("Signed out {}", user.email);
        }
        Ok(())
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Build a display profile from an email address.
///
/// `alex.rivera@example.com` becomes "Alex Rivera" (`@alexrivera`, avatar "AR").
pub fn profile_for_email(email: &str) -> User {
    let local = email.split('@').next().unwrap_or(email);
    let words: Vec<String> = local
        .split(|c: char| c == '.' || c == '_' || c == '-' || c == '+')
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();

    let name = if words.is_empty() {
        email.to_string()
    } else {
        words.join(" ")
    };
    let avatar: String = words
        .iter()
        .filter_map(|w| w.chars().next())
        .take(2)
        .collect();
    let handle: String = local
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    User {
        name,
        username: format!("@{}", handle),
        avatar: if avatar.is_empty() {
            "?".to_string()
        } else {
            avatar.to_uppercase()
        },
        bio: String::new(),
        email: email.to_string(),
        badges: Vec::new(),
        stats: UserStats::default(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
