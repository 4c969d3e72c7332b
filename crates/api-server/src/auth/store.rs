use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use super::types::{AuthError, User};

/// User accounts keyed by normalized email
pub struct UserStore {
    users: RwLock<HashMap<String, User>>,
    file_path: Option<PathBuf>,
}

impl UserStore {
    /// Load users from `file_path`, creating it on first signup
    pub async fn new(file_path: PathBuf) -> Result<Self, AuthError> {
        let users = load_users(&file_path).await?;
        Ok(Self {
            users: RwLock::new(users),
            file_path: Some(file_path),
        })
    }

    /// Store that keeps accounts only in memory
    pub fn in_memory() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            file_path: None,
        }
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidInput("Name is required".to_string()));
        }
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let mut users = self.users.write().await;
        if users.contains_key(&email) {
            return Err(AuthError::EmailTaken(email));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.clone(),
            password_hash: hash_password(password),
            created_at: Utc::now(),
        };

        let mut next = users.clone();
        next.insert(email, user.clone());
        if let Some(path) = &self.file_path {
            persist_users(path, &next).await?;
        }
        *users = next;
        Ok(user)
    }

    /// Check credentials; unknown email and wrong password are indistinguishable
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim().to_lowercase();
        let users = self.users.read().await;
        users
            .get(&email)
            .filter(|user| verify_password(&user.password_hash, password))
            .cloned()
            .ok_or(AuthError::InvalidCredentials)
    }

    pub async fn get_user(&self, id: Uuid) -> Option<User> {
        let users = self.users.read().await;
        users.values().find(|user| user.id == id).cloned()
    }
}

async fn load_users(path: &Path) -> Result<HashMap<String, User>, AuthError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| AuthError::Storage(format!("Failed to read users: {}", err)))?;
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }
    let users: Vec<User> = serde_json::from_str(&content)
        .map_err(|err| AuthError::Storage(format!("Failed to parse users: {}", err)))?;
    Ok(users
        .into_iter()
        .map(|user| (user.email.clone(), user))
        .collect())
}

async fn persist_users(path: &Path, users: &HashMap<String, User>) -> Result<(), AuthError> {
    let mut records: Vec<&User> = users.values().collect();
    records.sort_by_key(|user| user.created_at);
    let content = serde_json::to_string_pretty(&records)
        .map_err(|err| AuthError::Storage(format!("Failed to serialize users: {}", err)))?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|err| {
            AuthError::Storage(format!("Failed to create users parent dir: {}", err))
        })?;
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|err| AuthError::Storage(format!("Failed to write users: {}", err)))?;
    Ok(())
}

fn normalize_email(email: &str) -> Result<String, AuthError> {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return Err(AuthError::InvalidInput("Invalid email".to_string()));
    }
    Ok(normalized)
}
