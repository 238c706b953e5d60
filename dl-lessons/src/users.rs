//! File-backed user store
//!
//! The whole store lives in one JSON document (`{"users": [...]}`), held in
//! memory and rewritten in full after every mutation. Writes go to a sibling
//! temp file first and are renamed into place.

use dl_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub stripe_customer_id: Option<String>,
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub credit_balance: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserDocument {
    #[serde(default)]
    users: Vec<User>,
}

pub struct UserStore {
    path: PathBuf,
    document: Mutex<UserDocument>,
}

impl UserStore {
    /// Open the store; a missing or unreadable file starts empty
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let document = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<UserDocument>(&raw) {
                Ok(document) => {
                    info!(users = document.users.len(), path = %path.display(), "Loaded user store");
                    document
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "User store unreadable, starting empty");
                    UserDocument::default()
                }
            },
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No user store yet, starting empty");
                UserDocument::default()
            }
        };

        Self {
            path,
            document: Mutex::new(document),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get_by_id(&self, id: &str) -> Option<User> {
        self.find(|u| u.id == id).await
    }

    pub async fn get_by_stripe_customer_id(&self, customer_id: &str) -> Option<User> {
        self.find(|u| u.stripe_customer_id.as_deref() == Some(customer_id))
            .await
    }

    pub async fn get_by_subscription_id(&self, subscription_id: &str) -> Option<User> {
        self.find(|u| u.subscription_id.as_deref() == Some(subscription_id))
            .await
    }

    pub async fn create_user(&self, email: &str, name: &str) -> Result<User> {
        if email.trim().is_empty() {
            return Err(Error::InvalidInput("Email is required".to_string()));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            stripe_customer_id: None,
            subscription_id: None,
            tier: None,
            credit_balance: 0,
        };

        let created = user.clone();
        self.mutate(move |doc| {
            doc.users.push(user);
            Ok(())
        })
        .await?;

        info!(user_id = %created.id, "Created user");
        Ok(created)
    }

    /// Replace the stored record with the same id
    pub async fn update_user(&self, user: User) -> Result<User> {
        let updated = user.clone();
        self.mutate(move |doc| {
            let slot = doc
                .users
                .iter_mut()
                .find(|u| u.id == user.id)
                .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
            *slot = user;
            Ok(())
        })
        .await?;
        Ok(updated)
    }

    /// Add credits, returning the new balance
    pub async fn increment_credits(&self, user_id: &str, amount: i64) -> Result<i64> {
        check_amount(amount)?;
        self.adjust_credits(user_id, |balance| {
            balance
                .checked_add(amount)
                .ok_or_else(|| Error::InvalidInput("Credit balance overflow".to_string()))
        })
        .await
    }

    /// Spend credits, returning the new balance
    ///
    /// A balance below `amount` fails with [`Error::InsufficientCredits`] and
    /// leaves the store untouched.
    pub async fn decrement_credits(&self, user_id: &str, amount: i64) -> Result<i64> {
        check_amount(amount)?;
        self.adjust_credits(user_id, |balance| {
            if balance < amount {
                Err(Error::InsufficientCredits {
                    available: balance,
                    requested: amount,
                })
            } else {
                Ok(balance - amount)
            }
        })
        .await
    }

    pub async fn len(&self) -> usize {
        self.document.lock().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.document.lock().await.users.is_empty()
    }

    async fn find(&self, predicate: impl Fn(&User) -> bool) -> Option<User> {
        self.document
            .lock()
            .await
            .users
            .iter()
            .find(|u| predicate(u))
            .cloned()
    }

    async fn adjust_credits(
        &self,
        user_id: &str,
        apply: impl FnOnce(i64) -> Result<i64>,
    ) -> Result<i64> {
        let mut balance = 0;
        self.mutate(|doc| {
            let user = doc
                .users
                .iter_mut()
                .find(|u| u.id == user_id)
                .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
            user.credit_balance = apply(user.credit_balance)?;
            balance = user.credit_balance;
            Ok(())
        })
        .await?;

        debug!(user_id, balance, "Credit balance updated");
        Ok(balance)
    }

    /// Apply a change to a copy, persist it, then commit it in memory
    async fn mutate(&self, change: impl FnOnce(&mut UserDocument) -> Result<()>) -> Result<()> {
        let mut document = self.document.lock().await;
        let mut next = document.clone();
        change(&mut next)?;
        self.persist(&next).await?;
        *document = next;
        Ok(())
    }

    async fn persist(&self, document: &UserDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn check_amount(amount: i64) -> Result<()> {
    if amount <= 0 {
        return Err(Error::InvalidInput("Amount must be positive".to_string()));
    }
    Ok(())
}
