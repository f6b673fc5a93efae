use crate::errors::AppResult;
use crate::profile::UserProfile;
use crate::storage::{keys, load_json, save_json, KvStore};

impl UserProfile {
    /// Every registered account, in registration order.
    pub async fn all(store: &dyn KvStore) -> AppResult<Vec<UserProfile>> {
        let users: Vec<UserProfile> = load_json(store, keys::USERS_DB).await?.unwrap_or_default();
        Ok(users.into_iter().map(UserProfile::normalized).collect())
    }

    /// Find an account by (already normalised) email.
    pub async fn find_by_email(store: &dyn KvStore, email: &str) -> AppResult<Option<UserProfile>> {
        Ok(Self::all(store).await?.into_iter().find(|u| u.email == email))
    }

    /// Insert or replace the account with this email. A profile without a
    /// credential hash keeps the stored one.
    pub async fn upsert(&self, store: &dyn KvStore) -> AppResult<()> {
        let mut users = Self::all(store).await?;
        match users.iter_mut().find(|u| u.email == self.email) {
            Some(existing) => {
                let hash = self
                    .password_hash
                    .clone()
                    .or_else(|| existing.password_hash.take());
                let mut next = self.clone();
                next.password_hash = hash;
                *existing = next;
            }
            None => users.push(self.clone()),
        }
        save_json(store, keys::USERS_DB, &users).await
    }
}
