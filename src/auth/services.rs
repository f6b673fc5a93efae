use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use super::dto::{LoginRequest, RegisterRequest};
use super::password::{hash_password, verify_password};
use crate::clock::Clock;
use crate::errors::{AppError, AppResult};
use crate::profile::{compute_targets, UserProfile};
use crate::storage::{keys, load_json, save_json, KvStore};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Accounts in `users-db` plus the single active session in `session-user`.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Creates the account and opens a session for it.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: RegisterRequest) -> AppResult<UserProfile> {
        let email = normalize_email(&req.email);
        if !is_valid_email(&email) {
            warn!(%email, "invalid email");
            return Err(AppError::validation("Invalid email"));
        }
        if req.password.len() < MIN_PASSWORD_LEN {
            warn!("password too short");
            return Err(AppError::validation("Password too short"));
        }
        if req.name.trim().is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        if let Some(body) = &req.body {
            body.stats.validate()?;
        }

        if UserProfile::find_by_email(self.store.as_ref(), &email).await?.is_some() {
            warn!(%email, "email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "hash_password failed");
            AppError::Storage(e)
        })?;

        let mut user = UserProfile::new_account(req.name.trim().to_string(), email, self.clock.now());
        user.password_hash = Some(hash);
        user.language = req.language;
        user.profile_picture = req.profile_picture;
        if let Some(body) = req.body {
            user.gender = body.gender;
            user.weight = body.stats.weight;
            user.height = body.stats.height;
            user.age = body.stats.age;
            user.goal = body.goal;
            user.activity_level = body.activity_level;
            user.dietary_restrictions = body.dietary_restrictions;
            if let Some(meals) = body.meals_per_day {
                user.meals_per_day = meals;
            }
            user.targets = compute_targets(user.weight, user.height, user.age, user.gender, user.goal);
        }

        user.upsert(self.store.as_ref()).await?;
        self.open_session(&user).await?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user.without_credentials())
    }

    /// Checks credentials and opens a session. Stored accounts are not touched.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> AppResult<UserProfile> {
        let email = normalize_email(&req.email);
        if email.is_empty() || req.password.is_empty() {
            return Err(AppError::validation("Fill all fields"));
        }

        let Some(user) = UserProfile::find_by_email(self.store.as_ref(), &email).await? else {
            warn!(%email, "login unknown email");
            return Err(AppError::InvalidCredentials);
        };

        let ok = match user.password_hash.as_deref() {
            Some(hash) => verify_password(&req.password, hash).unwrap_or_else(|e| {
                error!(error = %e, user_id = %user.id, "stored hash unreadable");
                false
            }),
            None => false,
        };
        if !ok {
            warn!(%email, user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }

        self.open_session(&user).await?;
        info!(user_id = %user.id, "user logged in");
        Ok(user.without_credentials())
    }

    #[instrument(skip(self))]
    pub async fn logout(&self) -> AppResult<()> {
        self.store.delete(keys::SESSION_USER).await?;
        info!("session cleared");
        Ok(())
    }

    /// The persisted session, if any. A malformed blob is an error so the
    /// caller can decide how to recover.
    pub async fn current_session(&self) -> AppResult<Option<UserProfile>> {
        let user: Option<UserProfile> = load_json(self.store.as_ref(), keys::SESSION_USER).await?;
        Ok(user.map(UserProfile::normalized))
    }

    /// Saves profile edits to both the account list and the session.
    #[instrument(skip(self, profile), fields(user_id = %profile.id))]
    pub async fn persist(&self, profile: &UserProfile) -> AppResult<()> {
        profile.upsert(self.store.as_ref()).await?;
        self.open_session(profile).await
    }

    async fn open_session(&self, user: &UserProfile) -> AppResult<()> {
        save_json(self.store.as_ref(), keys::SESSION_USER, &user.without_credentials()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::dto::OnboardingBody;
    use crate::profile::{BodyStats, Gender, Goal, Language, MacroTargets};
    use crate::storage::MemoryStore;
    use crate::testing::fixed_clock;

    fn sessions() -> (SessionStore, MemoryStore) {
        let mem = MemoryStore::new();
        (SessionStore::new(Arc::new(mem.clone()), fixed_clock()), mem)
    }

    fn request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Maria Costa".into(),
            email: email.into(),
            password: "hunter2hunter2".into(),
            language: Language::En,
            profile_picture: None,
            body: None,
        }
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@b.pt"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[tokio::test]
    async fn register_opens_session_with_defaults() {
        let (sessions, _) = sessions();
        let user = sessions.register(request("Maria@Example.com ")).await.unwrap();
        assert_eq!(user.email, "maria@example.com");
        assert_eq!(user.targets, MacroTargets::default());
        assert_eq!(user.meals_per_day, 4);
        assert!(!user.is_premium());

        let current = sessions.current_session().await.unwrap().unwrap();
        assert_eq!(current.id, user.id);
        assert!(current.password_hash.is_none());
    }

    #[tokio::test]
    async fn register_with_body_computes_targets() {
        let (sessions, _) = sessions();
        let mut req = request("rui@example.com");
        req.body = Some(OnboardingBody {
            gender: Gender::Male,
            stats: BodyStats { weight: 70.0, height: 175.0, age: 30 },
            goal: Goal::Maintain,
            activity_level: Default::default(),
            dietary_restrictions: vec!["lactose".into()],
            meals_per_day: Some(5),
        });
        let user = sessions.register(req).await.unwrap();
        assert_eq!(user.targets.calories, 2267);
        assert_eq!(user.meals_per_day, 5);
    }

    #[tokio::test]
    async fn duplicate_email_leaves_existing_record() {
        let (sessions, mem) = sessions();
        sessions.register(request("dup@example.com")).await.unwrap();
        let users_before = mem.snapshot().await.get(keys::USERS_DB).cloned();

        let mut again = request("DUP@example.com");
        again.name = "Someone Else".into();
        let err = sessions.register(again).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
        assert_eq!(mem.snapshot().await.get(keys::USERS_DB).cloned(), users_before);
    }

    #[tokio::test]
    async fn register_rejects_bad_input() {
        let (sessions, _) = sessions();
        let mut short = request("short@example.com");
        short.password = "1234".into();
        assert!(matches!(sessions.register(short).await, Err(AppError::Validation(_))));
        assert!(matches!(sessions.register(request("nope")).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn login_checks_hash_and_does_not_mutate_accounts() {
        let (sessions, mem) = sessions();
        sessions.register(request("joao@example.com")).await.unwrap();
        sessions.logout().await.unwrap();
        assert!(sessions.current_session().await.unwrap().is_none());
        let users_before = mem.snapshot().await.get(keys::USERS_DB).cloned();

        let bad = sessions
            .login(LoginRequest { email: "joao@example.com".into(), password: "wrong-password".into() })
            .await
            .unwrap_err();
        assert!(matches!(bad, AppError::InvalidCredentials));
        assert!(sessions.current_session().await.unwrap().is_none());

        let user = sessions
            .login(LoginRequest { email: " JOAO@example.com".into(), password: "hunter2hunter2".into() })
            .await
            .unwrap();
        assert_eq!(user.email, "joao@example.com");
        assert!(sessions.current_session().await.unwrap().is_some());
        assert_eq!(mem.snapshot().await.get(keys::USERS_DB).cloned(), users_before);
    }

    #[tokio::test]
    async fn unknown_email_is_invalid_credentials() {
        let (sessions, _) = sessions();
        let err = sessions
            .login(LoginRequest { email: "ghost@example.com".into(), password: "whatever1".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn persist_updates_account_and_session_but_keeps_hash() {
        let (sessions, _) = sessions();
        let mut user = sessions.register(request("edit@example.com")).await.unwrap();
        user.name = "Edited".into();
        sessions.persist(&user).await.unwrap();

        assert_eq!(sessions.current_session().await.unwrap().unwrap().name, "Edited");
        sessions.logout().await.unwrap();
        let again = sessions
            .login(LoginRequest { email: "edit@example.com".into(), password: "hunter2hunter2".into() })
            .await
            .unwrap();
        assert_eq!(again.name, "Edited");
    }
}
