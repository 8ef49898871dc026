//! Authentication and purchase-history store.
//!
//! Owns the session state machine (`Anonymous` / `Authenticated(user)`) and
//! the in-memory purchase list for the current session. Accounts, the session
//! pointer and the global purchase log live in the persistence substrate
//! under the `users`, `currentUser` and `purchases` keys.
//!
//! All operations are synchronous and run to completion. They still return a
//! `Result` so a networked backend could replace the local substrate without
//! changing callers.

mod error;

pub use error::AuthError;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::instrument;

use softbenny_core::Email;

use crate::config::SessionPolicy;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::purchase::{NewPurchase, Purchase};
use crate::models::session::Session;
use crate::models::user::{User, UserRecord};
use crate::storage::purchases::PurchaseRepository;
use crate::storage::session::SessionRepository;
use crate::storage::users::UserRepository;
use crate::storage::{KeyValueStore, StorageError};

/// What observers of the auth store see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// The current session.
    pub session: Session,
    /// Purchases of the session's user, in recording order. Empty when
    /// anonymous.
    pub purchases: Vec<Purchase>,
}

/// The auth/purchase store.
pub struct AuthStore<S> {
    storage: S,
    state: watch::Sender<AuthState>,
}

impl<S: KeyValueStore> AuthStore<S> {
    /// Build the store over `storage`, restoring any persisted session.
    ///
    /// With [`SessionPolicy::Trust`] a stored session pointer is used as-is.
    /// With [`SessionPolicy::Revalidate`] a pointer whose user is no longer
    /// registered is discarded and removed from storage.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if stored data cannot be read or is
    /// malformed.
    pub fn restore(mut storage: S, policy: SessionPolicy) -> Result<Self, AuthError> {
        let mut user = SessionRepository::new(&mut storage).load()?;

        if policy == SessionPolicy::Revalidate {
            if let Some(id) = user.as_ref().map(|user| user.id) {
                if !UserRepository::new(&mut storage).exists(id)? {
                    tracing::warn!(user_id = %id, "Discarding session for unknown user");
                    SessionRepository::new(&mut storage).clear()?;
                    user = None;
                }
            }
        }

        let purchases = match &user {
            Some(user) => PurchaseRepository::new(&mut storage).for_user(user.id)?,
            None => Vec::new(),
        };

        if let Some(user) = &user {
            tracing::info!(
                user_id = %user.id,
                purchases = purchases.len(),
                "Restored session"
            );
            set_sentry_user(&user.id, Some(user.email.as_str()));
        }

        let (state, _) = watch::channel(AuthState {
            session: Session::from(user),
            purchases,
        });

        Ok(Self { storage, state })
    }

    // =========================================================================
    // Session transitions
    // =========================================================================

    /// Register a new account and log into it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if the name or password is blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already
    /// registered; neither the stored users nor the session change.
    #[instrument(skip(self, name, password), fields(email = %email))]
    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        password: SecretString,
    ) -> Result<User, AuthError> {
        if name.trim().is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        if password.expose_secret().is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        let email = Email::parse(email)?;

        let record = UserRecord::new(name.to_owned(), email, password);
        let user = record.to_user();

        UserRepository::new(&mut self.storage)
            .create(record)
            .map_err(|e| match e {
                StorageError::Conflict(_) => {
                    tracing::warn!("Registration rejected: email already registered");
                    AuthError::UserAlreadyExists
                }
                other => AuthError::Storage(other),
            })?;

        self.start_session(&user, Vec::new())?;
        tracing::info!(user_id = %user.id, "Registered");

        Ok(user)
    }

    /// Log in with an exact email/password match.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no account matches; the
    /// session is left unchanged.
    #[instrument(skip(self, password), fields(email = %email))]
    pub fn login(&mut self, email: &str, password: &SecretString) -> Result<User, AuthError> {
        let Some(record) = UserRepository::new(&mut self.storage)
            .get_by_credentials(email, password.expose_secret())?
        else {
            tracing::warn!("Login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        };

        let user = record.to_user();
        let purchases = PurchaseRepository::new(&mut self.storage).for_user(user.id)?;

        self.start_session(&user, purchases)?;
        tracing::info!(user_id = %user.id, "Logged in");

        Ok(user)
    }

    /// End the session.
    ///
    /// The in-memory state always becomes anonymous, even if removing the
    /// stored session pointer fails.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the session pointer cannot be removed.
    #[instrument(skip(self))]
    pub fn logout(&mut self) -> Result<(), AuthError> {
        let was_authenticated = self.state.send_if_modified(|state| {
            let changed = state.session.is_authenticated() || !state.purchases.is_empty();
            *state = AuthState::default();
            changed
        });

        clear_sentry_user();
        SessionRepository::new(&mut self.storage).clear()?;

        if was_authenticated {
            tracing::info!("Logged out");
        }
        Ok(())
    }

    /// Record a purchase for the session's user.
    ///
    /// Returns `Ok(None)` without touching storage when anonymous.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the purchase log cannot be written.
    pub fn add_purchase(&mut self, new: NewPurchase) -> Result<Option<Purchase>, AuthError> {
        let Some(user_id) = self.state.borrow().session.user_id() else {
            tracing::debug!("Ignoring purchase without a session");
            return Ok(None);
        };

        let purchase = Purchase::record(new, user_id, Utc::now());
        PurchaseRepository::new(&mut self.storage).append(&purchase)?;

        self.state.send_modify(|state| state.purchases.push(purchase.clone()));
        tracing::info!(
            purchase_id = %purchase.id,
            %user_id,
            total = %purchase.total,
            "Recorded purchase"
        );

        Ok(Some(purchase))
    }

    fn start_session(&mut self, user: &User, purchases: Vec<Purchase>) -> Result<(), AuthError> {
        SessionRepository::new(&mut self.storage).save(user)?;
        self.state.send_replace(AuthState {
            session: Session::Authenticated(user.clone()),
            purchases,
        });
        set_sentry_user(&user.id, Some(user.email.as_str()));
        Ok(())
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// Borrow the current state.
    ///
    /// Do not hold the returned guard across calls that mutate the store.
    #[must_use]
    pub fn state(&self) -> watch::Ref<'_, AuthState> {
        self.state.borrow()
    }

    /// A clone of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.state.borrow().session.clone()
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().session.user().cloned()
    }

    /// A clone of the session's purchases.
    #[must_use]
    pub fn purchases(&self) -> Vec<Purchase> {
        self.state.borrow().purchases.clone()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// The underlying storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store, returning its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use softbenny_core::{Price, ProductId};

    use super::*;
    use crate::models::purchase::PurchaseItem;
    use crate::storage::{MemoryStore, keys};

    fn store() -> AuthStore<MemoryStore> {
        AuthStore::restore(MemoryStore::new(), SessionPolicy::Trust).unwrap()
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s)
    }

    fn one_item(cents: u32) -> NewPurchase {
        let price = Price::from_cents(cents);
        NewPurchase {
            items: vec![PurchaseItem {
                product_id: ProductId::new(1),
                name: "Taza".to_string(),
                price,
                quantity: 1,
                image: "/img/taza.jpg".to_string(),
            }],
            total: price,
        }
    }

    #[test]
    fn test_starts_anonymous() {
        let auth = store();
        assert_eq!(auth.session(), Session::Anonymous);
        assert!(auth.purchases().is_empty());
    }

    #[test]
    fn test_register_logs_in_and_persists_pointer() {
        let mut auth = store();
        let user = auth.register("Ana", "a@x.com", secret("pw")).unwrap();

        assert_eq!(auth.current_user(), Some(user.clone()));
        assert!(auth.purchases().is_empty());

        let pointer = auth.storage().get(keys::CURRENT_USER).unwrap().unwrap();
        assert!(!pointer.contains("pw"));
        let stored: User = serde_json::from_str(&pointer).unwrap();
        assert_eq!(stored, user);
    }

    #[test]
    fn test_duplicate_register_changes_nothing() {
        let mut auth = store();
        auth.register("Ana", "a@x.com", secret("pw")).unwrap();
        auth.logout().unwrap();
        let users_before = auth.storage().get(keys::USERS).unwrap();

        let err = auth.register("Other", "a@x.com", secret("pw2")).unwrap_err();

        assert!(matches!(err, AuthError::UserAlreadyExists));
        assert_eq!(auth.storage().get(keys::USERS).unwrap(), users_before);
        assert_eq!(auth.session(), Session::Anonymous);
        assert!(auth.storage().get(keys::CURRENT_USER).unwrap().is_none());
    }

    #[test]
    fn test_register_validates_input() {
        let mut auth = store();
        assert!(matches!(
            auth.register("  ", "a@x.com", secret("pw")),
            Err(AuthError::MissingField("name"))
        ));
        assert!(matches!(
            auth.register("Ana", "a@x.com", secret("")),
            Err(AuthError::MissingField("password"))
        ));
        assert!(matches!(
            auth.register("Ana", "not-an-email", secret("pw")),
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(auth.storage().get(keys::USERS).unwrap().is_none());
    }

    #[test]
    fn test_register_stores_name_as_given() {
        let mut auth = store();
        let user = auth.register("  Ana Pérez ", "a@x.com", secret("pw")).unwrap();
        assert_eq!(user.name, "  Ana Pérez ");

        auth.logout().unwrap();
        let user = auth.login("a@x.com", &secret("pw")).unwrap();
        assert_eq!(user.name, "  Ana Pérez ");
    }

    #[test]
    fn test_wrong_password_leaves_session_anonymous() {
        let mut auth = store();
        auth.register("Ana", "a@x.com", secret("pw")).unwrap();
        auth.logout().unwrap();

        let err = auth.login("a@x.com", &secret("wrong")).unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(auth.session(), Session::Anonymous);
    }

    #[test]
    fn test_failed_login_keeps_existing_session() {
        let mut auth = store();
        let ana = auth.register("Ana", "a@x.com", secret("pw")).unwrap();

        assert!(auth.login("b@x.com", &secret("pw")).is_err());
        assert_eq!(auth.current_user(), Some(ana));
    }

    #[test]
    fn test_logout_clears_session_and_purchases() {
        let mut auth = store();
        auth.register("Ana", "a@x.com", secret("pw")).unwrap();
        auth.add_purchase(one_item(100)).unwrap();

        auth.logout().unwrap();

        assert_eq!(auth.session(), Session::Anonymous);
        assert!(auth.purchases().is_empty());
        assert!(auth.storage().get(keys::CURRENT_USER).unwrap().is_none());
        // Logging out twice is fine.
        auth.logout().unwrap();
    }

    #[test]
    fn test_anonymous_purchase_is_ignored() {
        let mut auth = store();
        assert!(auth.add_purchase(one_item(100)).unwrap().is_none());
        assert!(auth.storage().get(keys::PURCHASES).unwrap().is_none());
        assert!(auth.purchases().is_empty());
    }

    #[test]
    fn test_purchase_round_trips_through_login() {
        let mut auth = store();
        let ana = auth.register("Ana", "a@x.com", secret("pw")).unwrap();
        let recorded = auth.add_purchase(one_item(4250)).unwrap().unwrap();
        assert_eq!(recorded.user_id, ana.id);

        auth.logout().unwrap();
        auth.login("a@x.com", &secret("pw")).unwrap();

        let history = auth.purchases();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, recorded.id);
        assert_eq!(history[0].total.to_string(), "$42.50");
    }

    #[test]
    fn test_users_never_see_each_others_purchases() {
        let mut auth = store();
        auth.register("Ana", "a@x.com", secret("pw")).unwrap();
        auth.add_purchase(one_item(100)).unwrap();
        auth.add_purchase(one_item(200)).unwrap();
        auth.logout().unwrap();

        let bob = auth.register("Bob", "b@x.com", secret("pw")).unwrap();
        auth.add_purchase(one_item(300)).unwrap();
        auth.logout().unwrap();

        auth.login("b@x.com", &secret("pw")).unwrap();
        let history = auth.purchases();
        assert_eq!(history.len(), 1);
        assert!(history.iter().all(|p| p.user_id == bob.id));

        let global = PurchaseRepository::new(&mut auth.into_storage())
            .all()
            .unwrap()
            .len();
        assert_eq!(global, 3);
    }

    #[test]
    fn test_restore_trusts_pointer_by_default() {
        let mut storage = MemoryStore::new();
        let ghost = UserRecord::new(
            "Ghost".to_string(),
            Email::parse("g@x.com").unwrap(),
            secret("pw"),
        )
        .to_user();
        SessionRepository::new(&mut storage).save(&ghost).unwrap();

        let auth = AuthStore::restore(storage, SessionPolicy::Trust).unwrap();
        assert_eq!(auth.current_user(), Some(ghost));
    }

    #[test]
    fn test_restore_revalidate_drops_unknown_user() {
        let mut storage = MemoryStore::new();
        let ghost = UserRecord::new(
            "Ghost".to_string(),
            Email::parse("g@x.com").unwrap(),
            secret("pw"),
        )
        .to_user();
        SessionRepository::new(&mut storage).save(&ghost).unwrap();

        let auth = AuthStore::restore(storage, SessionPolicy::Revalidate).unwrap();
        assert_eq!(auth.session(), Session::Anonymous);
        assert!(auth.storage().get(keys::CURRENT_USER).unwrap().is_none());
    }

    #[test]
    fn test_restore_loads_session_purchases() {
        let mut auth = store();
        auth.register("Ana", "a@x.com", secret("pw")).unwrap();
        auth.add_purchase(one_item(100)).unwrap();

        let auth = AuthStore::restore(auth.into_storage(), SessionPolicy::Revalidate).unwrap();
        assert!(auth.session().is_authenticated());
        assert_eq!(auth.purchases().len(), 1);
    }

    #[test]
    fn test_corrupted_users_surface_as_storage_error() {
        let mut storage = MemoryStore::new();
        storage.set(keys::USERS, "{not json").unwrap();
        let mut auth = AuthStore::restore(storage, SessionPolicy::Trust).unwrap();

        let err = auth.login("a@x.com", &secret("pw")).unwrap_err();
        assert!(matches!(
            err,
            AuthError::Storage(StorageError::DataCorruption { .. })
        ));
    }

    #[test]
    fn test_observers_see_transitions() {
        let mut auth = store();
        let mut rx = auth.subscribe();

        auth.register("Ana", "a@x.com", secret("pw")).unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().session.is_authenticated());

        auth.logout().unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().session, Session::Anonymous);
    }
}
