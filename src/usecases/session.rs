//! Session lifecycle: restore on startup, login, register, logout.
//!
//! The credential and identity are process-wide state with one owner. Every
//! component reads them through `SessionHandle`; only the workflows in this
//! module and the transport's unauthorized interceptor may write them.

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::{
    domain::{
        events::{SessionEvent, Subscribers},
        identity::Identity,
    },
    infra::{config::SessionConfig, error::AppError, secrets::mask_token, token_store::TokenStore},
};

/// Marker credential for an unverified offline session. Never persisted.
pub const OFFLINE_DEMO_TOKEN: &str = "offline-demo";

#[derive(Debug, Default)]
struct SessionRecord {
    credential: Option<String>,
    identity: Option<Identity>,
    degraded: bool,
}

struct SessionCell {
    record: Mutex<SessionRecord>,
    subscribers: Mutex<Subscribers<SessionEvent>>,
    store: TokenStore,
}

/// Shared view of the live session. Cloning is cheap; all clones observe
/// the same state. Invariant: an identity is never live without a
/// credential.
#[derive(Clone)]
pub struct SessionHandle {
    cell: Arc<SessionCell>,
}

impl SessionHandle {
    pub fn new(store: TokenStore) -> Self {
        Self {
            cell: Arc::new(SessionCell {
                record: Mutex::new(SessionRecord::default()),
                subscribers: Mutex::new(Subscribers::default()),
                store,
            }),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.record().identity.clone()
    }

    pub fn credential(&self) -> Option<String> {
        self.record().credential.clone()
    }

    /// Whether a session is active, derived from the live identity.
    pub fn is_active(&self) -> bool {
        self.record().identity.is_some()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_degraded(&self) -> bool {
        self.record().degraded
    }

    pub fn subscribe(&self, listener: impl Fn(&SessionEvent) + 'static) {
        self.cell
            .subscribers
            .lock()
            .expect("session subscribers lock should not be poisoned")
            .subscribe(listener);
    }

    pub(crate) fn store(&self) -> &TokenStore {
        &self.cell.store
    }

    /// Persists the token and makes the verified identity live.
    pub(crate) fn establish_verified(
        &self,
        token: String,
        identity: Identity,
    ) -> Result<(), AppError> {
        self.cell.store.save(&token)?;
        tracing::debug!(token = %mask_token(&token), "credential persisted");

        {
            let mut record = self.record();
            record.credential = Some(token);
            record.identity = Some(identity);
            record.degraded = false;
        }
        self.emit(&SessionEvent::Established { degraded: false });

        Ok(())
    }

    /// Makes an unverified offline identity live, in memory only.
    pub(crate) fn establish_degraded(&self, identity: Identity) {
        {
            let mut record = self.record();
            record.credential = Some(OFFLINE_DEMO_TOKEN.to_owned());
            record.identity = Some(identity);
            record.degraded = true;
        }
        self.emit(&SessionEvent::Established { degraded: true });
    }

    /// Attaches a stored credential ahead of the restore probe. No identity
    /// is live yet, so no event fires.
    pub(crate) fn attach_credential(&self, token: String) {
        self.record().credential = Some(token);
    }

    /// Completes a restore: the attached credential was accepted.
    pub(crate) fn adopt_identity(&self, identity: Identity) {
        {
            let mut record = self.record();
            record.identity = Some(identity);
            record.degraded = false;
        }
        self.emit(&SessionEvent::Established { degraded: false });
    }

    /// Ends the session on user request. Idempotent; returns whether a
    /// persisted token existed.
    pub(crate) fn clear(&self) -> Result<bool, AppError> {
        let was_live = self.reset_record();
        let token_removed = self.cell.store.clear()?;

        if was_live {
            self.emit(&SessionEvent::LoggedOut);
        }

        Ok(token_removed)
    }

    /// Tears the session down after the backend rejected the credential.
    /// Disk cleanup is best-effort: the teardown itself must not fail.
    pub(crate) fn expire(&self) {
        let was_live = self.reset_record();

        if let Err(error) = self.cell.store.clear() {
            tracing::warn!(error = %error, "failed to remove token file during teardown");
        }

        if was_live {
            self.emit(&SessionEvent::Expired);
        }
    }

    fn record(&self) -> MutexGuard<'_, SessionRecord> {
        self.cell
            .record
            .lock()
            .expect("session record lock should not be poisoned")
    }

    fn reset_record(&self) -> bool {
        let mut record = self.record();
        let was_live = record.credential.is_some() || record.identity.is_some();
        *record = SessionRecord::default();
        was_live
    }

    fn emit(&self, event: &SessionEvent) {
        self.cell
            .subscribers
            .lock()
            .expect("session subscribers lock should not be poisoned")
            .emit(event);
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let record = self.record();
        f.debug_struct("SessionHandle")
            .field("active", &record.identity.is_some())
            .field("degraded", &record.degraded)
            .finish()
    }
}

/// Errors reported by the remote authenticator, as seen at the source level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSourceError {
    /// The backend rejected the credential or the password.
    Unauthorized,
    /// The backend could not be reached at all.
    Unreachable { message: String },
    /// The backend refused the request for another reason.
    Rejected { detail: String },
}

/// A successful authentication: the bearer token plus the identity it is
/// bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub identity: Identity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationProfile {
    pub email: String,
    pub username: String,
    pub password: String,
    pub full_name: String,
}

impl RegistrationProfile {
    /// Mirrors the backend's registration rules so a doomed request fails
    /// before any network traffic.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.email.contains('@') {
            issues.push("a valid email is required".to_owned());
        }
        if self.username.chars().count() < 3 {
            issues.push("username must be at least 3 characters".to_owned());
        }
        if self.password.chars().count() < 8 {
            issues.push("password must be at least 8 characters".to_owned());
        }
        if self.full_name.trim().is_empty() {
            issues.push("full name is required".to_owned());
        }

        issues
    }
}

pub trait AuthGateway {
    fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthSourceError>;
    fn register(&self, profile: &RegistrationProfile) -> Result<AuthSession, AuthSourceError>;
    fn current_identity(&self) -> Result<Identity, AuthSourceError>;
}

impl<T: AuthGateway + ?Sized> AuthGateway for &T {
    fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthSourceError> {
        (*self).login(email, password)
    }

    fn register(&self, profile: &RegistrationProfile) -> Result<AuthSession, AuthSourceError> {
        (*self).register(profile)
    }

    fn current_identity(&self) -> Result<Identity, AuthSourceError> {
        (*self).current_identity()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("authentication service is unreachable: {message}")]
    Unreachable { message: String },
    #[error("request rejected: {detail}")]
    Rejected { detail: String },
    #[error("profile is invalid: {}", issues.join("; "))]
    InvalidProfile { issues: Vec<String> },
    #[error("session storage failed: {message}")]
    Storage { message: String },
}

/// How an identity became live: confirmed by the backend, or fabricated
/// locally because the backend was unreachable. The two are never conflated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Verified(Identity),
    Degraded(Identity),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// No stored credential; nothing was fetched.
    Anonymous,
    /// The stored credential was accepted and the identity is live.
    Restored(Identity),
    /// A stored credential existed but was rejected or unverifiable; it was
    /// cleared together with any partial state.
    Invalidated,
}

/// Restores the session at process start. With no stored credential this
/// never touches the network.
pub fn restore_session(
    gateway: &dyn AuthGateway,
    session: &SessionHandle,
) -> Result<RestoreOutcome, AppError> {
    let Some(token) = session.store().load()? else {
        return Ok(RestoreOutcome::Anonymous);
    };

    session.attach_credential(token);

    match gateway.current_identity() {
        Ok(identity) => {
            session.adopt_identity(identity.clone());
            Ok(RestoreOutcome::Restored(identity))
        }
        Err(error) => {
            tracing::warn!(error = ?error, "stored session rejected during restore");
            session.expire();
            Ok(RestoreOutcome::Invalidated)
        }
    }
}

pub fn login(
    gateway: &dyn AuthGateway,
    session: &SessionHandle,
    config: &SessionConfig,
    email: &str,
    password: &str,
) -> Result<SessionOutcome, AuthError> {
    let email = email.trim();

    match gateway.login(email, password) {
        Ok(auth) => establish(session, auth),
        Err(AuthSourceError::Unauthorized) => Err(AuthError::InvalidCredentials),
        Err(AuthSourceError::Rejected { detail }) => Err(AuthError::Rejected { detail }),
        Err(AuthSourceError::Unreachable { message }) => {
            degraded_fallback(session, config, message, || demo_identity_for_login(email))
        }
    }
}

pub fn register(
    gateway: &dyn AuthGateway,
    session: &SessionHandle,
    config: &SessionConfig,
    profile: &RegistrationProfile,
) -> Result<SessionOutcome, AuthError> {
    let issues = profile.validate();
    if !issues.is_empty() {
        return Err(AuthError::InvalidProfile { issues });
    }

    match gateway.register(profile) {
        Ok(auth) => establish(session, auth),
        Err(AuthSourceError::Unauthorized) => Err(AuthError::InvalidCredentials),
        Err(AuthSourceError::Rejected { detail }) => Err(AuthError::Rejected { detail }),
        Err(AuthSourceError::Unreachable { message }) => {
            degraded_fallback(session, config, message, || {
                demo_identity_for_register(profile)
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub token_removed: bool,
}

/// Ends the session unconditionally. Safe to call while anonymous.
pub fn logout(session: &SessionHandle) -> Result<LogoutOutcome, AppError> {
    let token_removed = session.clear()?;
    Ok(LogoutOutcome { token_removed })
}

fn establish(session: &SessionHandle, auth: AuthSession) -> Result<SessionOutcome, AuthError> {
    session
        .establish_verified(auth.token, auth.identity.clone())
        .map_err(|error| AuthError::Storage {
            message: error.to_string(),
        })?;

    Ok(SessionOutcome::Verified(auth.identity))
}

fn degraded_fallback(
    session: &SessionHandle,
    config: &SessionConfig,
    message: String,
    identity: impl FnOnce() -> Identity,
) -> Result<SessionOutcome, AuthError> {
    if !config.allow_offline_demo {
        return Err(AuthError::Unreachable { message });
    }

    tracing::warn!(
        reason = %message,
        "auth service unreachable, entering unverified offline session"
    );

    let identity = identity();
    session.establish_degraded(identity.clone());
    Ok(SessionOutcome::Degraded(identity))
}

fn demo_identity_for_login(email: &str) -> Identity {
    Identity {
        id: 0,
        username: "demo-user".to_owned(),
        email: if email.is_empty() {
            "demo@example.com".to_owned()
        } else {
            email.to_owned()
        },
        full_name: "Demo User".to_owned(),
    }
}

fn demo_identity_for_register(profile: &RegistrationProfile) -> Identity {
    Identity {
        id: 0,
        username: profile.username.clone(),
        email: profile.email.clone(),
        full_name: profile.full_name.clone(),
    }
}
