use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use time::OffsetDateTime;

use crate::expiration::{self, ExpirationError, ResolvedExpiration};

/// Identifier of a stored ban row, kept exactly as it arrived on the wire.
///
/// Only the store adapter knows how to interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BanRowId(String);

impl BanRowId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BanRowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque secret bound to a single ban row.
#[derive(Debug)]
pub struct EditToken(SecretString);

impl EditToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(SecretString::from(raw.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Grants read and write access to exactly one ban row.
#[derive(Debug)]
pub struct EditCapability {
    pub row_id: BanRowId,
    pub token: EditToken,
}

impl EditCapability {
    pub fn new(row_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            row_id: BanRowId::new(row_id),
            token: EditToken::new(token),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRecord {
    pub channel: String,
    pub mask: String,
    pub mode: char,
    pub set_at: OffsetDateTime,
    pub set_by: String,
    pub expire_at: Option<OffsetDateTime>,
    pub reason: String,
    pub revoked_at: Option<OffsetDateTime>,
    pub revoked_by: Option<String>,
}

impl BanRecord {
    /// Mirrors the store's "active" query, which stays authoritative for the
    /// listings.
    pub fn is_active_at(&self, now: OffsetDateTime) -> bool {
        if self.revoked_at.is_some() {
            return false;
        }
        match self.expire_at {
            Some(expire_at) => expire_at > now,
            None => true,
        }
    }

    pub fn set_by_nick(&self) -> &str {
        nick_of(&self.set_by)
    }

    pub fn revoked_by_nick(&self) -> Option<&str> {
        self.revoked_by.as_deref().map(nick_of)
    }

    /// Resolves a submitted expiration for this ban.
    ///
    /// A deadline earlier than `set_at` is rejected; a deadline equal to it
    /// is allowed and leaves the ban already expired.
    pub fn resolve_expiration(
        &self,
        raw: &str,
        now: OffsetDateTime,
    ) -> Result<ResolvedExpiration, ExpirationError> {
        match expiration::resolve(raw, now)? {
            ResolvedExpiration::At(deadline) if deadline < self.set_at => {
                Err(ExpirationError::before_set_at(raw, self.set_at))
            }
            resolved => Ok(resolved),
        }
    }

    /// The record as it reads after an accepted edit.
    #[must_use]
    pub fn with_edit(self, expiration: ResolvedExpiration, reason: String) -> Self {
        Self {
            expire_at: expiration.into_deadline(),
            reason,
            ..self
        }
    }
}

/// Nick portion of a `nick!user@host` identity.
pub fn nick_of(identity: &str) -> &str {
    identity
        .split_once('!')
        .map_or(identity, |(nick, _)| nick)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BanAccessError {
    #[error("No ban matches that edit link")]
    NotFound,
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn sample_ban() -> BanRecord {
        BanRecord {
            channel: "#project".to_string(),
            mask: "$a:baduser".to_string(),
            mode: 'b',
            set_at: datetime!(2018-03-14 15:09:26 UTC),
            set_by: "someop!foo@example.org".to_string(),
            expire_at: Some(datetime!(2018-03-21 15:09:26 UTC)),
            reason: "bad behavior".to_string(),
            revoked_at: None,
            revoked_by: None,
        }
    }

    #[test]
    fn active_until_the_expiry_instant() {
        let ban = sample_ban();

        assert!(ban.is_active_at(datetime!(2018-03-15 00:00:00 UTC)));
        assert!(!ban.is_active_at(datetime!(2018-03-21 15:09:26 UTC)));
        assert!(!ban.is_active_at(datetime!(2018-04-01 00:00:00 UTC)));
    }

    #[test]
    fn permanent_ban_stays_active() {
        let ban = BanRecord {
            expire_at: None,
            ..sample_ban()
        };

        assert!(ban.is_active_at(datetime!(2099-01-01 00:00:00 UTC)));
    }

    #[test]
    fn revoked_ban_is_never_active() {
        let ban = BanRecord {
            expire_at: None,
            revoked_at: Some(datetime!(2018-03-15 00:00:00 UTC)),
            revoked_by: Some("forgivingop!bar".to_string()),
            ..sample_ban()
        };

        assert!(!ban.is_active_at(datetime!(2018-03-14 16:00:00 UTC)));
        assert_eq!(ban.revoked_by_nick(), Some("forgivingop"));
    }

    #[test]
    fn nick_is_text_before_first_bang() {
        assert_eq!(nick_of("someop!foo"), "someop");
        assert_eq!(nick_of("someop!foo!bar"), "someop");
        assert_eq!(nick_of("ChanServ"), "ChanServ");
        assert_eq!(nick_of(""), "");
        assert_eq!(sample_ban().set_by_nick(), "someop");
    }

    #[test]
    fn with_edit_replaces_expiry_and_reason_only() {
        let original = sample_ban();
        let edited = original
            .clone()
            .with_edit(ResolvedExpiration::Never, "they lost their chance".to_string());

        assert_eq!(edited.expire_at, None);
        assert_eq!(edited.reason, "they lost their chance");
        assert_eq!(edited.mask, original.mask);
        assert_eq!(edited.set_at, original.set_at);
        assert_eq!(edited.set_by, original.set_by);
    }

    #[test]
    fn expiration_before_set_at_is_rejected() {
        let ban = sample_ban();
        let now = datetime!(2018-03-15 12:00:00 UTC);

        let err = ban
            .resolve_expiration("2000-01-01T00:00:00", now)
            .expect_err("deadline precedes set_at");
        assert_eq!(err.raw(), "2000-01-01T00:00:00");
        assert_eq!(
            err.to_string(),
            "Expiration '2000-01-01T00:00:00' is before the ban was set (2018-03-14T15:09:26)"
        );

        assert_eq!(
            ban.resolve_expiration("2018-03-14T15:09:26", now),
            Ok(ResolvedExpiration::At(ban.set_at))
        );
        assert_eq!(
            ban.resolve_expiration("never", now),
            Ok(ResolvedExpiration::Never)
        );
        assert!(matches!(
            ban.resolve_expiration("soon", now),
            Err(ExpirationError::Unrecognized { .. })
        ));
    }

    #[test]
    fn capability_debug_hides_token() {
        let capability = EditCapability::new("5", "deadbeef");
        let rendered = format!("{capability:?}");

        assert!(rendered.contains('5'));
        assert!(!rendered.contains("deadbeef"));
        assert_eq!(capability.token.expose(), "deadbeef");
    }
}
