use time::OffsetDateTime;

use domain::{
    ban::BanRecord,
    expiration::{ResolvedExpiration, format_instant},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanListKind {
    Active,
    RecentlyExpired,
    All,
}

impl BanListKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Active => "Active bans",
            Self::RecentlyExpired => "Recently expired bans",
            Self::All => "All bans",
        }
    }
}

/// One listing row. Identities are reduced to the nick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanSummary {
    pub channel: String,
    pub mask: String,
    pub mode: char,
    pub set_at: String,
    pub set_by: String,
    pub expire_at: String,
    pub reason: String,
    pub revoked_at: Option<String>,
    pub revoked_by: Option<String>,
}

impl From<BanRecord> for BanSummary {
    fn from(ban: BanRecord) -> Self {
        let set_by = ban.set_by_nick().to_string();
        let revoked_by = ban.revoked_by_nick().map(str::to_string);

        Self {
            channel: ban.channel,
            mask: ban.mask,
            mode: ban.mode,
            set_at: format_instant(ban.set_at),
            set_by,
            expire_at: ResolvedExpiration::from_deadline(ban.expire_at).to_string(),
            reason: ban.reason,
            revoked_at: ban.revoked_at.map(format_instant),
            revoked_by,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanListView {
    pub kind: BanListKind,
    pub bans: Vec<BanSummary>,
}

impl BanListView {
    pub fn new(kind: BanListKind, bans: Vec<BanRecord>) -> Self {
        Self {
            kind,
            bans: bans.into_iter().map(BanSummary::from).collect(),
        }
    }
}

/// Raw form fields, untouched until the expiration resolver sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanEditSubmission {
    pub expire_at: String,
    pub reason: String,
}

/// Stored state of the ban shown on the edit page, with full identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanDetails {
    pub channel: String,
    pub mask: String,
    pub mode: char,
    pub set_at: String,
    pub set_by: String,
    pub expire_at: String,
    pub reason: String,
    pub revoked_at: Option<String>,
    pub revoked_by: Option<String>,
}

impl From<&BanRecord> for BanDetails {
    fn from(ban: &BanRecord) -> Self {
        Self {
            channel: ban.channel.clone(),
            mask: ban.mask.clone(),
            mode: ban.mode,
            set_at: format_instant(ban.set_at),
            set_by: ban.set_by.clone(),
            expire_at: editable_expiration(ban.expire_at),
            reason: ban.reason.clone(),
            revoked_at: ban.revoked_at.map(format_instant),
            revoked_by: ban.revoked_by.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanEditFormValues {
    pub expire_at: String,
    pub reason: String,
}

impl From<&BanRecord> for BanEditFormValues {
    fn from(ban: &BanRecord) -> Self {
        Self {
            expire_at: editable_expiration(ban.expire_at),
            reason: ban.reason.clone(),
        }
    }
}

impl From<BanEditSubmission> for BanEditFormValues {
    fn from(submission: BanEditSubmission) -> Self {
        Self {
            expire_at: submission.expire_at,
            reason: submission.reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditStatus {
    Unchanged,
    Saved,
    Rejected { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanEditView {
    pub details: BanDetails,
    pub form: BanEditFormValues,
    pub status: EditStatus,
}

impl BanEditView {
    pub fn unchanged(ban: &BanRecord) -> Self {
        Self {
            details: BanDetails::from(ban),
            form: BanEditFormValues::from(ban),
            status: EditStatus::Unchanged,
        }
    }

    pub fn saved(ban: &BanRecord) -> Self {
        Self {
            status: EditStatus::Saved,
            ..Self::unchanged(ban)
        }
    }

    /// Stored values stay on display next to the attempted input.
    pub fn rejected(ban: &BanRecord, submission: BanEditSubmission, message: String) -> Self {
        Self {
            details: BanDetails::from(ban),
            form: BanEditFormValues::from(submission),
            status: EditStatus::Rejected { message },
        }
    }

    pub fn is_saved(&self) -> bool {
        self.status == EditStatus::Saved
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            EditStatus::Rejected { message } => Some(message),
            EditStatus::Unchanged | EditStatus::Saved => None,
        }
    }
}

fn editable_expiration(expire_at: Option<OffsetDateTime>) -> String {
    ResolvedExpiration::from_deadline(expire_at).to_string()
}
