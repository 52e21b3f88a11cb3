use sqlx::SqlitePool;

use crate::services::auth_service::JwtKeys;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt: JwtKeys,
    pub moderation: ModerationPolicy,
}

/// Whether listings must be admin-approved before they show up in reads.
/// Decided once at startup; every query site consumes this switch instead of
/// re-deciding locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationPolicy {
    Moderated,
    Open,
}

impl ModerationPolicy {
    pub fn from_env(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("off") | Some("0") | Some("false") | Some("open") => ModerationPolicy::Open,
            _ => ModerationPolicy::Moderated,
        }
    }

    pub fn approved_only(self) -> bool {
        matches!(self, ModerationPolicy::Moderated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moderation_defaults_to_on() {
        assert_eq!(ModerationPolicy::from_env(None), ModerationPolicy::Moderated);
        assert_eq!(
            ModerationPolicy::from_env(Some("on")),
            ModerationPolicy::Moderated
        );
        assert_eq!(ModerationPolicy::from_env(Some("off")), ModerationPolicy::Open);
        assert_eq!(ModerationPolicy::from_env(Some("FALSE")), ModerationPolicy::Open);
    }
}
