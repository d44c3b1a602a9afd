//! Per-operator conversation state.
//!
//! The map is the only long-lived shared mutable resource in the process.
//! The mutex is held only around in-memory transitions; store and SSH I/O
//! always happen after the lock is released, so operators never block each
//! other on network calls.

use std::collections::HashMap;
use std::sync::Mutex;

/// Pending intent set by a `find_*`/`verify_password` command and resolved
/// by confirm, cancel, or (for passwords) the next text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    AwaitingEmail,
    AwaitingPhone,
    AwaitingPassword,
}

/// State for one operator. Absence of an entry means Idle. `staged` is
/// non-empty only while an intent is pending.
#[derive(Debug, Clone)]
pub struct OperatorSession {
    pub intent: Intent,
    pub staged: Vec<String>,
}

#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<i64, OperatorSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a fresh intent. Any prior pending batch for this operator is
    /// discarded without being persisted (implicit cancel).
    pub fn set_intent(&self, operator: i64, intent: Intent) {
        let mut map = self.inner.lock().expect("session map poisoned");
        map.insert(
            operator,
            OperatorSession {
                intent,
                staged: Vec::new(),
            },
        );
    }

    pub fn intent(&self, operator: i64) -> Option<Intent> {
        let map = self.inner.lock().expect("session map poisoned");
        map.get(&operator).map(|session| session.intent)
    }

    /// Replaces the staged batch, but only while the given intent is still
    /// the pending one. Returns false when the state moved on in between.
    pub fn stage(&self, operator: i64, intent: Intent, values: Vec<String>) -> bool {
        let mut map = self.inner.lock().expect("session map poisoned");
        match map.get_mut(&operator) {
            Some(session) if session.intent == intent => {
                session.staged = values;
                true
            }
            _ => false,
        }
    }

    /// Removes the session and returns it, resetting the operator to Idle.
    pub fn take(&self, operator: i64) -> Option<OperatorSession> {
        let mut map = self.inner.lock().expect("session map poisoned");
        map.remove(&operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_until_first_intent() {
        let store = SessionStore::new();
        assert_eq!(store.intent(7), None);
        store.set_intent(7, Intent::AwaitingEmail);
        assert_eq!(store.intent(7), Some(Intent::AwaitingEmail));
    }

    #[test]
    fn new_intent_discards_prior_staged_batch() {
        let store = SessionStore::new();
        store.set_intent(7, Intent::AwaitingEmail);
        assert!(store.stage(7, Intent::AwaitingEmail, vec!["a@b.com".to_string()]));
        store.set_intent(7, Intent::AwaitingPhone);
        let session = store.take(7).expect("session present");
        assert_eq!(session.intent, Intent::AwaitingPhone);
        assert!(session.staged.is_empty());
    }

    #[test]
    fn stage_refuses_stale_intent() {
        let store = SessionStore::new();
        store.set_intent(7, Intent::AwaitingPhone);
        assert!(!store.stage(7, Intent::AwaitingEmail, vec!["a@b.com".to_string()]));
        assert!(!store.stage(8, Intent::AwaitingEmail, vec!["a@b.com".to_string()]));
    }

    #[test]
    fn take_resets_to_idle() {
        let store = SessionStore::new();
        store.set_intent(7, Intent::AwaitingEmail);
        assert!(store.take(7).is_some());
        assert_eq!(store.intent(7), None);
        assert!(store.take(7).is_none());
    }

    #[test]
    fn operators_are_independent() {
        let store = SessionStore::new();
        store.set_intent(1, Intent::AwaitingEmail);
        store.set_intent(2, Intent::AwaitingPhone);
        assert!(store.stage(1, Intent::AwaitingEmail, vec!["a@b.com".to_string()]));
        assert_eq!(store.intent(2), Some(Intent::AwaitingPhone));
        let first = store.take(1).expect("first operator session");
        assert_eq!(first.staged, vec!["a@b.com".to_string()]);
        assert_eq!(store.intent(2), Some(Intent::AwaitingPhone));
    }
}
