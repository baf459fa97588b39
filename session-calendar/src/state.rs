use std::collections::HashMap;
use std::hash::Hash;

/// Which modal dialog, if any, is currently open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    open: Option<String>,
}

impl ModalState {
    /// Opening a modal replaces whichever one was open before.
    pub fn open<S: Into<String>>(&mut self, id: S) {
        self.open = Some(id.into());
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    /// Closes the modal only if `id` is the one currently open.
    pub fn close_if(&mut self, id: &str) -> bool {
        if self.is_open(id) {
            self.open = None;
            return true;
        }
        false
    }

    #[must_use]
    pub fn is_open(&self, id: &str) -> bool {
        self.open.as_deref() == Some(id)
    }

    #[must_use]
    pub fn open_id(&self) -> Option<&str> {
        self.open.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Idle,
    Pending,
    Confirmed,
    RolledBack,
}

#[derive(Debug, Clone, Copy, Default)]
struct Flag {
    committed: bool,
    shown: bool,
    state: SyncState,
}

/// Per-entity boolean flags updated optimistically.
///
/// The shown value changes as soon as an update begins and is reconciled
/// once the remote call reports back.
#[derive(Debug, Clone)]
pub struct OptimisticFlags<K> {
    flags: HashMap<K, Flag>,
}

impl<K> Default for OptimisticFlags<K> {
    fn default() -> Self {
        Self {
            flags: HashMap::new(),
        }
    }
}

impl<K> OptimisticFlags<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a value known to be stored remotely.
    pub fn set_committed(&mut self, key: K, value: bool) {
        self.flags.insert(
            key,
            Flag {
                committed: value,
                shown: value,
                state: SyncState::Idle,
            },
        );
    }

    /// Shows `desired` right away and marks the entity as pending.
    ///
    /// Returns false without changing anything while an earlier update for
    /// the same entity is still pending.
    pub fn begin(&mut self, key: K, desired: bool) -> bool {
        let flag = self.flags.entry(key).or_default();
        if flag.state == SyncState::Pending {
            return false;
        }

        flag.shown = desired;
        flag.state = SyncState::Pending;
        true
    }

    pub fn confirm(&mut self, key: &K) -> bool {
        match self.flags.get_mut(key) {
            Some(flag) if flag.state == SyncState::Pending => {
                flag.committed = flag.shown;
                flag.state = SyncState::Confirmed;
                true
            }
            _ => false,
        }
    }

    pub fn roll_back(&mut self, key: &K) -> bool {
        match self.flags.get_mut(key) {
            Some(flag) if flag.state == SyncState::Pending => {
                flag.shown = flag.committed;
                flag.state = SyncState::RolledBack;
                true
            }
            _ => false,
        }
    }

    /// Confirms on success, rolls back on failure.
    pub fn resolve<T, E>(&mut self, key: &K, outcome: &Result<T, E>) -> bool {
        if outcome.is_ok() {
            self.confirm(key)
        } else {
            self.roll_back(key)
        }
    }

    /// The value to display; unknown entities are unset.
    #[must_use]
    pub fn value(&self, key: &K) -> bool {
        self.flags.get(key).is_some_and(|flag| flag.shown)
    }

    #[must_use]
    pub fn state(&self, key: &K) -> SyncState {
        self.flags
            .get(key)
            .map_or(SyncState::Idle, |flag| flag.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_modal_open() {
        let mut modal = ModalState::default();
        modal.open("apply");
        modal.open("confirm-delete");

        assert!(modal.is_open("confirm-delete"));
        assert!(!modal.is_open("apply"));
        assert_eq!(modal.open_id(), Some("confirm-delete"));

        assert!(!modal.close_if("apply"));
        assert!(modal.close_if("confirm-delete"));
        assert_eq!(modal.open_id(), None);
    }

    #[test]
    fn confirmed_update_commits() {
        let mut archived = OptimisticFlags::new();
        archived.set_committed("m1", false);

        assert!(archived.begin("m1", true));
        assert!(archived.value(&"m1"));
        assert_eq!(archived.state(&"m1"), SyncState::Pending);

        assert!(archived.resolve(&"m1", &Ok::<_, ()>(())));
        assert!(archived.value(&"m1"));
        assert_eq!(archived.state(&"m1"), SyncState::Confirmed);

        // A later failure rolls back to the newly committed value.
        assert!(archived.begin("m1", false));
        assert!(archived.roll_back(&"m1"));
        assert!(archived.value(&"m1"));
    }

    #[test]
    fn failed_update_rolls_back() {
        let mut starred = OptimisticFlags::new();
        starred.set_committed(7_u32, true);

        assert!(starred.begin(7, false));
        assert!(!starred.value(&7));

        assert!(starred.resolve(&7, &Err::<(), _>("timeout")));
        assert!(starred.value(&7));
        assert_eq!(starred.state(&7), SyncState::RolledBack);
    }

    #[test]
    fn pending_update_blocks_another() {
        let mut archived = OptimisticFlags::new();

        assert!(archived.begin("m1", true));
        assert!(!archived.begin("m1", false));
        assert!(archived.value(&"m1"));
    }

    #[test]
    fn resolving_without_pending_is_ignored() {
        let mut archived = OptimisticFlags::new();
        archived.set_committed("m1", true);

        assert!(!archived.confirm(&"m1"));
        assert!(!archived.roll_back(&"m2"));
        assert_eq!(archived.state(&"m1"), SyncState::Idle);
        assert_eq!(archived.state(&"m2"), SyncState::Idle);
    }
}
