//! Resource status model
//!
//! Status is owned by the server: it is assigned on create and advanced by
//! server-side effects or lifecycle operations, never by a generic update.
//! The transition tables here mirror the server so callers can reason about
//! what they observe.

use std::fmt;

/// Lifecycle state machine of one resource kind.
pub trait Lifecycle: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// State assigned by the server on create.
    const INITIAL: Self;

    /// Every state of the machine.
    const ALL: &'static [Self];

    /// Wire value, lowercase.
    fn as_str(self) -> &'static str;

    /// True if the server may move a resource from `self` to `to`.
    /// Staying in the same state is not a transition.
    fn can_transition(self, to: Self) -> bool;

    /// True once the resource is usable.
    fn is_operational(self) -> bool;

    /// States reachable in a single transition.
    fn successors(self) -> Vec<Self> {
        Self::ALL
            .iter()
            .copied()
            .filter(|next| self.can_transition(*next))
            .collect()
    }
}

/// Count resources per status, in state-machine order. Zero counts are kept.
pub fn count_by_status<S: Lifecycle>(statuses: impl IntoIterator<Item = S>) -> Vec<(S, usize)> {
    let mut counts: Vec<(S, usize)> = S::ALL.iter().map(|s| (*s, 0)).collect();
    for status in statuses {
        if let Some(entry) = counts.iter_mut().find(|(s, _)| *s == status) {
            entry.1 += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConnectionStatus, DatalakeStatus, HostingEnvironmentStatus, SourceAppStatus};

    #[test]
    fn test_hosting_environment_machine() {
        use HostingEnvironmentStatus::*;

        assert_eq!(HostingEnvironmentStatus::INITIAL, Pending);
        assert!(Pending.can_transition(Connected));
        assert!(Connected.can_transition(Disconnected));
        assert!(Disconnected.can_transition(Connected));
        assert!(!Connected.can_transition(Pending));
        assert!(!Pending.can_transition(Pending));
        assert!(Connected.is_operational());
        assert!(!Pending.is_operational());
    }

    #[test]
    fn test_datalake_machine() {
        use DatalakeStatus::*;

        assert_eq!(DatalakeStatus::INITIAL, Pending);
        assert_eq!(Pending.successors(), vec![Deployed, Failed]);
        assert_eq!(Deployed.successors(), vec![Ready, Failed]);
        assert!(Ready.successors().is_empty());
        assert!(Failed.successors().is_empty());
        assert!(Ready.is_operational());
    }

    #[test]
    fn test_source_app_machine() {
        use SourceAppStatus::*;

        assert_eq!(SourceAppStatus::INITIAL, Pending);
        assert!(Pending.can_transition(Deployed));
        assert!(Deployed.can_transition(Connected));
        assert!(!Pending.can_transition(Connected));
        assert!(Connected.can_transition(Disconnected));
        assert!(Disconnected.can_transition(Connected));
    }

    #[test]
    fn test_connection_machine() {
        use ConnectionStatus::*;

        assert_eq!(ConnectionStatus::INITIAL, Disconnected);
        assert_eq!(Disconnected.successors(), vec![Connected]);
        assert_eq!(Connected.successors(), vec![Disconnected]);
    }

    #[test]
    fn test_pending_is_never_reentered() {
        fn check<S: Lifecycle>() {
            for state in S::ALL {
                assert!(!state.can_transition(S::INITIAL), "{} -> {}", state, S::INITIAL);
            }
        }
        check::<HostingEnvironmentStatus>();
        check::<DatalakeStatus>();
        check::<SourceAppStatus>();
    }

    #[test]
    fn test_count_by_status() {
        use DatalakeStatus::*;

        let counts = count_by_status([Ready, Pending, Ready]);
        assert_eq!(
            counts,
            vec![(Pending, 1), (Deployed, 0), (Ready, 2), (Failed, 0)]
        );
    }
}
