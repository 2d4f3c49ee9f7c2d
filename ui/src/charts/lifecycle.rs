//! Per-slot lifecycle.
//!
//! ```text
//! Absent → Building → Live → (Updating → Live)* → Disposed
//!                       Live → Disposed → Building      (full rebuild)
//!          Building → Absent                            (construction failed)
//! ```

use super::Slot;
use crate::core::error::ChartError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    #[default]
    Absent,
    Building,
    Live,
    Updating,
    Disposed,
}

impl SlotState {
    pub fn can_become(self, next: SlotState) -> bool {
        use SlotState::*;
        matches!(
            (self, next),
            (Absent | Disposed, Building)
                | (Building, Live | Absent)
                | (Live, Updating | Disposed)
                | (Updating, Live)
        )
    }

    pub fn transition(self, slot: Slot, next: SlotState) -> Result<SlotState, ChartError> {
        if self.can_become(next) {
            Ok(next)
        } else {
            Err(ChartError::InvalidTransition {
                slot,
                from: self,
                to: next,
            })
        }
    }

    pub fn is_live(self) -> bool {
        self == SlotState::Live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SlotState::*;

    #[test]
    fn happy_path() {
        let slot = Slot::Uptime;
        let mut state = Absent;
        for next in [Building, Live, Updating, Live, Disposed, Building, Live] {
            state = state.transition(slot, next).unwrap();
        }
        assert!(state.is_live());
    }

    #[test]
    fn rejects_shortcuts() {
        assert!(!Absent.can_become(Live));
        assert!(!Live.can_become(Building));
        assert!(!Updating.can_become(Disposed));
        assert!(!Disposed.can_become(Live));
        assert_eq!(
            Absent.transition(Slot::Errors, Updating),
            Err(ChartError::InvalidTransition {
                slot: Slot::Errors,
                from: Absent,
                to: Updating
            })
        );
    }

    #[test]
    fn failed_build_returns_to_absent() {
        assert_eq!(Building.transition(Slot::Uptime, Absent), Ok(Absent));
    }
}
