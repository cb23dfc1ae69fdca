//! Alert condition flag sets.

use bitflags::bitflags;
use par_mux_config::AlertKind;

bitflags! {
    /// A set of alert kinds.
    ///
    /// Used for a window's pending condition bits and for a link's
    /// "already delivered" bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AlertFlags: u8 {
        const BELL     = 0b001;
        const ACTIVITY = 0b010;
        const SILENCE  = 0b100;
    }
}

impl AlertFlags {
    /// Iterate the kinds in this set, in evaluation order
    pub fn kinds(self) -> impl Iterator<Item = AlertKind> {
        AlertKind::all()
            .iter()
            .copied()
            .filter(move |kind| self.contains(AlertFlags::from(*kind)))
    }
}

impl From<AlertKind> for AlertFlags {
    fn from(kind: AlertKind) -> Self {
        match kind {
            AlertKind::Bell => AlertFlags::BELL,
            AlertKind::Activity => AlertFlags::ACTIVITY,
            AlertKind::Silence => AlertFlags::SILENCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_iterates_in_order() {
        let flags = AlertFlags::SILENCE | AlertFlags::BELL;
        let kinds: Vec<_> = flags.kinds().collect();
        assert_eq!(kinds, vec![AlertKind::Bell, AlertKind::Silence]);
        assert_eq!(AlertFlags::empty().kinds().count(), 0);
    }
}
