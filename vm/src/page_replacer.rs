use std::{fmt, str::FromStr};

use crate::error::VmError;

/// Which frame gets evicted when a page fault finds no free slot.
///
/// Fixed when the MMU is built. Victim selection itself lives in
/// [`FrameTable::select_victim`](crate::frame_table::FrameTable::select_victim),
/// as a function of this tag plus the frame state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReplacementPolicy {
    /// Least recently used: the frame with the oldest access timestamp.
    #[default]
    Lru,
    /// First in, first out: a ring cursor over frame indices.
    Fifo,
}

impl ReplacementPolicy {
    pub fn name(self) -> &'static str {
        match self {
            ReplacementPolicy::Lru => "LRU",
            ReplacementPolicy::Fifo => "FIFO",
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReplacementPolicy {
    type Err = VmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(ReplacementPolicy::Lru),
            "fifo" => Ok(ReplacementPolicy::Fifo),
            _ => Err(VmError::UnsupportedPolicy(s.to_string())),
        }
    }
}

/// Legacy numeric tags: 0 = LRU, 1 = FIFO.
impl TryFrom<u8> for ReplacementPolicy {
    type Error = VmError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(ReplacementPolicy::Lru),
            1 => Ok(ReplacementPolicy::Fifo),
            other => Err(VmError::UnsupportedPolicy(format!("tag {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("lru".parse::<ReplacementPolicy>().unwrap(), ReplacementPolicy::Lru);
        assert_eq!(" FIFO ".parse::<ReplacementPolicy>().unwrap(), ReplacementPolicy::Fifo);
    }

    #[test]
    fn rejects_unknown_policies() {
        let err = "clock".parse::<ReplacementPolicy>().unwrap_err();
        assert!(matches!(err, VmError::UnsupportedPolicy(ref name) if name == "clock"));
        assert!(err.is_defect());
    }

    #[test]
    fn maps_legacy_tags() {
        assert_eq!(ReplacementPolicy::try_from(0).unwrap(), ReplacementPolicy::Lru);
        assert_eq!(ReplacementPolicy::try_from(1).unwrap(), ReplacementPolicy::Fifo);
        assert!(ReplacementPolicy::try_from(2).is_err());
    }

    #[test]
    fn defaults_to_lru() {
        assert_eq!(ReplacementPolicy::default(), ReplacementPolicy::Lru);
        assert_eq!(ReplacementPolicy::Fifo.to_string(), "FIFO");
    }
}
