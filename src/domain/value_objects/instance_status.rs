//! Rental status of a vehicle instance

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InstanceStatus {
    Available,
    Loaned,
    Reserved,
    /// New instances start out of service until someone marks them otherwise.
    #[default]
    Maintenance,
}

impl InstanceStatus {
    pub const ALL: [InstanceStatus; 4] = [
        InstanceStatus::Available,
        InstanceStatus::Loaned,
        InstanceStatus::Reserved,
        InstanceStatus::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Available => "Available",
            InstanceStatus::Loaned => "Loaned",
            InstanceStatus::Reserved => "Reserved",
            InstanceStatus::Maintenance => "Maintenance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for InstanceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_maintenance() {
        assert_eq!(InstanceStatus::default(), InstanceStatus::Maintenance);
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!("Loaned".parse::<InstanceStatus>(), Ok(InstanceStatus::Loaned));
        assert!("loaned".parse::<InstanceStatus>().is_err());
    }
}
