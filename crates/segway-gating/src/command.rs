//! Ride command bytes from the serial link.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A decoded ride command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RideCommand {
    /// Authorize riding (`'G'`).
    Go,
    /// Request a stop (`'S'`).
    Stop,
}

impl RideCommand {
    /// Wire byte for [`RideCommand::Go`].
    pub const GO_BYTE: u8 = 0x47;
    /// Wire byte for [`RideCommand::Stop`].
    pub const STOP_BYTE: u8 = 0x53;

    /// Decode a command byte. Every other value is a no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// use segway_gating::command::RideCommand;
    ///
    /// assert_eq!(RideCommand::from_byte(b'G'), Some(RideCommand::Go));
    /// assert_eq!(RideCommand::from_byte(b'S'), Some(RideCommand::Stop));
    /// assert_eq!(RideCommand::from_byte(b'g'), None);
    /// ```
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            Self::GO_BYTE => Some(Self::Go),
            Self::STOP_BYTE => Some(Self::Stop),
            _ => None,
        }
    }

    /// Wire byte for this command.
    #[must_use]
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Go => Self::GO_BYTE,
            Self::Stop => Self::STOP_BYTE,
        }
    }

    /// Get the command as a string slice.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Go => "go",
            Self::Stop => "stop",
        }
    }
}

impl core::fmt::Display for RideCommand {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_two_bytes_decode() {
        let decoded: Vec<u8> = (0..=u8::MAX)
            .filter(|b| RideCommand::from_byte(*b).is_some())
            .collect();
        assert_eq!(decoded, vec![0x47, 0x53]);
    }

    #[test]
    fn test_byte_round_trip() {
        for cmd in [RideCommand::Go, RideCommand::Stop] {
            assert_eq!(RideCommand::from_byte(cmd.to_byte()), Some(cmd));
        }
    }
}
