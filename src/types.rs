//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// IP protocol version used for echo probes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpVersion {
    /// IPv4 echo probes
    V4,
    /// IPv6 echo probes
    V6,
}

impl IpVersion {
    /// Get a human-readable name for this IP version
    pub fn name(&self) -> &'static str {
        match self {
            IpVersion::V4 => "IPv4",
            IpVersion::V6 => "IPv6",
        }
    }
}

impl Default for IpVersion {
    fn default() -> Self {
        IpVersion::V4
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IpVersion {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "v4" | "4" | "ipv4" => Ok(IpVersion::V4),
            "v6" | "6" | "ipv6" => Ok(IpVersion::V6),
            _ => Err(AppError::parse(format!("Invalid IP version: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_version_parsing() {
        assert_eq!(IpVersion::from_str("v4").unwrap(), IpVersion::V4);
        assert_eq!(IpVersion::from_str("IPv6").unwrap(), IpVersion::V6);
        assert_eq!(IpVersion::from_str("6").unwrap(), IpVersion::V6);
        assert!(IpVersion::from_str("v5").is_err());
    }

    #[test]
    fn test_ip_version_display() {
        assert_eq!(IpVersion::V4.to_string(), "IPv4");
        assert_eq!(IpVersion::V6.to_string(), "IPv6");
    }

    #[test]
    fn test_ip_version_default() {
        assert_eq!(IpVersion::default(), IpVersion::V4);
    }
}
