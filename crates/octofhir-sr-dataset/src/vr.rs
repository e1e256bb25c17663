//! Value representations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// DICOM value representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum Vr {
    AE,
    AS,
    AT,
    CS,
    DA,
    DS,
    DT,
    FD,
    FL,
    IS,
    LO,
    LT,
    OB,
    OD,
    OF,
    OL,
    OV,
    OW,
    PN,
    SH,
    SL,
    SQ,
    SS,
    ST,
    SV,
    TM,
    UC,
    UI,
    UL,
    UN,
    UR,
    US,
    UT,
    UV,
}

impl Vr {
    /// The two-letter VR name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Vr::AE => "AE",
            Vr::AS => "AS",
            Vr::AT => "AT",
            Vr::CS => "CS",
            Vr::DA => "DA",
            Vr::DS => "DS",
            Vr::DT => "DT",
            Vr::FD => "FD",
            Vr::FL => "FL",
            Vr::IS => "IS",
            Vr::LO => "LO",
            Vr::LT => "LT",
            Vr::OB => "OB",
            Vr::OD => "OD",
            Vr::OF => "OF",
            Vr::OL => "OL",
            Vr::OV => "OV",
            Vr::OW => "OW",
            Vr::PN => "PN",
            Vr::SH => "SH",
            Vr::SL => "SL",
            Vr::SQ => "SQ",
            Vr::SS => "SS",
            Vr::ST => "ST",
            Vr::SV => "SV",
            Vr::TM => "TM",
            Vr::UC => "UC",
            Vr::UI => "UI",
            Vr::UL => "UL",
            Vr::UN => "UN",
            Vr::UR => "UR",
            Vr::US => "US",
            Vr::UT => "UT",
            Vr::UV => "UV",
        }
    }

    /// Check if values of this VR are character strings
    pub const fn is_string(&self) -> bool {
        matches!(
            self,
            Vr::AE
                | Vr::AS
                | Vr::CS
                | Vr::DA
                | Vr::DS
                | Vr::DT
                | Vr::IS
                | Vr::LO
                | Vr::LT
                | Vr::PN
                | Vr::SH
                | Vr::ST
                | Vr::TM
                | Vr::UC
                | Vr::UI
                | Vr::UR
                | Vr::UT
        )
    }

    /// Check if values of this VR are opaque bytes
    pub const fn is_binary(&self) -> bool {
        matches!(
            self,
            Vr::OB | Vr::OD | Vr::OF | Vr::OL | Vr::OV | Vr::OW | Vr::UN
        )
    }

    /// Check if this VR allows multiple backslash-separated values
    pub const fn is_multi_valued(&self) -> bool {
        self.is_string() && !matches!(self, Vr::LT | Vr::ST | Vr::UT | Vr::UR)
    }

    /// Byte used to pad values to even length
    pub const fn padding(&self) -> u8 {
        match self {
            Vr::UI | Vr::OB | Vr::UN => 0x00,
            _ if self.is_string() => b' ',
            _ => 0x00,
        }
    }

    /// Check if the explicit VR header uses a 4-byte length field
    pub const fn has_long_length(&self) -> bool {
        matches!(
            self,
            Vr::OB
                | Vr::OD
                | Vr::OF
                | Vr::OL
                | Vr::OV
                | Vr::OW
                | Vr::SQ
                | Vr::SV
                | Vr::UC
                | Vr::UN
                | Vr::UR
                | Vr::UT
                | Vr::UV
        )
    }

    /// Maximum length in bytes of a single value, when the VR restricts it
    pub const fn max_value_length(&self) -> Option<usize> {
        match self {
            Vr::AE => Some(16),
            Vr::AS => Some(4),
            Vr::CS => Some(16),
            Vr::DA => Some(8),
            Vr::DS => Some(16),
            Vr::DT => Some(26),
            Vr::IS => Some(12),
            Vr::LO => Some(64),
            Vr::LT => Some(10240),
            Vr::SH => Some(16),
            Vr::ST => Some(1024),
            Vr::TM => Some(14),
            Vr::UI => Some(64),
            _ => None,
        }
    }
}

impl fmt::Display for Vr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vr = match s {
            "AE" => Vr::AE,
            "AS" => Vr::AS,
            "AT" => Vr::AT,
            "CS" => Vr::CS,
            "DA" => Vr::DA,
            "DS" => Vr::DS,
            "DT" => Vr::DT,
            "FD" => Vr::FD,
            "FL" => Vr::FL,
            "IS" => Vr::IS,
            "LO" => Vr::LO,
            "LT" => Vr::LT,
            "OB" => Vr::OB,
            "OD" => Vr::OD,
            "OF" => Vr::OF,
            "OL" => Vr::OL,
            "OV" => Vr::OV,
            "OW" => Vr::OW,
            "PN" => Vr::PN,
            "SH" => Vr::SH,
            "SL" => Vr::SL,
            "SQ" => Vr::SQ,
            "SS" => Vr::SS,
            "ST" => Vr::ST,
            "SV" => Vr::SV,
            "TM" => Vr::TM,
            "UC" => Vr::UC,
            "UI" => Vr::UI,
            "UL" => Vr::UL,
            "UN" => Vr::UN,
            "UR" => Vr::UR,
            "US" => Vr::US,
            "UT" => Vr::UT,
            "UV" => Vr::UV,
            other => return Err(other.to_string()),
        };
        Ok(vr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_names() {
        for name in ["CS", "DS", "SQ", "UI", "FL", "UT"] {
            let vr: Vr = name.parse().unwrap();
            assert_eq!(vr.as_str(), name);
        }
        assert!("XX".parse::<Vr>().is_err());
    }

    #[test]
    fn test_padding() {
        assert_eq!(Vr::UI.padding(), 0);
        assert_eq!(Vr::CS.padding(), b' ');
        assert_eq!(Vr::FL.padding(), 0);
    }
}
