//! Defined-term enumerations used by SR content items

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declare an enum whose variants are DICOM defined terms
macro_rules! defined_terms {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Every defined term, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The defined term as written in the dataset
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $( $text => Ok($name::$variant), )+
                    other => Err(other.to_string()),
                }
            }
        }
    };
}

defined_terms! {
    /// Value Type (0040,A040)
    ValueType {
        Text => "TEXT",
        Code => "CODE",
        Numeric => "NUM",
        Date => "DATE",
        Time => "TIME",
        DateTime => "DATETIME",
        PersonName => "PNAME",
        UidReference => "UIDREF",
        Composite => "COMPOSITE",
        Image => "IMAGE",
        Waveform => "WAVEFORM",
        SpatialCoordinates => "SCOORD",
        SpatialCoordinates3D => "SCOORD3D",
        TemporalCoordinates => "TCOORD",
        Container => "CONTAINER",
    }
}

defined_terms! {
    /// Relationship Type (0040,A010)
    RelationshipType {
        Contains => "CONTAINS",
        HasProperties => "HAS PROPERTIES",
        HasObsContext => "HAS OBS CONTEXT",
        HasAcqContext => "HAS ACQ CONTEXT",
        HasConceptModifier => "HAS CONCEPT MOD",
        InferredFrom => "INFERRED FROM",
        SelectedFrom => "SELECTED FROM",
    }
}

defined_terms! {
    /// Continuity Of Content (0040,A050)
    Continuity {
        Separate => "SEPARATE",
        Continuous => "CONTINUOUS",
    }
}

defined_terms! {
    /// Graphic Type (0070,0023) for SCOORD
    GraphicType {
        Point => "POINT",
        Multipoint => "MULTIPOINT",
        Polyline => "POLYLINE",
        Circle => "CIRCLE",
        Ellipse => "ELLIPSE",
    }
}

defined_terms! {
    /// Graphic Type (0070,0023) for SCOORD3D
    GraphicType3D {
        Point => "POINT",
        Multipoint => "MULTIPOINT",
        Polyline => "POLYLINE",
        Polygon => "POLYGON",
        Ellipse => "ELLIPSE",
        Ellipsoid => "ELLIPSOID",
    }
}

defined_terms! {
    /// Temporal Range Type (0040,A130)
    TemporalRangeType {
        Point => "POINT",
        Multipoint => "MULTIPOINT",
        Segment => "SEGMENT",
        Multisegment => "MULTISEGMENT",
        Begin => "BEGIN",
        End => "END",
    }
}

defined_terms! {
    /// Completion Flag (0040,A491)
    CompletionFlag {
        Partial => "PARTIAL",
        Complete => "COMPLETE",
    }
}

defined_terms! {
    /// Verification Flag (0040,A493)
    VerificationFlag {
        Unverified => "UNVERIFIED",
        Verified => "VERIFIED",
    }
}

defined_terms! {
    /// Preliminary Flag (0040,A496)
    PreliminaryFlag {
        Preliminary => "PRELIMINARY",
        Final => "FINAL",
    }
}

impl ValueType {
    /// Check if items of this type may have children
    pub const fn is_container(&self) -> bool {
        matches!(self, ValueType::Container)
    }

    /// Check if items of this type reference another SOP instance
    pub const fn is_reference(&self) -> bool {
        matches!(
            self,
            ValueType::Composite | ValueType::Image | ValueType::Waveform
        )
    }
}

impl GraphicType {
    /// Check if a graphic data length fits this type (2 values per point)
    pub fn accepts(&self, values: usize) -> bool {
        match self {
            GraphicType::Point => values == 2,
            GraphicType::Circle => values == 4,
            GraphicType::Ellipse => values == 8,
            GraphicType::Multipoint => values >= 2 && values % 2 == 0,
            GraphicType::Polyline => values >= 4 && values % 2 == 0,
        }
    }
}

impl GraphicType3D {
    /// Check if a graphic data length fits this type (3 values per point)
    pub fn accepts(&self, values: usize) -> bool {
        match self {
            GraphicType3D::Point => values == 3,
            GraphicType3D::Ellipse => values == 12,
            GraphicType3D::Ellipsoid => values == 18,
            GraphicType3D::Multipoint => values >= 3 && values % 3 == 0,
            GraphicType3D::Polyline => values >= 6 && values % 3 == 0,
            GraphicType3D::Polygon => values >= 9 && values % 3 == 0,
        }
    }
}
