//! Strongly-typed identifiers used throughout the segment store and topology
//! builder, one newtype per id kind so a `FeatureId` and a `LineId` can never
//! be swapped by accident.

use std::fmt;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<usize> for $name {
            fn from(value: usize) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(FeatureId);
id_type!(LineId);
id_type!(SegmentGuid);
