//! Typed indices for trucks, bays and value-of-time classes.
//!
//! Each id is the position of its entity in a run-owned table (`Vec<Truck>`,
//! the `BayPool`, `StationConfig::classes`), so lookups are plain indexing.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) = $label:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Position in the owning table.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }

        /// Fails once a table outgrows the id's integer width.
        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// A truck, numbered in arrival-admission order.
    pub struct TruckId(u32) = "truck";
}

typed_id! {
    /// A charging bay in the station's fixed pool.
    pub struct BayId(u16) = "bay";
}

typed_id! {
    /// A row of the station's value-of-time class table.
    pub struct VotClassId(u16) = "class";
}
