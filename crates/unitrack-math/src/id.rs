//! Integer identifiers used to index the read-only geometry arenas.

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Construct from a raw index.
            #[inline]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Raw integer value.
            #[inline]
            pub const fn get(self) -> u32 {
                self.0
            }

            /// Value as an array index.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Index of a surface within a single universe.
    LocalSurfaceId
);

define_id!(
    /// Index of a volume (region) within a single universe.
    LocalVolumeId
);

define_id!(
    /// Index of a face within one volume's sorted face list.
    FaceId
);
