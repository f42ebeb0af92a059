//! Operation capability sets

use crate::request::OperationKind;

/// Set of operations a storage instance serves
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities(u32);

impl Capabilities {
    pub const NONE: Self = Self(0);

    pub const ALL: Self = Self::of(&OperationKind::ALL);

    /// Point and prefix reads of object metadata
    pub const METADATA_READS: Self = Self::of(&[
        OperationKind::ListObjectNames,
        OperationKind::ListObjectInfo,
        OperationKind::GetItemInfo,
        OperationKind::GetItemInfos,
        OperationKind::Close,
    ]);

    #[must_use]
    pub const fn of(kinds: &[OperationKind]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        Self(bits)
    }

    #[must_use]
    pub const fn with(self, kind: OperationKind) -> Self {
        Self(self.0 | kind.bit())
    }

    #[must_use]
    pub const fn allows(self, kind: OperationKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = OperationKind> {
        OperationKind::ALL
            .into_iter()
            .filter(move |kind| self.allows(*kind))
    }
}
