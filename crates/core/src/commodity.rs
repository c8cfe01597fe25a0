//! Commodity catalog records.
//!
//! A commodity is a type of good with an optional production level range, a storage class and
//! a reference to a [`TextDocument`](crate::TextDocument) describing it. The description is
//! referenced by id only; deleting a commodity never touches its description and vice versa.

use crate::constants::DEFAULT_MIN_LEVEL;
use crate::{ContentError, ContentResult};
use emporium_types::NonEmptyText;
use emporium_uuid::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a commodity has to be stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageClass {
    Standard,
    Bulk,
    Fluid,
    Hazardous,
}

impl StorageClass {
    pub const ALL: [StorageClass; 4] = [
        StorageClass::Standard,
        StorageClass::Bulk,
        StorageClass::Fluid,
        StorageClass::Hazardous,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageClass::Standard => "Standard",
            StorageClass::Bulk => "Bulk",
            StorageClass::Fluid => "Fluid",
            StorageClass::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageClass {
    type Err = ContentError;

    /// Case-insensitive, so `bulk` and `Bulk` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        StorageClass::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ContentError::InvalidInput(format!("unknown storage class '{s}'")))
    }
}

/// On-disk shape of a commodity; converted through [`CommodityRecord::try_from`] so level
/// bounds are checked on every load.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommodityWire {
    id: RecordId,
    name: NonEmptyText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_level: Option<u32>,
    storage: StorageClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<RecordId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CommodityWire", into = "CommodityWire")]
pub struct CommodityRecord {
    id: RecordId,
    name: NonEmptyText,
    min_level: Option<u32>,
    max_level: Option<u32>,
    storage: StorageClass,
    description: Option<RecordId>,
}

impl CommodityRecord {
    /// # Errors
    ///
    /// Returns [`ContentError::InvalidLevelRange`] when `max_level` is set and is below the
    /// effective minimum (`min_level`, or 1 when unset).
    pub fn new(
        id: RecordId,
        name: NonEmptyText,
        storage: StorageClass,
        min_level: Option<u32>,
        max_level: Option<u32>,
        description: Option<RecordId>,
    ) -> ContentResult<Self> {
        if let Some(max) = max_level {
            let min = min_level.unwrap_or(DEFAULT_MIN_LEVEL);
            if min > max {
                return Err(ContentError::InvalidLevelRange { min, max });
            }
        }
        Ok(Self {
            id,
            name,
            min_level,
            max_level,
            storage,
            description,
        })
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn name(&self) -> &NonEmptyText {
        &self.name
    }

    pub fn min_level(&self) -> Option<u32> {
        self.min_level
    }

    pub fn max_level(&self) -> Option<u32> {
        self.max_level
    }

    /// Lowest level the commodity is produced at; 1 unless set.
    pub fn effective_min_level(&self) -> u32 {
        self.min_level.unwrap_or(DEFAULT_MIN_LEVEL)
    }

    pub fn storage(&self) -> StorageClass {
        self.storage
    }

    /// Id of the text document describing this commodity, if any.
    pub fn description(&self) -> Option<RecordId> {
        self.description
    }
}

impl TryFrom<CommodityWire> for CommodityRecord {
    type Error = ContentError;

    fn try_from(wire: CommodityWire) -> Result<Self, Self::Error> {
        CommodityRecord::new(
            wire.id,
            wire.name,
            wire.storage,
            wire.min_level,
            wire.max_level,
            wire.description,
        )
    }
}

impl From<CommodityRecord> for CommodityWire {
    fn from(record: CommodityRecord) -> Self {
        CommodityWire {
            id: record.id,
            name: record.name,
            min_level: record.min_level,
            max_level: record.max_level,
            storage: record.storage,
            description: record.description,
        }
    }
}
