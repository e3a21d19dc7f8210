//! Room type detection

use roomcast_core::{Result, RoomcastError};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The room categories a layout model is trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomType {
    DiningRoom,
    LivingRoom,
    Bedroom,
    Library,
}

impl RoomType {
    /// Detection order; the first substring match wins
    pub const ALL: [RoomType; 4] = [
        RoomType::DiningRoom,
        RoomType::LivingRoom,
        RoomType::Bedroom,
        RoomType::Library,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::DiningRoom => "diningroom",
            RoomType::LivingRoom => "livingroom",
            RoomType::Bedroom => "bedroom",
            RoomType::Library => "library",
        }
    }

    /// Find the room type named in the basename of a dataset directory.
    ///
    /// Names matching several types resolve to the first in `ALL`.
    pub fn detect(dataset_directory: &str) -> Result<Self> {
        let basename = Path::new(dataset_directory)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("");

        Self::ALL
            .iter()
            .copied()
            .find(|t| basename.contains(t.as_str()))
            .ok_or_else(|| RoomcastError::UnknownRoomType(dataset_directory.to_string()))
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = RoomcastError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| RoomcastError::UnknownRoomType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_type_detected_from_basename() {
        for t in RoomType::ALL {
            let dir = format!("/data/processed/threed_front_{}_filtered", t.as_str());
            assert_eq!(RoomType::detect(&dir).unwrap(), t);
        }
    }

    #[test]
    fn test_only_basename_is_scanned() {
        let err = RoomType::detect("/data/bedroom/threed_front_unknown").unwrap_err();
        assert!(matches!(err, RoomcastError::UnknownRoomType(ref d) if d.contains("unknown")));
    }

    #[test]
    fn test_ambiguous_name_resolves_in_enumeration_order() {
        assert_eq!(
            RoomType::detect("bedroom_livingroom_mix").unwrap(),
            RoomType::LivingRoom
        );
    }

    #[test]
    fn test_parse_round_trip() {
        assert_eq!("library".parse::<RoomType>().unwrap(), RoomType::Library);
        assert!("kitchen".parse::<RoomType>().is_err());
        assert_eq!(RoomType::DiningRoom.to_string(), "diningroom");
    }
}
