//! Index resolution

use roomcast_core::{Result, RoomcastError};

/// A user-supplied index after range checking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIndex {
    /// The text as given, trimmed; output names are built from it
    pub requested: String,
    /// Slot actually used
    pub index: usize,
    /// True when the requested index was replaced by 0
    pub clamped: bool,
}

/// Turn index text into a layout slot for a bundle of `len` layouts.
///
/// Negative values and anything at or beyond `len - 1` fall back to 0.
/// The last layout is therefore never reachable, which matches how
/// existing result directories were produced.
pub fn resolve_index(text: &str, len: usize) -> Result<ResolvedIndex> {
    let requested = text.trim().to_string();
    let value: i64 = requested
        .parse()
        .map_err(|_| RoomcastError::InvalidIndex(text.to_string()))?;

    let in_range = value >= 0 && (value as u64).saturating_add(1) < len as u64;
    let (index, clamped) = if in_range {
        (value as usize, false)
    } else {
        eprintln!("[layout] input index {} out of range, using 0", value);
        (0, true)
    };

    Ok(ResolvedIndex {
        requested,
        index,
        clamped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_passes_through() {
        for i in 0..4 {
            let r = resolve_index(&i.to_string(), 5).unwrap();
            assert_eq!(r.index, i);
            assert!(!r.clamped);
        }
    }

    #[test]
    fn test_last_slot_clamps() {
        let r = resolve_index("4", 5).unwrap();
        assert_eq!(r.index, 0);
        assert!(r.clamped);
        assert_eq!(r.requested, "4");
    }

    #[test]
    fn test_beyond_and_negative_clamp() {
        assert_eq!(resolve_index("99", 5).unwrap().index, 0);
        let r = resolve_index("-3", 5).unwrap();
        assert_eq!(r.index, 0);
        assert!(r.clamped);
    }

    #[test]
    fn test_single_layout_always_clamps() {
        let r = resolve_index("0", 1).unwrap();
        assert_eq!(r.index, 0);
        assert!(r.clamped);
    }

    #[test]
    fn test_whitespace_trimmed() {
        let r = resolve_index(" 2 ", 5).unwrap();
        assert_eq!(r.index, 2);
        assert_eq!(r.requested, "2");
    }

    #[test]
    fn test_malformed_text() {
        assert!(matches!(resolve_index("two", 5), Err(RoomcastError::InvalidIndex(_))));
        assert!(matches!(resolve_index("1.5", 5), Err(RoomcastError::InvalidIndex(_))));
    }
}
