//! Parent/child level validation.

use crate::{
    error::{Result, WbsError},
    models::Level,
};

/// The only level a node may have under a parent at `parent` (`None` for
/// roots). `None` means the parent cannot take children at all.
pub fn expected_level(parent: Option<Level>) -> Option<Level> {
    match parent {
        None => Some(Level::ROOT),
        Some(level) => level.child(),
    }
}

/// Accepts `requested` only if it is exactly one level below `parent`, or
/// [`Level::L1`] when there is no parent.
///
/// ```rust
/// use arbor_core::{models::Level, wbs::validate_level, WbsError};
///
/// assert!(validate_level(Level::L1, None).is_ok());
/// assert!(validate_level(Level::L2, Some(Level::L1)).is_ok());
/// assert!(matches!(
///     validate_level(Level::L3, Some(Level::L1)),
///     Err(WbsError::LevelMismatch { expected: Some(Level::L2), .. })
/// ));
/// ```
pub fn validate_level(requested: Level, parent: Option<Level>) -> Result<()> {
    let expected = expected_level(parent);
    if expected == Some(requested) {
        Ok(())
    } else {
        Err(WbsError::LevelMismatch {
            requested,
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_valid_pair_accepted() {
        assert!(validate_level(Level::L1, None).is_ok());
        for parent in Level::ALL {
            if let Some(child) = parent.child() {
                assert!(validate_level(child, Some(parent)).is_ok());
            }
        }
    }

    #[test]
    fn test_root_must_be_l1() {
        for level in [Level::L2, Level::L3, Level::L4] {
            match validate_level(level, None) {
                Err(WbsError::LevelMismatch {
                    requested,
                    expected,
                }) => {
                    assert_eq!(requested, level);
                    assert_eq!(expected, Some(Level::L1));
                }
                other => panic!("Expected LevelMismatch, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_skipping_and_reusing_levels_rejected() {
        assert!(validate_level(Level::L3, Some(Level::L1)).is_err());
        assert!(validate_level(Level::L2, Some(Level::L2)).is_err());
        assert!(validate_level(Level::L1, Some(Level::L3)).is_err());
    }

    #[test]
    fn test_l4_takes_no_children() {
        assert_eq!(expected_level(Some(Level::L4)), None);
        for level in Level::ALL {
            assert!(matches!(
                validate_level(level, Some(Level::L4)),
                Err(WbsError::LevelMismatch { expected: None, .. })
            ));
        }
    }
}
