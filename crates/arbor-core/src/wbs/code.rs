//! Hierarchical code generation.
//!
//! A root's code is its 1-based position (`"3"`); a child's code is the
//! parent's code followed by its own 1-based position (`"3.2"`).

/// Position and code reserved for a new sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingSlot {
    pub order: u32,
    pub code: String,
}

/// Computes the slot for a new node given the parent's code (if any) and
/// the order it will take.
///
/// ```rust
/// use arbor_core::wbs::next_sibling;
///
/// assert_eq!(next_sibling(None, 0).code, "1");
/// assert_eq!(next_sibling(Some("2.3"), 0).code, "2.3.1");
/// assert_eq!(next_sibling(Some("2.3"), 4).order, 4);
/// ```
pub fn next_sibling(parent_code: Option<&str>, order: u32) -> SiblingSlot {
    let position = u64::from(order) + 1;
    let code = match parent_code {
        Some(parent) => format!("{parent}.{position}"),
        None => position.to_string(),
    };
    SiblingSlot { order, code }
}

/// Order for the next sibling given the current sibling count and the
/// highest order in use.
///
/// With contiguous orders this is the count. Once a sibling has been
/// deleted or moved away the count falls below `max + 1`, and reusing it
/// would collide with a live sibling's code, so the order continues after
/// the highest one instead.
pub fn next_order(count: u32, max_order: Option<u32>) -> u32 {
    match max_order {
        Some(max) => count.max(max.saturating_add(1)),
        None => count,
    }
}

/// Rewrites `code` so that the `old_prefix` ancestor segment becomes
/// `new_prefix`. Returns `None` if `code` is not within `old_prefix`.
pub fn rebase_code(code: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    if code == old_prefix {
        return Some(new_prefix.to_string());
    }
    code.strip_prefix(old_prefix)
        .filter(|rest| rest.starts_with('.'))
        .map(|rest| format!("{new_prefix}{rest}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_codes_are_one_based() {
        assert_eq!(
            next_sibling(None, 0),
            SiblingSlot {
                order: 0,
                code: "1".to_string()
            }
        );
        assert_eq!(next_sibling(None, 9).code, "10");
    }

    #[test]
    fn test_child_code_extends_parent() {
        assert_eq!(next_sibling(Some("1"), 0).code, "1.1");
        assert_eq!(next_sibling(Some("1.1.1"), 2).code, "1.1.1.3");
    }

    #[test]
    fn test_next_order_contiguous() {
        assert_eq!(next_order(0, None), 0);
        assert_eq!(next_order(3, Some(2)), 3);
    }

    #[test]
    fn test_next_order_after_gap() {
        // Siblings 0 and 2 remain after deleting 1.
        assert_eq!(next_order(2, Some(2)), 3);
    }

    #[test]
    fn test_rebase_code() {
        assert_eq!(rebase_code("1.2", "1.2", "3.1"), Some("3.1".to_string()));
        assert_eq!(
            rebase_code("1.2.4.1", "1.2", "3.1"),
            Some("3.1.4.1".to_string())
        );
        assert_eq!(rebase_code("1.20.1", "1.2", "3.1"), None);
        assert_eq!(rebase_code("4", "1.2", "3.1"), None);
    }
}
