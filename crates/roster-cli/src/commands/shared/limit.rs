/// Compute effective limit with precedence: global flag -> configured default.
#[must_use]
pub const fn effective_limit(flag: Option<u32>, configured: u32) -> u32 {
    match flag {
        Some(limit) => limit,
        None => configured,
    }
}

/// Keep at most `limit` rows.
pub fn truncate_rows<T>(rows: &mut Vec<T>, limit: u32) {
    rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
}

#[cfg(test)]
mod tests {
    use super::{effective_limit, truncate_rows};

    #[test]
    fn flag_takes_precedence() {
        assert_eq!(effective_limit(Some(5), 50), 5);
    }

    #[test]
    fn configured_default_used_without_flag() {
        assert_eq!(effective_limit(None, 50), 50);
    }

    #[test]
    fn truncate_keeps_prefix() {
        let mut rows = vec![1, 2, 3, 4];
        truncate_rows(&mut rows, 2);
        assert_eq!(rows, vec![1, 2]);
        truncate_rows(&mut rows, 10);
        assert_eq!(rows.len(), 2);
    }
}
