//! Small helpers shared by the client and the app

/// Generate a date-prefixed document number, e.g. `F-20240311-0482`.
///
/// The random suffix keeps concurrent terminals from colliding without any
/// coordination; uniqueness is ultimately enforced by the backend column.
pub fn document_number(prefix: &str) -> String {
    use rand::Rng;
    let date = chrono::Utc::now().format("%Y%m%d");
    let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("{prefix}-{date}-{suffix:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_number_has_prefix_date_and_suffix() {
        let number = document_number("F");
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "F");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 4);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }
}
