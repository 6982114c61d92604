use std::error::Error;

/// A trait for converting a database row into a model.
pub trait TryFromRow<R>: Sized {
    /// Performs the conversion.
    fn try_from_row(row: &R) -> Result<Self, Box<dyn Error + Send + Sync>>;
}

/// Checks that `ident` is a plain SQL identifier, optionally schema
/// qualified (`schema.table`), so it can be spliced into a statement.
pub fn is_valid_identifier(ident: &str) -> bool {
    !ident.is_empty()
        && ident.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_identifier() {
        assert!(is_valid_identifier("item"));
        assert!(is_valid_identifier("_item_2"));
        assert!(is_valid_identifier("public.item"));

        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("2item"));
        assert!(!is_valid_identifier("public."));
        assert!(!is_valid_identifier("item; DROP TABLE item"));
        assert!(!is_valid_identifier("item\""));
    }
}
