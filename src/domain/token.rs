use uuid::Uuid;

/// Source of identifiers for payments and favorites.
pub trait TokenGenerator {
    fn next_token(&mut self) -> String;
}

/// Random v4 UUIDs in their hyphenated text form.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidTokens;

impl TokenGenerator for UuidTokens {
    fn next_token(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl<F> TokenGenerator for F
where
    F: FnMut() -> String,
{
    fn next_token(&mut self) -> String {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_tokens_are_distinct() {
        let mut tokens = UuidTokens;
        let a = tokens.next_token();
        let b = tokens.next_token();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn test_closure_generator() {
        let mut n = 0;
        let mut tokens = move || {
            n += 1;
            format!("tok-{}", n)
        };
        assert_eq!(tokens.next_token(), "tok-1");
        assert_eq!(tokens.next_token(), "tok-2");
    }
}
