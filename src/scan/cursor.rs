use serde::Serialize;

/// Token that both starts a scan and signals its completion.
pub const RESET_TOKEN: &str = "0";

/// Continuation state of a cursor scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanCursor {
    token: String,
    exhausted: bool,
}

impl ScanCursor {
    pub fn new() -> Self {
        Self {
            token: RESET_TOKEN.to_string(),
            exhausted: false,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn is_at_start(&self) -> bool {
        self.token == RESET_TOKEN && !self.exhausted
    }

    /// Record the token returned by the server. Tokens other than the reset
    /// token are opaque and echoed back unchanged on the next fetch.
    pub fn advance(&mut self, token: String) {
        self.exhausted = token == RESET_TOKEN;
        self.token = token;
    }

    pub fn reset(&mut self) {
        self.token.clear();
        self.token.push_str(RESET_TOKEN);
        self.exhausted = false;
    }
}

impl Default for ScanCursor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cursor_is_at_start() {
        let cursor = ScanCursor::new();
        assert_eq!(cursor.token(), "0");
        assert!(!cursor.is_exhausted());
        assert!(cursor.is_at_start());
    }

    #[test]
    fn test_advance_to_reset_token_exhausts() {
        let mut cursor = ScanCursor::new();
        cursor.advance("17".to_string());
        assert_eq!(cursor.token(), "17");
        assert!(!cursor.is_exhausted());

        cursor.advance("0".to_string());
        assert!(cursor.is_exhausted());
        assert!(!cursor.is_at_start());

        cursor.reset();
        assert_eq!(cursor, ScanCursor::new());
    }
}
