use regex::Regex;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RequestMatcherError {
    #[error("Path pattern must start with '/': {0:?}")]
    NotAbsolute(String),
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

/// Match request paths against an ant style pattern:
/// - `?` matches one character within a segment
/// - `*` matches zero or more characters within a segment
/// - `**` matches zero or more segments, `/a/**` matches `/a` itself, too
#[derive(Clone, Debug)]
pub struct RequestMatcher {
    pattern: String,
    regex: Regex,
}

impl RequestMatcher {
    pub fn new<S: Into<String>>(pattern: S) -> Result<Self, RequestMatcherError> {
        let pattern = pattern.into();
        let segments = pattern
            .strip_prefix('/')
            .ok_or_else(|| RequestMatcherError::NotAbsolute(pattern.clone()))?;

        let mut expr = String::from("^");
        for segment in segments.split('/') {
            if segment == "**" {
                expr.push_str("(?:/.*)?");
                continue;
            }

            expr.push('/');
            for c in segment.chars() {
                match c {
                    '*' => expr.push_str("[^/]*"),
                    '?' => expr.push_str("[^/]"),
                    c => expr.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
                }
            }
        }
        expr.push('$');

        log::debug!("Request matcher {pattern:?} compiled to {expr:?}");
        let regex = Regex::new(&expr)?;
        Ok(Self { pattern, regex })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}
