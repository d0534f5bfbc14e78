use std::fmt;

/// Request-ready cookie string for an authenticated storefront session.
///
/// Holds semicolon-joined `name=value` pairs with all cookie attributes
/// stripped. Lives for one import and is passed explicitly to every
/// request that needs it. `Debug` never prints the cookie values.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Merge `Set-Cookie` directives into a single `Cookie` header value.
    ///
    /// Only the leading `name=value` pair of each directive is kept, so
    /// `a=1; Path=/` and `b=2; Secure` become `a=1; b=2`.
    pub fn from_set_cookies<I, S>(directives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pairs: Vec<String> = directives
            .into_iter()
            .filter_map(|directive| {
                let pair = directive.as_ref().split(';').next().unwrap_or("").trim();
                (!pair.is_empty()).then(|| pair.to_string())
            })
            .collect();
        Self(pairs.join("; "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of cookie pairs held, for logging without exposing values.
    pub fn cookie_count(&self) -> usize {
        if self.0.is_empty() {
            0
        } else {
            self.0.split("; ").count()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken(<{} cookies>)", self.cookie_count())
    }
}
