use url::Url;

/// Immutable snapshot of the page state a resolution starts from.
///
/// The current page URL is always a valid URL (it comes from the browser or
/// the CLI argument parser); the referrer is kept raw because a malformed
/// referrer is a normal, silently skipped input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    current: Url,
    referrer: Option<String>,
}

impl Environment {
    /// Snapshot for a page without a referrer
    pub const fn new(current: Url) -> Self {
        Self {
            current,
            referrer: None,
        }
    }

    /// Attach the raw referrer string (empty strings count as no referrer)
    #[must_use]
    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        let referrer = referrer.into();
        self.referrer = Some(referrer).filter(|r| !r.trim().is_empty());
        self
    }

    /// Parse the current page URL and optional referrer
    pub fn parse(current: &str, referrer: Option<&str>) -> Result<Self, url::ParseError> {
        let env = Self::new(Url::parse(current)?);
        Ok(match referrer {
            Some(r) => env.with_referrer(r),
            None => env,
        })
    }

    pub const fn current(&self) -> &Url {
        &self.current
    }

    pub fn referrer(&self) -> Option<&str> {
        self.referrer.as_deref()
    }
}
