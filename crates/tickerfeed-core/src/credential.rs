//! Upstream credentials and the ordered pools they rotate through.

use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// Credential the price upstream accepts for its public demo data.
pub const DEMO_CREDENTIAL: &str = "demo";

const VISIBLE_SUFFIX: usize = 4;

/// Opaque API key. `Debug` and `Display` only ever show a masked suffix.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(Arc<str>);

impl Credential {
    pub fn new(secret: impl AsRef<str>) -> Self {
        Self(Arc::from(secret.as_ref().trim()))
    }

    /// The raw secret, for placing on the wire only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `****` followed by the last four characters, or just `****` for short keys.
    pub fn masked(&self) -> String {
        let chars = self.0.chars().count();
        if chars <= VISIBLE_SUFFIX {
            return String::from("****");
        }
        let suffix: String = self.0.chars().skip(chars - VISIBLE_SUFFIX).collect();
        format!("****{suffix}")
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}

impl Display for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.masked())
    }
}

/// Ordered, de-duplicated credential pool. Rotation walks it front to back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialPool {
    credentials: Vec<Credential>,
}

impl CredentialPool {
    pub fn new<I, S>(secrets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut credentials: Vec<Credential> = Vec::new();
        for secret in secrets {
            let credential = Credential::new(secret);
            if credential.expose().is_empty() || credentials.contains(&credential) {
                continue;
            }
            credentials.push(credential);
        }
        Self { credentials }
    }

    /// Single-entry pool holding [`DEMO_CREDENTIAL`].
    pub fn demo() -> Self {
        Self::new([DEMO_CREDENTIAL])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.credentials.iter()
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}
