//! Validated DNS names

use std::fmt;
use std::hash::{Hash, Hasher};

use idna::AsciiDenyList;
use serde::{Deserialize, Serialize};

use crate::error::{Result, Route53Error};

/// A non-empty Unicode domain name.
///
/// The text is kept exactly as given; the IDNA (ASCII-compatible) form is
/// computed once at construction and used whenever the name goes on the wire.
/// ASCII and Unicode text take the same UTS 46 mapping, so the wire form is
/// lower case either way.
/// Equality, ordering and hashing use the IDNA form folded to lower case, so a
/// name decoded from a response equals the Unicode name it was sent as.
///
/// ```rust
/// use route53_client::Name;
///
/// let name = Name::new("bücher.example.").unwrap();
/// assert_eq!(name.text(), "bücher.example.");
/// assert_eq!(name.to_ascii(), "xn--bcher-kva.example.");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name {
    text: String,
    ascii: String,
}

impl Name {
    /// Creates a name, rejecting empty text and text with no IDNA encoding.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(Route53Error::InvalidName {
                name: text,
                detail: "name must not be empty".to_string(),
            });
        }

        // One UTS 46 pass for every name. Nothing is denied so that escaped
        // labels such as `\052` survive; the wire form is only meaningful for
        // text that is a valid host name.
        let ascii = idna::domain_to_ascii_cow(text.as_bytes(), AsciiDenyList::EMPTY)
            .map_err(|e| Route53Error::InvalidName {
                name: text.clone(),
                detail: format!("no IDNA encoding: {e}"),
            })?
            .into_owned();

        Ok(Self { text, ascii })
    }

    /// The name as originally supplied.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The ASCII-compatible encoding used in requests.
    pub fn to_ascii(&self) -> &str {
        &self.ascii
    }

    fn folded(&self) -> impl Iterator<Item = u8> + '_ {
        self.ascii.bytes().map(|b| b.to_ascii_lowercase())
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.ascii.eq_ignore_ascii_case(&other.ascii)
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.folded() {
            state.write_u8(b);
        }
        state.write_u8(0xff);
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.folded().cmp(other.folded())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ascii)
    }
}

impl TryFrom<String> for Name {
    type Error = Route53Error;

    fn try_from(text: String) -> Result<Self> {
        Self::new(text)
    }
}

impl TryFrom<&str> for Name {
    type Error = Route53Error;

    fn try_from(text: &str) -> Result<Self> {
        Self::new(text)
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.text
    }
}
