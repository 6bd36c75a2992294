use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A world-format type path such as `/obj/item/weapon`.
///
/// Paths are absolute, slash-separated, and never end with a slash. The
/// parent of `/obj/item` is `/obj`; a single-segment path has no parent.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypePath(String);

impl TypePath {
    /// Parse and validate a type path.
    pub fn parse(path: &str) -> Result<Self, TypeError> {
        let invalid = |reason: &str| TypeError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let Some(rest) = path.strip_prefix('/') else {
            return Err(invalid("must start with '/'"));
        };
        if rest.is_empty() {
            return Err(invalid("must name at least one segment"));
        }
        for segment in rest.split('/') {
            if segment.is_empty() {
                return Err(invalid("empty segment"));
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(invalid("segments may only contain [A-Za-z0-9_]"));
            }
        }
        Ok(Self(path.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The enclosing type path, or `None` for a root type.
    pub fn parent(&self) -> Option<TypePath> {
        let idx = self.0.rfind('/')?;
        if idx == 0 {
            None
        } else {
            Some(Self(self.0[..idx].to_string()))
        }
    }

    /// Number of segments (`/obj/item` has depth 2).
    pub fn depth(&self) -> usize {
        self.0.matches('/').count()
    }

    /// Last segment of the path.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// `true` if `self` equals `ancestor` or lies beneath it.
    pub fn is_subtype_of(&self, ancestor: &TypePath) -> bool {
        self.0 == ancestor.0
            || (self.0.starts_with(&ancestor.0)
                && self.0.as_bytes().get(ancestor.0.len()) == Some(&b'/'))
    }

    /// Iterate over the ancestors of this path, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = TypePath> {
        std::iter::successors(self.parent(), TypePath::parent)
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TypePath {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TypePath {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TypePath> for String {
    fn from(path: TypePath) -> Self {
        path.0
    }
}
