use std::fmt;

/// Opaque reference to an element inside one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How to find an element.
///
/// Every variant lowers to a CSS selector, which all drivers understand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// Raw CSS selector.
    Css(String),
    /// Single class name.
    Class(String),
    /// Value of the `name` attribute.
    Name(String),
    /// Tag name.
    Tag(String),
}

impl Locator {
    pub fn css(s: impl Into<String>) -> Self {
        Self::Css(s.into())
    }

    pub fn class(s: impl Into<String>) -> Self {
        Self::Class(s.into())
    }

    pub fn name(s: impl Into<String>) -> Self {
        Self::Name(s.into())
    }

    pub fn tag(s: impl Into<String>) -> Self {
        Self::Tag(s.into())
    }

    /// CSS form of this locator.
    pub fn to_css(&self) -> String {
        match self {
            Locator::Css(s) => s.clone(),
            Locator::Class(c) => format!(".{c}"),
            Locator::Name(n) => format!("[name=\"{n}\"]"),
            Locator::Tag(t) => t.clone(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}
