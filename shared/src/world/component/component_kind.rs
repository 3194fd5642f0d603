use std::{borrow::Cow, fmt};

/// Closed tag naming what a component does. The World dispatches inserts and
/// removes to the handler registered for the kind.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Debug)]
pub struct ComponentKind(Cow<'static, str>);

impl ComponentKind {
    pub const RANDOM: ComponentKind = ComponentKind(Cow::Borrowed("random"));
    pub const SAMPLE: ComponentKind = ComponentKind(Cow::Borrowed("sample"));
    pub const APPLY: ComponentKind = ComponentKind(Cow::Borrowed("apply"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for ComponentKind {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for ComponentKind {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
