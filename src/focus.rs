use std::str::FromStr;

pub const FOCUS_TAPS: u8 = 3;

/// Kind of element a tap passed through on its way up from the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Button,
    Link,
    FocusCircles,
    Other,
}

impl ElementKind {
    fn is_interactive(self) -> bool {
        matches!(self, Self::Button | Self::Link | Self::FocusCircles)
    }
}

impl FromStr for ElementKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "button" => Ok(Self::Button),
            "link" | "a" => Ok(Self::Link),
            "circles" | "focus-circles" => Ok(Self::FocusCircles),
            "background" | "other" => Ok(Self::Other),
            other => Err(other.to_string()),
        }
    }
}

/// Origin of a raw tap: the element hit first, followed by its ancestors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TapTarget {
    ancestry: Vec<ElementKind>,
}

impl TapTarget {
    pub fn new(ancestry: impl IntoIterator<Item = ElementKind>) -> Self {
        Self {
            ancestry: ancestry.into_iter().collect(),
        }
    }

    /// A tap on empty page space.
    pub fn background() -> Self {
        Self::new([ElementKind::Other])
    }

    pub fn within_control(&self) -> bool {
        self.ancestry.iter().any(|kind| kind.is_interactive())
    }
}

/// A tap counts only while a session is being polled and when it did not land
/// on a control or on the circle indicator itself.
pub fn qualifies(target: &TapTarget, polling: bool) -> bool {
    polling && !target.within_control()
}
