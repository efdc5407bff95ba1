use std::str::FromStr;

use serde::Serialize;
use strum::{Display, IntoStaticStr, VariantArray};

use crate::error::Error;

/// Colour scheme shared by the invitation page and the admin panel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, IntoStaticStr, VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Classic,
    Pink,
    Blue,
    Green,
    Lavender,
    Red,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::VARIANTS
            .iter()
            .copied()
            .find(|theme| theme.as_str() == wanted)
            .ok_or_else(|| Error::UnknownTheme(s.to_string()))
    }
}
