//! Generation variants
//!
//! A variant picks the provider pipeline for one image: a single direct
//! image-to-image call, or a background-model call followed by compositing.

use std::{fmt, str::FromStr};

use crate::error::StudioError;

/// Fixed settings for one background-compositing style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundSpec {
    /// Versioned model identifier (`owner/name:version`)
    pub model: &'static str,
    /// Prepended to the scene prompt
    pub style_tag: &'static str,
}

/// Custom-trained background styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundStyle {
    Beach,
    Bar,
    Stylish,
    Bbq,
    Pojangmacha,
}

impl BackgroundStyle {
    pub const ALL: [Self; 5] = [Self::Beach, Self::Bar, Self::Stylish, Self::Bbq, Self::Pojangmacha];

    /// Model and style tag for this background
    pub const fn spec(self) -> BackgroundSpec {
        match self {
            Self::Beach => BackgroundSpec {
                model: "clipnpaper/alcohol_beach:5c3ef136e48fd434e8fa47c9deaad6d12527a61757305ca01169e58fc5b19ef5",
                style_tag: "alcohol_beach background",
            },
            Self::Bar => BackgroundSpec {
                model: "clipnpaper/alcohol_cozy_bar:8f3dff77476698778b50f4d7a1112e10f03496d0f19ce38c583ab16cecec6fba",
                style_tag: "cozy_bar background",
            },
            Self::Stylish => BackgroundSpec {
                model: "clipnpaper/alcohol_stylish:b320a707aabb4390f663d2e834c30b072b3b1ad0d294182b1c4eec329818074f",
                style_tag: "stylish background",
            },
            Self::Bbq => BackgroundSpec {
                model: "clipnpaper/alcohol_bbq:81520f34f3770086c356c923a1101026bf77cbbe0bc84c3d2d9a496fa81735fa",
                style_tag: "BBQ background",
            },
            Self::Pojangmacha => BackgroundSpec {
                model: "clipnpaper/pojangmacha:5470dfeb19844ba06245c7e22214b7cdbce9e6034e8edcad74d9ef5a0c61a5cd",
                style_tag: "pojangmacha background",
            },
        }
    }

    const fn selector(self) -> &'static str {
        match self {
            Self::Beach => "custom_beach",
            Self::Bar => "custom_bar",
            Self::Stylish => "custom_stylish",
            Self::Bbq => "custom_bbq",
            Self::Pojangmacha => "custom_pojangmacha",
        }
    }
}

/// Pipeline used to produce one marketing image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GenerationVariant {
    /// One image-to-image call with the product photo as reference
    #[default]
    Direct,
    /// One call to the compositing model with the product photo alone
    DirectComposite,
    /// Background model first, then composite product over background
    BackgroundComposite(BackgroundStyle),
}

impl GenerationVariant {
    /// Form value selecting this variant
    pub const fn selector(self) -> &'static str {
        match self {
            Self::Direct => "flux",
            Self::DirectComposite => "nanobanana",
            Self::BackgroundComposite(style) => style.selector(),
        }
    }

    /// Every selectable variant
    pub fn all() -> impl Iterator<Item = Self> {
        [Self::Direct, Self::DirectComposite]
            .into_iter()
            .chain(BackgroundStyle::ALL.into_iter().map(Self::BackgroundComposite))
    }
}

impl fmt::Display for GenerationVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

impl FromStr for GenerationVariant {
    type Err = StudioError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();

        Self::all()
            .find(|variant| variant.selector().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| StudioError::UnknownVariant(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_selector() {
        for variant in GenerationVariant::all() {
            assert_eq!(variant.selector().parse::<GenerationVariant>().unwrap(), variant);
        }
    }

    #[test]
    fn parsing_ignores_case_and_padding() {
        assert_eq!(
            " Custom_BBQ ".parse::<GenerationVariant>().unwrap(),
            GenerationVariant::BackgroundComposite(BackgroundStyle::Bbq)
        );
        assert_eq!("FLUX".parse::<GenerationVariant>().unwrap(), GenerationVariant::Direct);
    }

    #[test]
    fn unknown_selector_is_rejected() {
        let err = "midjourney".parse::<GenerationVariant>().unwrap_err();
        assert!(matches!(err, StudioError::UnknownVariant(name) if name == "midjourney"));
    }

    #[test]
    fn background_models_are_versioned() {
        for style in BackgroundStyle::ALL {
            let (name, version) = style.spec().model.split_once(':').unwrap();
            assert!(name.starts_with("clipnpaper/"));
            assert_eq!(version.len(), 64);
        }
    }

    #[test]
    fn default_is_direct() {
        assert_eq!(GenerationVariant::default().to_string(), "flux");
    }
}
