//! Color themes.

use serde::{Deserialize, Serialize};

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Uppercase hex without a leading `#`, as used by DrawingML (`0072C6`).
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// The five color roles a theme assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub background: Rgb,
    pub text: Rgb,
}

/// The available deck themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    ModernBlue,
    ElegantDark,
    Vibrant,
    Minimal,
}

impl Theme {
    pub const ALL: [Theme; 4] = [
        Theme::ModernBlue,
        Theme::ElegantDark,
        Theme::Vibrant,
        Theme::Minimal,
    ];

    /// Look up a theme by name. Unknown names fall back to `modern_blue`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "modern_blue" => Self::ModernBlue,
            "elegant_dark" => Self::ElegantDark,
            "vibrant" => Self::Vibrant,
            "minimal" => Self::Minimal,
            other => {
                log::debug!("Unknown theme {:?}, using modern_blue", other);
                Self::default()
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ModernBlue => "modern_blue",
            Self::ElegantDark => "elegant_dark",
            Self::Vibrant => "vibrant",
            Self::Minimal => "minimal",
        }
    }

    pub fn colors(&self) -> ThemeColors {
        match self {
            Self::ModernBlue => ThemeColors {
                primary: Rgb(0, 114, 198),
                secondary: Rgb(0, 51, 102),
                accent: Rgb(255, 153, 0),
                background: Rgb(240, 244, 249),
                text: Rgb(30, 30, 30),
            },
            Self::ElegantDark => ThemeColors {
                primary: Rgb(40, 40, 40),
                secondary: Rgb(20, 20, 20),
                accent: Rgb(255, 195, 0),
                background: Rgb(245, 245, 245),
                text: Rgb(60, 60, 60),
            },
            Self::Vibrant => ThemeColors {
                primary: Rgb(213, 0, 82),
                secondary: Rgb(35, 35, 35),
                accent: Rgb(64, 224, 208),
                background: Rgb(248, 248, 248),
                text: Rgb(30, 30, 30),
            },
            Self::Minimal => ThemeColors {
                primary: Rgb(70, 70, 70),
                secondary: Rgb(160, 160, 160),
                accent: Rgb(255, 103, 77),
                background: Rgb(250, 250, 250),
                text: Rgb(40, 40, 40),
            },
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
