use crate::app::NotificationKind;
use crate::theme::ThemeMode;
use gpui::*;

/// One of the two fixed palettes
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    pub mode: ThemeMode,

    // Background colors
    pub background: Hsla,
    pub card_bg: Hsla,

    // Text colors
    pub text_primary: Hsla,
    pub text_secondary: Hsla,
    pub card_text: Hsla,

    pub border: Hsla,

    // Status colors
    pub success: Hsla,
    pub warning: Hsla,
    pub error: Hsla,
    pub info: Hsla,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            mode: ThemeMode::Light,

            background: hsla(0.0, 0.0, 0.98, 1.0),
            // OldLace
            card_bg: hsla(39.0 / 360.0, 0.85, 0.95, 1.0),

            text_primary: hsla(0.0, 0.0, 0.1, 1.0),
            text_secondary: hsla(0.0, 0.0, 0.35, 1.0),
            card_text: hsla(240.0 / 360.0, 0.02, 0.21, 1.0),

            border: hsla(0.0, 0.0, 0.0, 0.1),

            success: hsla(142.0 / 360.0, 0.71, 0.35, 1.0),
            warning: hsla(38.0 / 360.0, 0.92, 0.4, 1.0),
            error: hsla(0.0, 0.84, 0.5, 1.0),
            info: hsla(201.0 / 360.0, 0.96, 0.4, 1.0),
        }
    }

    pub fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,

            background: hsla(240.0 / 360.0, 0.02, 0.21, 1.0),
            card_bg: hsla(220.0 / 360.0, 0.13, 0.28, 1.0),

            text_primary: hsla(0.0, 0.0, 0.98, 1.0),
            text_secondary: hsla(0.0, 0.0, 0.7, 1.0),
            card_text: hsla(0.0, 0.0, 0.95, 1.0),

            border: hsla(0.0, 0.0, 1.0, 0.1),

            success: hsla(142.0 / 360.0, 0.71, 0.45, 1.0),
            warning: hsla(38.0 / 360.0, 0.92, 0.5, 1.0),
            error: hsla(0.0, 0.84, 0.6, 1.0),
            info: hsla(201.0 / 360.0, 0.96, 0.54, 1.0),
        }
    }

    /// Swap to the palette for `mode`
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    pub fn notification(&self, kind: NotificationKind) -> Hsla {
        match kind {
            NotificationKind::Success => self.success,
            NotificationKind::Warning => self.warning,
            NotificationKind::Error => self.error,
            NotificationKind::Info => self.info,
        }
    }
}
