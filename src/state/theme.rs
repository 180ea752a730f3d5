use egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    pub fn plot_bg(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(20, 20, 20),
            Theme::Light => Color32::from_rgb(255, 255, 255),
        }
    }

    pub fn axis_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_gray(170),
            Theme::Light => Color32::from_gray(40),
        }
    }

    pub fn grid_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgba_premultiplied(100, 100, 100, 60),
            Theme::Light => Color32::from_rgba_premultiplied(180, 180, 180, 80),
        }
    }

    pub fn mark_fill(&self) -> Color32 {
        Color32::from_rgb(0x89, 0xbd, 0xd3)
    }

    pub fn mark_stroke(&self) -> Color32 {
        Color32::from_rgb(0xe3, 0xe3, 0xe3)
    }

    pub fn mark_text(&self) -> Color32 {
        Color32::WHITE
    }

    pub fn active_label(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_gray(245),
            Theme::Light => Color32::BLACK,
        }
    }

    pub fn inactive_label(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_gray(110),
            Theme::Light => Color32::from_gray(0xc9),
        }
    }

    pub fn tooltip_bg(&self) -> Color32 {
        Color32::from_rgba_unmultiplied(0, 0, 0, 220)
    }

    pub fn tooltip_text(&self) -> Color32 {
        Color32::WHITE
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

/// `#rrggbb` form of a colour, for SVG output.
pub fn hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}
