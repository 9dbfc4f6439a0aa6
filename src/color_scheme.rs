//! Visual themes and the measurement color palette.
//!
//! Every committed measurement gets its own palette color so shapes stay
//! visually distinguishable on the plan and in the table. The palette is a
//! process-wide value updated whenever a scheme is applied; allocation
//! itself is deterministic so tests (and report re-generation) see stable
//! colors.

use egui::{Color32, Context, Visuals};
use once_cell::sync::Lazy;
use std::sync::Mutex;

static MEASUREMENT_PALETTE: Lazy<Mutex<Vec<Color32>>> =
    Lazy::new(|| Mutex::new(ColorScheme::Dark.measurement_colors()));

/// Get a copy of the current measurement color palette.
pub fn measurement_palette() -> Vec<Color32> {
    MEASUREMENT_PALETTE.lock().unwrap().clone()
}

pub(crate) fn set_measurement_palette(new: Vec<Color32>) {
    let mut guard = MEASUREMENT_PALETTE.lock().unwrap();
    *guard = new;
}

/// Pick a color for a newly committed measurement.
///
/// `used` is the list of colors already on screen, in creation order. The
/// first palette color not among the most recently used `palette.len() - 1`
/// colors wins, so neighbours in the list always differ as far as the
/// palette allows; once every color is in use the palette simply cycles.
pub fn alloc_color(used: &[Color32]) -> Color32 {
    let palette = measurement_palette();
    debug_assert!(!palette.is_empty());
    let window = palette.len().saturating_sub(1);
    let recent: Vec<Color32> = used.iter().rev().take(window).copied().collect();
    palette
        .iter()
        .find(|c| !recent.contains(c))
        .copied()
        .unwrap_or_else(|| palette[used.len() % palette.len()])
}

/// Cycle an existing measurement to the next palette color, skipping colors
/// other measurements currently hold where the palette allows.
pub fn next_color(current: Color32, taken: &[Color32]) -> Color32 {
    let palette = measurement_palette();
    debug_assert!(!palette.is_empty());
    let start = palette
        .iter()
        .position(|c| *c == current)
        .map(|i| i + 1)
        .unwrap_or(0);
    for off in 0..palette.len() {
        let cand = palette[(start + off) % palette.len()];
        if cand != current && !taken.contains(&cand) {
            return cand;
        }
    }
    palette[start % palette.len()]
}

/// Visual theme for the tool.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorScheme {
    /// Dark chrome; default.
    Dark,
    /// Light chrome, for bright scanned plans.
    Light,
    /// Pure-black chrome with maximally saturated overlay colors.
    HighContrast,
    /// User-defined scheme.
    Custom(CustomColorScheme),
}

/// User-defined color scheme.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomColorScheme {
    /// Visuals for the egui context (falls back to dark when `None`).
    pub visuals: Option<Visuals>,
    /// Measurement color palette.
    pub palette: Vec<Color32>,
    /// Optional label for UI display.
    pub label: Option<String>,
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme::Dark
    }
}

impl ColorScheme {
    /// All built-in schemes (useful for combo-box UIs).
    pub fn all() -> &'static [ColorScheme] {
        &[
            ColorScheme::Dark,
            ColorScheme::Light,
            ColorScheme::HighContrast,
        ]
    }

    /// Human-readable label.
    pub fn label(&self) -> String {
        match self {
            ColorScheme::Dark => "Dark".to_string(),
            ColorScheme::Light => "Light".to_string(),
            ColorScheme::HighContrast => "High Contrast".to_string(),
            ColorScheme::Custom(custom) => {
                custom.label.clone().unwrap_or_else(|| "Custom".to_string())
            }
        }
    }

    /// Apply this scheme's visuals to an egui context and refresh the
    /// process-wide measurement palette to match.
    pub fn apply(&self, ctx: &Context) {
        match self {
            ColorScheme::Dark => ctx.set_visuals(Visuals::dark()),
            ColorScheme::Light => ctx.set_visuals(Visuals::light()),
            ColorScheme::HighContrast => {
                let mut v = Visuals::dark();
                v.panel_fill = Color32::BLACK;
                v.window_fill = Color32::from_rgb(10, 10, 10);
                v.extreme_bg_color = Color32::BLACK;
                v.faint_bg_color = Color32::from_rgb(20, 20, 20);
                v.override_text_color = Some(Color32::WHITE);
                v.widgets.noninteractive.bg_fill = Color32::from_rgb(20, 20, 20);
                v.widgets.noninteractive.fg_stroke.color = Color32::WHITE;
                ctx.set_visuals(v);
            }
            ColorScheme::Custom(custom) => {
                if let Some(visuals) = &custom.visuals {
                    ctx.set_visuals(visuals.clone());
                } else {
                    ctx.set_visuals(Visuals::dark());
                }
            }
        }

        set_measurement_palette(self.measurement_colors());
    }

    /// Measurement overlay palette for this scheme (8 colors). Chosen to
    /// stay readable over both white paper scans and dark CAD exports.
    pub fn measurement_colors(&self) -> Vec<Color32> {
        match self {
            ColorScheme::Dark | ColorScheme::Light => vec![
                Color32::from_rgb(214, 39, 40),
                Color32::from_rgb(31, 119, 180),
                Color32::from_rgb(44, 160, 44),
                Color32::from_rgb(255, 127, 14),
                Color32::from_rgb(148, 103, 189),
                Color32::from_rgb(140, 86, 75),
                Color32::from_rgb(227, 119, 194),
                Color32::from_rgb(23, 190, 207),
            ],
            ColorScheme::HighContrast => vec![
                Color32::from_rgb(255, 0, 0),
                Color32::from_rgb(0, 128, 255),
                Color32::from_rgb(0, 200, 0),
                Color32::from_rgb(255, 160, 0),
                Color32::from_rgb(200, 0, 255),
                Color32::from_rgb(160, 82, 45),
                Color32::from_rgb(255, 0, 160),
                Color32::from_rgb(0, 220, 220),
            ],
            ColorScheme::Custom(custom) => custom.palette.clone(),
        }
    }
}
