// src/ui.rs
use iced::Color;
use once_cell::sync::Lazy;

use crate::panel::Banner;

pub struct Styles {
    pub fg: Color,
    pub muted_fg: Color,
    pub success_fg: Color,
    pub warning_fg: Color,
    pub error_fg: Color,
}

impl Styles {
    pub fn banner_color(&self, banner: &Banner) -> Color {
        match banner {
            Banner::Success(_) => self.success_fg,
            Banner::Warning(_) => self.warning_fg,
            Banner::Error(_) => self.error_fg,
        }
    }
}

pub static PALETTE: Lazy<Styles> = Lazy::new(|| Styles {
    fg: Color::from_rgb(0.1922, 0.2, 0.2471),          // #31333f
    muted_fg: Color::from_rgb(0.5, 0.5, 0.55),
    success_fg: Color::from_rgb(0.0353, 0.4588, 0.2078), // #097535
    warning_fg: Color::from_rgb(0.5765, 0.4, 0.0),       // #936600
    error_fg: Color::from_rgb(0.6196, 0.1098, 0.1098),   // #9e1c1c
});
