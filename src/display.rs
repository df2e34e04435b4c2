use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoFont, MonoTextStyle},
    prelude::*,
    text::{Baseline, Text},
};

use crate::telemetry::StatusDisplay;

/// Two rows of monospace text on any `embedded-graphics` target, redrawn from
/// scratch on every render.
pub struct LineDisplay<D, C> {
    target: D,
    font: &'static MonoFont<'static>,
    origin: Point,
    foreground: C,
    background: C,
}

impl<D, C> LineDisplay<D, C>
where
    D: DrawTarget<Color = C>,
    C: PixelColor,
{
    pub fn new(target: D, foreground: C, background: C) -> Self {
        Self {
            target,
            font: &FONT_10X20,
            origin: Point::zero(),
            foreground,
            background,
        }
    }

    pub fn with_font(mut self, font: &'static MonoFont<'static>) -> Self {
        self.font = font;
        self
    }

    /// Top-left corner of the first row.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    pub fn target(&mut self) -> &mut D {
        &mut self.target
    }

    fn row_pitch(&self) -> i32 {
        (self.font.character_size.height + self.font.character_size.height / 4) as i32
    }
}

impl<D, C> StatusDisplay for LineDisplay<D, C>
where
    D: DrawTarget<Color = C>,
    C: PixelColor,
{
    fn render(&mut self, top: &str, bottom: &str) {
        let style = MonoTextStyle::new(self.font, self.foreground);
        let second_row = self.origin + Point::new(0, self.row_pitch());

        self.target.clear(self.background).ok();
        Text::with_baseline(top, self.origin, style, Baseline::Top)
            .draw(&mut self.target)
            .ok();
        Text::with_baseline(bottom, second_row, style, Baseline::Top)
            .draw(&mut self.target)
            .ok();
    }
}
