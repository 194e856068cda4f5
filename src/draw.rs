use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyleBuilder},
    prelude::*,
    primitives::{Line, PrimitiveStyleBuilder},
    text::{Baseline, Text},
};

use crate::display::color::InkColor;

pub fn draw_line<D>(
    target: &mut D,
    start: Point,
    end: Point,
    color: InkColor,
    width: u32
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = InkColor>
{
    Line::new(start, end)
        .into_styled(PrimitiveStyleBuilder::new().stroke_width(width).stroke_color(color).build())
        .draw(target)?;
    Ok(())
}

pub fn draw_pixel<D>(target: &mut D, at: Point, color: InkColor) -> Result<(), D::Error>
where
    D: DrawTarget<Color = InkColor>,
{
    Pixel(at, color).draw(target)
}

/// Text anchored at its top-left corner, glyph pixels only (no background fill)
pub fn draw_text<D>(
    target: &mut D,
    text: &str,
    at: Point,
    font: &MonoFont,
    color: InkColor,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = InkColor>,
{
    Text::with_baseline(
        text,
        at,
        MonoTextStyleBuilder::new()
            .font(font)
            .text_color(color)
            .build(),
        Baseline::Top,
    )
    .draw(target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vframebuf::Canvas;
    use embedded_graphics::mono_font::ascii::FONT_6X10;
    use embedded_graphics::primitives::Rectangle;

    #[test]
    fn test_line_and_pixel() {
        let mut canvas = Canvas::new(20, 10, InkColor::Black);
        draw_line(&mut canvas, Point::new(2, 5), Point::new(12, 5), InkColor::White, 1).unwrap();
        draw_pixel(&mut canvas, Point::new(12, 5), InkColor::Accent).unwrap();
        assert_eq!(canvas.get_pixel(2, 5), Some(InkColor::White));
        assert_eq!(canvas.get_pixel(11, 5), Some(InkColor::White));
        assert_eq!(canvas.get_pixel(12, 5), Some(InkColor::Accent));
        assert_eq!(canvas.get_pixel(2, 4), Some(InkColor::Black));
    }

    #[test]
    fn test_text_leaves_background() {
        let mut canvas = Canvas::new(40, 20, InkColor::Black);
        draw_text(&mut canvas, "T", Point::new(0, 0), &FONT_6X10, InkColor::Accent).unwrap();
        let glyph = Rectangle::new(Point::zero(), Size::new(6, 10));
        assert!(canvas.count_in(&glyph, InkColor::Accent) > 0);
        assert!(canvas.count_in(&glyph, InkColor::Black) > 0);
        assert_eq!(canvas.count_in(&glyph, InkColor::White), 0);
    }
}
