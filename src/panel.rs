extern crate image;
extern crate imageproc;
extern crate rusttype;
extern crate std;

use crate::render;
use crate::result;

/// Draw-command sink for the render loop. The hardware matrix driver
/// implements this on the device; `ImagePanel` implements it for
/// development, tests, and the debug server.
pub trait Panel {
    fn clear(&mut self);
    fn draw_text(&mut self, x: i32, y: i32, color: render::Color, text: &str);
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: render::Color);
    fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, color: render::Color);
    /// Blocks until the frame is out (vsync-equivalent on real hardware).
    fn swap_frame(&mut self) -> result::RailsignResult<()>;

    fn apply(&mut self, ops: &[render::DrawOp]) {
        for op in ops {
            match op {
                render::DrawOp::Clear => self.clear(),
                render::DrawOp::Text{x, y, color, text} =>
                    self.draw_text(*x, *y, *color, text),
                render::DrawOp::Line{x0, y0, x1, y1, color} =>
                    self.draw_line(*x0, *y0, *x1, *y1, *color),
                render::DrawOp::Circle{cx, cy, r, color} =>
                    self.draw_circle(*cx, *cy, *r, *color),
            }
        }
    }
}

/// Renders into an RGB image buffer; each frame swap writes the buffer to
/// a PNG so the current frame is inspectable (and servable by the debug
/// server) without the hardware attached.
pub struct ImagePanel {
    imgbuf: image::RgbImage,
    font: rusttype::Font<'static>,
    png_out: Option<String>,
}

impl ImagePanel {
    pub fn new(font_path: &str, png_out: Option<String>) -> result::RailsignResult<ImagePanel> {
        let font_data = std::fs::read(font_path)?;
        let font = rusttype::Font::try_from_vec(font_data)
            .ok_or(result::make_error(&format!("Could not load font: {}", font_path)))?;

        return Ok(ImagePanel {
            imgbuf: image::RgbImage::new(
                render::SCREEN_WIDTH as u32, render::SCREEN_HEIGHT as u32),
            font: font,
            png_out: png_out,
        });
    }
}

fn pixel(color: render::Color) -> image::Rgb<u8> {
    return image::Rgb([color.r, color.g, color.b]);
}

fn scale(s: f32) -> rusttype::Scale {
    return rusttype::Scale{x: s, y: s};
}

impl Panel for ImagePanel {
    fn clear(&mut self) {
        imageproc::drawing::draw_filled_rect_mut(
            &mut self.imgbuf,
            imageproc::rect::Rect::at(0, 0).of_size(
                render::SCREEN_WIDTH as u32, render::SCREEN_HEIGHT as u32),
            pixel(render::COLOR_OFF));
    }

    fn draw_text(&mut self, x: i32, y: i32, color: render::Color, text: &str) {
        imageproc::drawing::draw_text_mut(
            &mut self.imgbuf, pixel(color), x, y,
            scale(render::FONT_HEIGHT as f32), &self.font, text);
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: render::Color) {
        imageproc::drawing::draw_line_segment_mut(
            &mut self.imgbuf,
            (x0 as f32, y0 as f32), (x1 as f32, y1 as f32),
            pixel(color));
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, color: render::Color) {
        imageproc::drawing::draw_hollow_circle_mut(
            &mut self.imgbuf, (cx, cy), r, pixel(color));
    }

    fn swap_frame(&mut self) -> result::RailsignResult<()> {
        if let Some(ref path) = self.png_out {
            self.imgbuf.save(path)?;
        }
        return Ok(());
    }
}
