//! Software 2D drawing surface
//!
//! [`Canvas`] is an RGBA8 pixel buffer with a small immediate-mode path API
//! (`begin_path`, `move_to`, `line_to`, `stroke`, `fill`), image blits and
//! raw pixel snapshots. Pixels are stored with straight (non-premultiplied)
//! alpha. The canvas background color is not part of the pixel data; it is
//! composited underneath only when the surface is presented, so clearing a
//! region reveals the background again.

use std::sync::Arc;

use gridscene_math::{Vec2, Vec4};

/// Largest width or height a canvas will allocate a context for
pub const MAX_DIMENSION: u32 = 16_384;

const BYTES_PER_PIXEL: usize = 4;

/// Shared, immutable image handle attached to drawable objects
pub type Texture = Arc<Image>;

/// Decoded RGBA8 image ready to be blitted
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Image {
    /// Wrap raw RGBA8 bytes
    ///
    /// Returns `None` when `data` does not hold exactly `width * height`
    /// pixels or either dimension is zero.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(BYTES_PER_PIXEL)?;
        if width == 0 || height == 0 || data.len() != expected {
            return None;
        }
        Some(Self { width, height, data })
    }

    /// Single-color image
    pub fn solid(width: u32, height: u32, color: Vec4) -> Option<Self> {
        let px = color_to_rgba8(color);
        let data = px
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * BYTES_PER_PIXEL)
            .collect();
        Self::from_rgba8(width, height, data)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}

/// Rectangular copy of canvas pixels
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageData {
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// RGBA8 value at `(x, y)`, or `None` outside the snapshot
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }
}

#[derive(Clone, Debug, Default)]
struct SubPath {
    points: Vec<Vec2>,
}

/// Software drawing surface with a 2D-context style API
#[derive(Clone, Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    background: Vec4,
    fill_style: Vec4,
    stroke_style: Vec4,
    line_width: f32,
    path: Vec<SubPath>,
}

impl Canvas {
    /// Allocate a transparent canvas
    ///
    /// Returns `None` when no 2D context can be obtained for the requested
    /// dimensions (zero-sized or larger than [`MAX_DIMENSION`]).
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return None;
        }
        let len = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(BYTES_PER_PIXEL)?;

        Some(Self {
            width,
            height,
            pixels: vec![0; len],
            background: Vec4::ZERO,
            fill_style: Vec4::BLACK,
            stroke_style: Vec4::BLACK,
            line_width: 1.0,
            path: Vec::new(),
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixels without the background
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA8 value at `(x, y)` without the background
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }

    /// Color shown behind transparent pixels when presented
    pub fn set_background(&mut self, color: Vec4) {
        self.background = color;
    }

    pub fn background(&self) -> Vec4 {
        self.background
    }

    pub fn set_fill_style(&mut self, color: Vec4) {
        self.fill_style = color;
    }

    pub fn set_stroke_style(&mut self, color: Vec4) {
        self.stroke_style = color;
    }

    pub fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.line_width = width;
        }
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Reset a rectangle to fully transparent
    pub fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(x, y, x + width, y + height) else {
            return;
        };
        for py in y0..y1 {
            let start = self.index(x0, py);
            let end = self.index(x1 - 1, py) + BYTES_PER_PIXEL;
            self.pixels[start..end].fill(0);
        }
    }

    /// Reset the whole surface to fully transparent
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Discard the current path
    pub fn begin_path(&mut self) {
        self.path.clear();
    }

    /// Start a new sub-path at `point`
    pub fn move_to(&mut self, point: Vec2) {
        self.path.push(SubPath {
            points: vec![point],
        });
    }

    /// Extend the current sub-path; starts one if the path is empty
    pub fn line_to(&mut self, point: Vec2) {
        match self.path.last_mut() {
            Some(sub) => sub.points.push(point),
            None => self.move_to(point),
        }
    }

    /// Stroke the current path with the stroke style and line width
    ///
    /// Lines thinner than one pixel are drawn one pixel wide with their
    /// alpha scaled by the width.
    pub fn stroke(&mut self) {
        let (thickness, coverage) = if self.line_width < 1.0 {
            (1.0, self.line_width)
        } else {
            (self.line_width.round(), 1.0)
        };

        let segments: Vec<(Vec2, Vec2)> = self
            .path
            .iter()
            .flat_map(|sub| sub.points.windows(2).map(|w| (w[0], w[1])))
            .collect();

        let Some(mut mask) = self.mask_for(&segments, thickness) else {
            return;
        };

        let half = thickness / 2.0;
        // Only the part of a segment that can touch the mask is sampled
        let clip_min = Vec2::new(mask.x0 as f32 - thickness, mask.y0 as f32 - thickness);
        let clip_max = Vec2::new(mask.x1 as f32 + thickness, mask.y1 as f32 + thickness);
        for (a, b) in segments {
            let Some((a, b)) = clip_segment(a, b, clip_min, clip_max) else {
                continue;
            };
            let delta = b - a;
            let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;
            for i in 0..=steps {
                let t = i as f32 / steps as f32;
                let p = a + delta * t;
                let x0 = (p.x - half + 0.5).floor() as i64;
                let y0 = (p.y - half + 0.5).floor() as i64;
                let extent = thickness as i64;
                for py in y0..y0 + extent {
                    for px in x0..x0 + extent {
                        mask.cover(px, py, coverage);
                    }
                }
            }
        }

        let color = self.stroke_style;
        self.composite(&mask, color);
    }

    /// Fill the current path with the fill style (non-zero winding rule)
    ///
    /// Every sub-path is implicitly closed.
    pub fn fill(&mut self) {
        let edges: Vec<(Vec2, Vec2)> = self
            .path
            .iter()
            .filter(|sub| sub.points.len() > 2)
            .flat_map(|sub| {
                let n = sub.points.len();
                (0..n).map(move |i| (sub.points[i], sub.points[(i + 1) % n]))
            })
            .collect();

        let Some(mut mask) = self.mask_for(&edges, 0.0) else {
            return;
        };

        let mut crossings: Vec<(f32, i32)> = Vec::new();
        for py in mask.y0..mask.y1 {
            let yc = py as f32 + 0.5;
            crossings.clear();
            for &(p0, p1) in &edges {
                let (lo, hi, dir) = if p0.y < p1.y { (p0, p1, 1) } else { (p1, p0, -1) };
                if yc < lo.y || yc >= hi.y {
                    continue;
                }
                let x = lo.x + (yc - lo.y) * (hi.x - lo.x) / (hi.y - lo.y);
                crossings.push((x, dir));
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                let start = ((pair[0].0 - 0.5).ceil() as i64).max(mask.x0 as i64);
                let end = ((pair[1].0 - 0.5).ceil() as i64).min(mask.x1 as i64);
                for px in start..end {
                    mask.cover(px, py as i64, 1.0);
                }
            }
        }

        let color = self.fill_style;
        self.composite(&mask, color);
    }

    /// Blit `image` scaled into the destination rectangle (source-over)
    pub fn draw_image(&mut self, image: &Image, dx: f32, dy: f32, dw: f32, dh: f32) {
        if !(dw > 0.0 && dh > 0.0) {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.pixel_span(dx, dy, dx + dw, dy + dh) else {
            return;
        };

        for py in y0..y1 {
            let v = ((py as f32 + 0.5 - dy) / dh * image.height as f32).floor();
            let sy = (v.max(0.0) as u32).min(image.height - 1);
            for px in x0..x1 {
                let u = ((px as f32 + 0.5 - dx) / dw * image.width as f32).floor();
                let sx = (u.max(0.0) as u32).min(image.width - 1);
                let texel = image.texel(sx, sy);
                if texel[3] == 0 {
                    continue;
                }
                let i = self.index(px, py);
                blend_over(
                    &mut self.pixels[i..i + BYTES_PER_PIXEL],
                    [texel[0] as f32, texel[1] as f32, texel[2] as f32],
                    texel[3] as f32 / 255.0,
                );
            }
        }
    }

    /// Copy a rectangle of pixels; areas outside the canvas read as transparent
    pub fn get_image_data(&self, x: i32, y: i32, width: u32, height: u32) -> ImageData {
        let mut data = vec![0; width as usize * height as usize * BYTES_PER_PIXEL];
        for row in 0..height {
            let sy = y as i64 + row as i64;
            if sy < 0 || sy >= self.height as i64 {
                continue;
            }
            for col in 0..width {
                let sx = x as i64 + col as i64;
                if sx < 0 || sx >= self.width as i64 {
                    continue;
                }
                let src = self.index(sx as u32, sy as u32);
                let dst = (row as usize * width as usize + col as usize) * BYTES_PER_PIXEL;
                data[dst..dst + BYTES_PER_PIXEL]
                    .copy_from_slice(&self.pixels[src..src + BYTES_PER_PIXEL]);
            }
        }
        ImageData { width, height, data }
    }

    /// Write pixels verbatim at `(dx, dy)`, without blending
    pub fn put_image_data(&mut self, image: &ImageData, dx: i32, dy: i32) {
        for row in 0..image.height {
            let ty = dy as i64 + row as i64;
            if ty < 0 || ty >= self.height as i64 {
                continue;
            }
            for col in 0..image.width {
                let tx = dx as i64 + col as i64;
                if tx < 0 || tx >= self.width as i64 {
                    continue;
                }
                let src = (row as usize * image.width as usize + col as usize) * BYTES_PER_PIXEL;
                let dst = self.index(tx as u32, ty as u32);
                self.pixels[dst..dst + BYTES_PER_PIXEL]
                    .copy_from_slice(&image.data[src..src + BYTES_PER_PIXEL]);
            }
        }
    }

    /// Pixels composited over the background color, as shown on screen
    pub fn composited_rgba(&self) -> Vec<u8> {
        let bg = color_to_rgba8(self.background);
        let mut out = Vec::with_capacity(self.pixels.len());
        for px in self.pixels.chunks_exact(BYTES_PER_PIXEL) {
            let mut dst = bg;
            blend_over(
                &mut dst,
                [px[0] as f32, px[1] as f32, px[2] as f32],
                px[3] as f32 / 255.0,
            );
            out.extend_from_slice(&dst);
        }
        out
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Pixel range whose centers fall inside `[x0, x1) x [y0, y1)`, clipped
    fn pixel_span(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> Option<(u32, u32, u32, u32)> {
        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            return None;
        }
        let clamp_x = |v: f32| (v - 0.5).ceil().clamp(0.0, self.width as f32) as u32;
        let clamp_y = |v: f32| (v - 0.5).ceil().clamp(0.0, self.height as f32) as u32;
        let (sx, ex) = (clamp_x(x0.min(x1)), clamp_x(x0.max(x1)));
        let (sy, ey) = (clamp_y(y0.min(y1)), clamp_y(y0.max(y1)));
        if sx >= ex || sy >= ey {
            return None;
        }
        Some((sx, sy, ex, ey))
    }

    fn mask_for(&self, segments: &[(Vec2, Vec2)], pad: f32) -> Option<Mask> {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for &(a, b) in segments {
            if !(a.is_finite() && b.is_finite()) {
                return None;
            }
            min = min.min_components(a).min_components(b);
            max = max.max_components(a).max_components(b);
        }
        if segments.is_empty() {
            return None;
        }
        let x0 = (min.x - pad - 1.0).floor().clamp(0.0, self.width as f32) as u32;
        let y0 = (min.y - pad - 1.0).floor().clamp(0.0, self.height as f32) as u32;
        let x1 = (max.x + pad + 2.0).ceil().clamp(0.0, self.width as f32) as u32;
        let y1 = (max.y + pad + 2.0).ceil().clamp(0.0, self.height as f32) as u32;
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Mask::new(x0, y0, x1, y1))
    }

    fn composite(&mut self, mask: &Mask, color: Vec4) {
        let rgb = [
            color.r().clamp(0.0, 255.0),
            color.g().clamp(0.0, 255.0),
            color.b().clamp(0.0, 255.0),
        ];
        let alpha = color.a().clamp(0.0, 1.0);
        if alpha == 0.0 {
            return;
        }
        for py in mask.y0..mask.y1 {
            for px in mask.x0..mask.x1 {
                let c = mask.get(px, py);
                if c <= 0.0 {
                    continue;
                }
                let i = self.index(px, py);
                blend_over(&mut self.pixels[i..i + BYTES_PER_PIXEL], rgb, alpha * c);
            }
        }
    }
}

/// Per-pixel coverage for one stroke or fill, so overlapping samples
/// composite once.
struct Mask {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
    coverage: Vec<f32>,
}

impl Mask {
    fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        let len = (x1 - x0) as usize * (y1 - y0) as usize;
        Self { x0, y0, x1, y1, coverage: vec![0.0; len] }
    }

    fn cover(&mut self, x: i64, y: i64, amount: f32) {
        if x < self.x0 as i64 || x >= self.x1 as i64 || y < self.y0 as i64 || y >= self.y1 as i64 {
            return;
        }
        let i = (y as usize - self.y0 as usize) * (self.x1 - self.x0) as usize
            + (x as usize - self.x0 as usize);
        self.coverage[i] = self.coverage[i].max(amount);
    }

    fn get(&self, x: u32, y: u32) -> f32 {
        let i = (y - self.y0) as usize * (self.x1 - self.x0) as usize + (x - self.x0) as usize;
        self.coverage[i]
    }
}

/// Part of segment `a`-`b` inside the rectangle `min`..`max` (Liang-Barsky)
fn clip_segment(a: Vec2, b: Vec2, min: Vec2, max: Vec2) -> Option<(Vec2, Vec2)> {
    let delta = b - a;
    let mut t0 = 0.0_f32;
    let mut t1 = 1.0_f32;
    for (p, q) in [
        (-delta.x, a.x - min.x),
        (delta.x, max.x - a.x),
        (-delta.y, a.y - min.y),
        (delta.y, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((a + delta * t0, a + delta * t1))
}

/// Convert an `rgba()`-style color to RGBA8
pub fn color_to_rgba8(color: Vec4) -> [u8; 4] {
    [
        color.r().clamp(0.0, 255.0).round() as u8,
        color.g().clamp(0.0, 255.0).round() as u8,
        color.b().clamp(0.0, 255.0).round() as u8,
        (color.a().clamp(0.0, 1.0) * 255.0).round() as u8,
    ]
}

/// Source-over blend of a straight-alpha color onto an RGBA8 pixel
fn blend_over(dst: &mut [u8], src: [f32; 3], src_alpha: f32) {
    let da = dst[3] as f32 / 255.0;
    let out_a = src_alpha + da * (1.0 - src_alpha);
    if out_a <= 0.0 {
        dst.fill(0);
        return;
    }
    for c in 0..3 {
        let value = (src[c] * src_alpha + dst[c] as f32 * da * (1.0 - src_alpha)) / out_a;
        dst[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Vec4 = Vec4::rgba(255.0, 0.0, 0.0, 1.0);

    fn square(canvas: &mut Canvas, x: f32, y: f32, size: f32) {
        canvas.begin_path();
        canvas.move_to(Vec2::new(x, y));
        canvas.line_to(Vec2::new(x, y + size));
        canvas.line_to(Vec2::new(x + size, y + size));
        canvas.line_to(Vec2::new(x + size, y));
    }

    #[test]
    fn test_clip_segment() {
        let min = Vec2::ZERO;
        let max = Vec2::splat(10.0);
        let (a, b) = clip_segment(Vec2::new(-1.0e7, 5.0), Vec2::new(1.0e7, 5.0), min, max).unwrap();
        assert!(a.x.abs() < 2.0 && (b.x - 10.0).abs() < 2.0, "{:?} {:?}", a, b);
        assert_eq!((a.y, b.y), (5.0, 5.0));
        assert!(clip_segment(Vec2::new(-5.0, -1.0), Vec2::new(20.0, -1.0), min, max).is_none());
        let inside = (Vec2::new(2.0, 3.0), Vec2::new(4.0, 8.0));
        assert_eq!(clip_segment(inside.0, inside.1, min, max), Some(inside));
    }

    #[test]
    fn test_huge_paths_stay_within_surface_cost() {
        let start = std::time::Instant::now();
        let mut canvas = Canvas::new(100, 100).unwrap();
        canvas.set_fill_style(RED);
        square(&mut canvas, -1.0e7, 10.0, 2.0e7);
        canvas.fill();
        canvas.set_stroke_style(RED);
        canvas.stroke();
        assert!(start.elapsed() < std::time::Duration::from_secs(2));
        assert_eq!(canvas.pixel(50, 50), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_context_unavailable_for_zero_size() {
        assert!(Canvas::new(0, 10).is_none());
        assert!(Canvas::new(10, 0).is_none());
        assert!(Canvas::new(MAX_DIMENSION + 1, 10).is_none());
        assert!(Canvas::new(10, 10).is_some());
    }

    #[test]
    fn test_fill_square_covers_exact_pixels() {
        let mut canvas = Canvas::new(20, 20).unwrap();
        canvas.set_fill_style(RED);
        square(&mut canvas, 5.0, 5.0, 10.0);
        canvas.fill();

        assert_eq!(canvas.pixel(5, 5), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(14, 14), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(4, 5), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(15, 15), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_fill_translucent_blends_once() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.set_fill_style(Vec4::rgba(0.0, 0.0, 255.0, 0.5));
        square(&mut canvas, 0.0, 0.0, 4.0);
        canvas.fill();
        assert_eq!(canvas.pixel(1, 1).unwrap()[3], 128);
    }

    #[test]
    fn test_stroke_horizontal_line() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.set_stroke_style(RED);
        canvas.begin_path();
        canvas.move_to(Vec2::new(0.0, 5.0));
        canvas.line_to(Vec2::new(10.0, 5.0));
        canvas.stroke();

        for x in 0..10 {
            assert_eq!(canvas.pixel(x, 5), Some([255, 0, 0, 255]), "x = {}", x);
        }
        assert_eq!(canvas.pixel(3, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_thin_stroke_attenuates_alpha() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.set_line_width(0.1);
        canvas.begin_path();
        canvas.move_to(Vec2::new(5.0, 0.0));
        canvas.line_to(Vec2::new(5.0, 10.0));
        canvas.stroke();

        let px = canvas.pixel(5, 4).unwrap();
        assert!(px[3] > 0 && px[3] < 64, "alpha {}", px[3]);
    }

    #[test]
    fn test_clear_rect() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        canvas.set_fill_style(RED);
        square(&mut canvas, 0.0, 0.0, 8.0);
        canvas.fill();
        canvas.clear_rect(0.0, 0.0, 4.0, 8.0);

        assert_eq!(canvas.pixel(3, 3), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(4, 3), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_image_data_round_trip_replaces_pixels() {
        let mut source = Canvas::new(6, 6).unwrap();
        source.set_fill_style(RED);
        square(&mut source, 0.0, 0.0, 3.0);
        source.fill();
        let snapshot = source.get_image_data(0, 0, 6, 6);

        let mut target = Canvas::new(6, 6).unwrap();
        target.set_fill_style(Vec4::rgba(0.0, 255.0, 0.0, 1.0));
        square(&mut target, 0.0, 0.0, 6.0);
        target.fill();
        target.put_image_data(&snapshot, 0, 0);

        // put_image_data does not blend: transparent pixels overwrite
        assert_eq!(target.pixel(5, 5), Some([0, 0, 0, 0]));
        assert_eq!(target.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(target.data(), snapshot.data());
    }

    #[test]
    fn test_draw_image_scales_into_rect() {
        let image = Image::solid(2, 2, Vec4::rgba(0.0, 0.0, 255.0, 1.0)).unwrap();
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.draw_image(&image, 2.0, 2.0, 5.0, 5.0);

        assert_eq!(canvas.pixel(2, 2), Some([0, 0, 255, 255]));
        assert_eq!(canvas.pixel(6, 6), Some([0, 0, 255, 255]));
        assert_eq!(canvas.pixel(7, 7), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_image_ignores_degenerate_rect() {
        let image = Image::solid(1, 1, RED).unwrap();
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.draw_image(&image, 0.0, 0.0, 0.0, 4.0);
        assert!(canvas.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_composited_uses_background() {
        let mut canvas = Canvas::new(2, 1).unwrap();
        canvas.set_background(Vec4::WHITE);
        canvas.set_fill_style(RED);
        square(&mut canvas, 0.0, 0.0, 1.0);
        canvas.fill();

        let out = canvas.composited_rgba();
        assert_eq!(&out[0..4], &[255, 0, 0, 255]);
        assert_eq!(&out[4..8], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_image_from_rgba8_validates_length() {
        assert!(Image::from_rgba8(2, 2, vec![0; 16]).is_some());
        assert!(Image::from_rgba8(2, 2, vec![0; 15]).is_none());
        assert!(Image::from_rgba8(0, 2, vec![]).is_none());
    }

    #[test]
    fn test_line_to_without_move_starts_subpath() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.begin_path();
        canvas.line_to(Vec2::new(0.0, 1.0));
        canvas.line_to(Vec2::new(4.0, 1.0));
        canvas.stroke();
        assert_eq!(canvas.pixel(2, 1), Some([0, 0, 0, 255]));
    }
}
