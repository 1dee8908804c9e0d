//! Shape rasterization and surface compositing on top of [`Surface`] pixel writes.
//!
//! Line, circle and ellipse use Alois Zingl's integer Bresenham formulations
//! (<https://github.com/zingl/Bresenham>, MIT). Shapes clip per pixel, so any integer
//! coordinates are safe; only [`blit_fast`] and [`blit_keyed_fast`] trust their caller.

use crate::surface::{PIXEL_MASK, Surface};

/// Line from `(x0, y0)` to `(x1, y1)`, both endpoints included.
///
/// Endpoints may be anywhere in `i32`. The line is clipped to the surface before the walk,
/// so far off-screen coordinates cost nothing and cannot overflow the error terms.
pub fn draw_line(surface: &mut Surface, x0: i32, y0: i32, x1: i32, y1: i32, color: u8) {
    let Some((mut x0, mut y0, x1, y1)) = clip_line(surface, x0, y0, x1, y1) else {
        return;
    };
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        surface.put_pixel(x0, y0, color);
        let e2 = 2 * err;
        if e2 >= dy {
            if x0 == x1 {
                break;
            }
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            if y0 == y1 {
                break;
            }
            err += dx;
            y0 += sy;
        }
    }
}

/// Liang-Barsky clip of a line against the pixel grid `[0, w-1] x [0, h-1]`.
///
/// Lines already on the surface pass through untouched; otherwise the clipped endpoints are
/// rounded back onto the grid. `None` when nothing of the line is visible.
fn clip_line(
    surface: &Surface,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
) -> Option<(i32, i32, i32, i32)> {
    if surface.contains(x0, y0) && surface.contains(x1, y1) {
        return Some((x0, y0, x1, y1));
    }
    if surface.width() == 0 || surface.height() == 0 {
        return None;
    }
    let xmax = (surface.width() - 1) as f64;
    let ymax = (surface.height() - 1) as f64;

    // i32 differences fit exactly in f64
    let (fx, fy) = (x0 as f64, y0 as f64);
    let dx = x1 as f64 - fx;
    let dy = y1 as f64 - fy;

    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [(-dx, fx), (dx, xmax - fx), (-dy, fy), (dy, ymax - fy)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| {
        (
            (fx + t * dx).round().clamp(0.0, xmax) as i32,
            (fy + t * dy).round().clamp(0.0, ymax) as i32,
        )
    };
    let (ax, ay) = at(t0);
    let (bx, by) = at(t1);
    Some((ax, ay, bx, by))
}

/// Circle outline of radius `r` around `(xm, ym)`. A radius of zero plots the center only.
pub fn draw_circle(surface: &mut Surface, xm: i32, ym: i32, r: i32, color: u8) {
    if r < 0 {
        return;
    }
    let mut x = -r;
    let mut y = 0;
    let mut err = 2 - 2 * r;

    loop {
        surface.put_pixel(xm - x, ym + y, color);
        surface.put_pixel(xm - y, ym - x, color);
        surface.put_pixel(xm + x, ym - y, color);
        surface.put_pixel(xm + y, ym + x, color);

        let prev = err;
        if prev <= y {
            y += 1;
            err += y * 2 + 1;
        }
        if prev > x || err > y {
            x += 1;
            err += x * 2 + 1;
        }
        if x >= 0 {
            break;
        }
    }
}

/// Axis-aligned ellipse with semi-axes `a` (horizontal) and `b` (vertical).
pub fn draw_ellipse(surface: &mut Surface, xm: i32, ym: i32, a: i32, b: i32, color: u8) {
    if a < 0 || b < 0 {
        return;
    }
    let a2 = a as i64 * a as i64;
    let b2 = b as i64 * b as i64;

    let mut x = -a;
    let mut y = 0;
    let mut err = x as i64 * (2 * b2 + x as i64) + b2;

    loop {
        surface.put_pixel(xm - x, ym + y, color);
        surface.put_pixel(xm + x, ym + y, color);
        surface.put_pixel(xm + x, ym - y, color);
        surface.put_pixel(xm - x, ym - y, color);

        let e2 = 2 * err;
        if e2 >= (x as i64 * 2 + 1) * b2 {
            x += 1;
            err += (x as i64 * 2 + 1) * b2;
        }
        if e2 <= (y as i64 * 2 + 1) * a2 {
            y += 1;
            err += (y as i64 * 2 + 1) * a2;
        }
        if x > 0 {
            break;
        }
    }

    // flat ellipses stop early (x reaches 0 before y reaches b); finish the tip
    while y < b {
        y += 1;
        surface.put_pixel(xm, ym + y, color);
        surface.put_pixel(xm, ym - y, color);
    }
}

/// Outline of the box `[x, x + width) x [y, y + height)`.
pub fn draw_rectangle(
    surface: &mut Surface,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    color: u8,
) {
    if width <= 0 || height <= 0 {
        return;
    }
    let (x0, y0) = (x, y);
    let (x1, y1) = (x.saturating_add(width - 1), y.saturating_add(height - 1));
    draw_line(surface, x0, y0, x1, y0, color);
    draw_line(surface, x1, y0, x1, y1, color);
    draw_line(surface, x1, y1, x0, y1, color);
    draw_line(surface, x0, y1, x0, y0, color);
}

/// Fills the box `[x, x + width) x [y, y + height)`, clipped to the surface.
pub fn draw_filled_rectangle(
    surface: &mut Surface,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    color: u8,
) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = x.saturating_add(width).min(surface.width() as i32);
    let y1 = y.saturating_add(height).min(surface.height() as i32);

    // clipped above, so the unchecked path is safe
    for py in y0..y1 {
        for px in x0..x1 {
            surface.set_pixel(px as u8, py as u8, color);
        }
    }
}

/// Copies `src` onto `dst` with its top-left at `(x, y)`; pixels landing outside `dst` are
/// skipped, so sprites may hang off any edge.
pub fn blit(dst: &mut Surface, src: &Surface, x: i16, y: i16) {
    composite(dst, src, x, y, None);
}

/// Like [`blit`], but source pixels equal to `key` are transparent.
pub fn blit_keyed(dst: &mut Surface, src: &Surface, x: i16, y: i16, key: u8) {
    composite(dst, src, x, y, Some(key & PIXEL_MASK));
}

/// Unchecked copy. `src` placed at `(x, y)` must lie entirely inside `dst`.
pub fn blit_fast(dst: &mut Surface, src: &Surface, x: u8, y: u8) {
    composite_fast(dst, src, x, y, None);
}

/// Unchecked color-keyed copy. Same containment contract as [`blit_fast`].
pub fn blit_keyed_fast(dst: &mut Surface, src: &Surface, x: u8, y: u8, key: u8) {
    composite_fast(dst, src, x, y, Some(key & PIXEL_MASK));
}

fn composite(dst: &mut Surface, src: &Surface, x: i16, y: i16, key: Option<u8>) {
    let (ox, oy) = (x as i32, y as i32);
    for sy in 0..src.height() {
        let dy = oy + sy as i32;
        if dy < 0 || dy >= dst.height() as i32 {
            continue;
        }
        for sx in 0..src.width() {
            let dx = ox + sx as i32;
            if dx < 0 || dx >= dst.width() as i32 {
                continue;
            }
            let c = src.get_pixel(sx, sy);
            if key == Some(c) {
                continue;
            }
            dst.set_pixel(dx as u8, dy as u8, c);
        }
    }
}

fn composite_fast(dst: &mut Surface, src: &Surface, x: u8, y: u8, key: Option<u8>) {
    debug_assert!(
        x as usize + src.width() as usize <= dst.width() as usize
            && y as usize + src.height() as usize <= dst.height() as usize,
        "fast blit of {}x{} at ({x}, {y}) overflows {}x{} destination",
        src.width(),
        src.height(),
        dst.width(),
        dst.height()
    );
    for sy in 0..src.height() {
        for sx in 0..src.width() {
            let c = src.get_pixel(sx, sy);
            if key == Some(c) {
                continue;
            }
            dst.set_pixel(x.wrapping_add(sx), y.wrapping_add(sy), c);
        }
    }
}
