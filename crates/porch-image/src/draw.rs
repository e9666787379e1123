//! Box overlays for annotated frames.

use porch_base::{Rect, Tensor};

/// Fixed palette cycled by class id.
pub const PALETTE: [[u8; 3]; 8] = [
    [230, 57, 70],
    [29, 53, 87],
    [69, 123, 157],
    [42, 157, 143],
    [233, 196, 106],
    [244, 162, 97],
    [38, 70, 83],
    [168, 218, 220],
];

/// Color assigned to a class id.
pub fn class_color(class_id: usize) -> [u8; 3] {
    PALETTE[class_id % PALETTE.len()]
}

fn put_pixel(frame: &mut Tensor<u8>, x: usize, y: usize, color: [u8; 3]) {
    let (h, w) = (frame.shape[0], frame.shape[1]);
    if x >= w || y >= h {
        return;
    }
    let idx = (y * w + x) * 3;
    frame.data[idx..idx + 3].copy_from_slice(&color);
}

/// Draw a rectangle outline onto an RGB8 frame `[height, width, 3]`.
///
/// The box is clipped to the frame; a box wholly outside is a no-op.
/// Fractional coordinates are truncated to pixels.
pub fn draw_box(frame: &mut Tensor<u8>, rect: Rect<f32>, color: [u8; 3], thickness: usize) {
    if frame.shape.len() != 3 || frame.shape[2] != 3 {
        return;
    }
    let (h, w) = (frame.shape[0] as f32, frame.shape[1] as f32);

    let x0 = rect.origin.x.max(0.0);
    let y0 = rect.origin.y.max(0.0);
    let x1 = (rect.origin.x + rect.size.x).min(w);
    let y1 = (rect.origin.y + rect.size.y).min(h);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let (x0, y0, x1, y1) = (x0 as usize, y0 as usize, x1 as usize, y1 as usize);

    // Thickness never exceeds the box itself
    let t_max = thickness.max(1).min((y1 - y0).div_ceil(2)).min((x1 - x0).div_ceil(2));

    for t in 0..t_max {
        // Horizontal edges
        for x in x0..x1 {
            put_pixel(frame, x, y0 + t, color);
            put_pixel(frame, x, y1 - 1 - t, color);
        }
        // Vertical edges
        for y in y0..y1 {
            put_pixel(frame, x0 + t, y, color);
            put_pixel(frame, x1 - 1 - t, y, color);
        }
    }
}
