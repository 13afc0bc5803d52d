use edge_vision::pipeline::{Intensity, PixelBuffer};

/// Left `edge_column` columns dark (0), the rest bright (255).
pub fn vertical_step(width: usize, height: usize, edge_column: usize) -> PixelBuffer {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let pixels = (0..width * height)
        .map(|i| if i % width < edge_column { 0 } else { 255 })
        .collect();
    PixelBuffer::new(width, height, pixels).unwrap()
}

/// Deterministic pseudo-random intensities (xorshift), mostly clustered into blobs
/// so both rules see a mix of uniform and edge neighborhoods.
pub fn noisy_blobs(width: usize, height: usize, seed: u64) -> PixelBuffer {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut state = seed.max(1);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    let cell = 6;
    let cells_x = width.div_ceil(cell);
    let cells_y = height.div_ceil(cell);
    let levels: Vec<Intensity> = (0..cells_x * cells_y)
        .map(|_| if next() % 2 == 0 { 40 } else { 210 })
        .collect();

    let pixels = (0..width * height)
        .map(|i| {
            let (y, x) = (i / width, i % width);
            let base = levels[(y / cell) * cells_x + x / cell];
            let jitter = (next() % 31) as Intensity - 15;
            (base + jitter).clamp(0, 255)
        })
        .collect();
    PixelBuffer::new(width, height, pixels).unwrap()
}
