//! Exact Euclidean distance-to-land field.
//!
//! Two-pass separable squared distance transform (Felzenszwalb & Huttenlocher):
//! columns first, then rows, over a row-major land mask.

/// Stand-in for "no land on this line yet". Finite so the parabola
/// intersections stay well defined.
const FAR: f64 = 1e20;

/// Distance in cells from every cell to the nearest land cell.
///
/// Land cells get 0. Returns `None` when the mask holds no land at all.
pub fn distance_to_land(land: &[bool], width: usize, height: usize) -> Option<Vec<f64>> {
    if width == 0 || height == 0 || !land.iter().any(|&l| l) {
        return None;
    }

    let mut grid: Vec<f64> = land.iter().map(|&l| if l { 0.0 } else { FAR }).collect();

    let longest = width.max(height);
    let mut line = vec![0.0; longest];
    let mut out = vec![0.0; longest];
    let mut hull = vec![0usize; longest];
    let mut bounds = vec![0.0; longest + 1];

    // Columns
    for col in 0..width {
        for row in 0..height {
            line[row] = grid[row * width + col];
        }
        transform_1d(&line[..height], &mut out[..height], &mut hull, &mut bounds);
        for row in 0..height {
            grid[row * width + col] = out[row];
        }
    }

    // Rows
    for row in 0..height {
        let start = row * width;
        line[..width].copy_from_slice(&grid[start..start + width]);
        transform_1d(&line[..width], &mut out[..width], &mut hull, &mut bounds);
        grid[start..start + width].copy_from_slice(&out[..width]);
    }

    Some(grid.into_iter().map(f64::sqrt).collect())
}

/// 1D squared distance transform of a sampled function (lower envelope of
/// parabolas rooted at each sample).
fn transform_1d(f: &[f64], d: &mut [f64], hull: &mut [usize], bounds: &mut [f64]) {
    let n = f.len();
    if n == 0 {
        return;
    }

    let intersect = |q: usize, p: usize| -> f64 {
        let (qf, pf) = (q as f64, p as f64);
        ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * qf - 2.0 * pf)
    };

    let mut k = 0usize;
    hull[0] = 0;
    bounds[0] = f64::NEG_INFINITY;
    bounds[1] = f64::INFINITY;

    for q in 1..n {
        let mut s = intersect(q, hull[k]);
        while s <= bounds[k] {
            k -= 1;
            s = intersect(q, hull[k]);
        }
        k += 1;
        hull[k] = q;
        bounds[k] = s;
        bounds[k + 1] = f64::INFINITY;
    }

    k = 0;
    for (q, out) in d.iter_mut().enumerate() {
        while bounds[k + 1] < q as f64 {
            k += 1;
        }
        let offset = q as f64 - hull[k] as f64;
        *out = offset * offset + f[hull[k]];
    }
}
