//! ASCII plotting of an advancement series for terminal output.
//!
//! Fixed-size grid, deterministic output (golden-testable).
//!
//! Plot elements:
//! - zero line: `-`
//! - forward movement: `+`
//! - retrogression: `x`
//! - no movement: `o`
//!
//! The x-axis is bulletin date, so gaps in publication show up as gaps.

use crate::domain::AdvancementSample;

/// Render advancement samples as a scatter around the zero line.
pub fn render_advancement_plot(samples: &[AdvancementSample], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return "Plot: no advancement samples\n".to_string();
    };
    let t0 = first.observation_date;
    let span = (last.observation_date - t0).num_days() as f64;

    let (y_min, y_max) = y_range(samples);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Zero line first so samples overlay it.
    if y_min <= 0.0 && 0.0 <= y_max {
        let y0 = map_y(0.0, y_min, y_max, height);
        draw_line(&mut grid, 0, y0, width - 1, y0, '-');
    }

    for s in samples {
        let t = (s.observation_date - t0).num_days() as f64;
        let x = map_x(t, span, width);
        let y = map_y(s.days as f64, y_min, y_max, height);
        grid[y][x] = match s.days {
            d if d > 0 => '+',
            d if d < 0 => 'x',
            _ => 'o',
        };
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: bulletins=[{}, {}] | advance=[{y_min:.2}, {y_max:.2}] days\n",
        first.observation_date, last.observation_date
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn y_range(samples: &[AdvancementSample]) -> (f64, f64) {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for s in samples {
        min_y = min_y.min(s.days as f64);
        max_y = max_y.max(s.days as f64);
    }
    if max_y > min_y {
        (min_y, max_y)
    } else {
        (min_y - 1.0, max_y + 1.0)
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, span: f64, width: usize) -> usize {
    if span <= 0.0 {
        return 0;
    }
    let u = (t / span).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top (largest advance).
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish); never overwrites a marker.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
