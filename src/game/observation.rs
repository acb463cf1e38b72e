//! Fixed-layout observation vector for a policy
//!
//! Layout: `[up, down, left, right, reward, length, window...]`
//!
//! - `up`/`down`/`left`/`right`: 1.0 when the food lies strictly in that
//!   direction from the head on the corresponding axis
//! - `reward`: cumulative episode reward
//! - `length`: number of body segments
//! - `window`: row-major `window_size x window_size` occupancy patch centered
//!   on the head

use super::state::GameState;

/// Number of scalar features ahead of the window
pub const FEATURE_COUNT: usize = 6;

/// Index of the cumulative reward feature
pub const REWARD_INDEX: usize = 4;

/// Index of the body length feature
pub const LENGTH_INDEX: usize = 5;

/// Total observation length for a window of side `window_size`
pub fn observation_len(window_size: usize) -> usize {
    FEATURE_COUNT + window_size * window_size
}

/// Encode the state into a flat observation vector
///
/// The occupancy grid is the field padded by `w = (window_size - 1) / 2` on
/// every side. Body cells and the outermost ring of the padded grid are 1.0.
/// Window cells beyond the padded grid, reachable only once the head has left
/// the field, read as 1.0 as well.
pub fn encode_observation(state: &GameState, window_size: usize) -> Vec<f32> {
    let head = state.head();
    let food = state.food;

    let mut observation = Vec::with_capacity(observation_len(window_size));
    observation.push(flag(food.y < head.y));
    observation.push(flag(food.y > head.y));
    observation.push(flag(food.x < head.x));
    observation.push(flag(food.x > head.x));
    observation.push(state.reward as f32);
    observation.push(state.len() as f32);

    observation.extend(occupancy_window(state, window_size));

    observation
}

/// Read the window cell at offset `(dx, dy)` from the head
///
/// Returns `None` if the offset lies outside the window or the slice is not a
/// full observation for `window_size`.
pub fn window_cell(observation: &[f32], window_size: usize, dx: i32, dy: i32) -> Option<f32> {
    if observation.len() != observation_len(window_size) {
        return None;
    }

    let w = (window_size / 2) as i32;
    if dx.abs() > w || dy.abs() > w {
        return None;
    }

    let row = (dy + w) as usize;
    let col = (dx + w) as usize;
    observation
        .get(FEATURE_COUNT + row * window_size + col)
        .copied()
}

/// Infer the window size from an observation length
pub fn window_size_of(observation: &[f32]) -> Option<usize> {
    let cells = observation.len().checked_sub(FEATURE_COUNT)?;
    let side = (cells as f64).sqrt() as usize;
    (side * side == cells && side % 2 == 1).then_some(side)
}

fn flag(condition: bool) -> f32 {
    if condition { 1.0 } else { 0.0 }
}

/// Row-major `window_size x window_size` patch of the padded occupancy grid
///
/// Only the window is computed: a cell is occupied when it lies on or beyond
/// the outermost ring of the padded grid, or holds a body segment.
fn occupancy_window(state: &GameState, window_size: usize) -> Vec<f32> {
    let side = window_size as i64;
    let pad = (side - 1) / 2;
    let width = i64::from(state.field_size.x) + 2 * pad;
    let height = i64::from(state.field_size.y) + 2 * pad;

    // Window top-left in padded coordinates is (head + w) - w == head
    let head = state.head();
    let (left, top) = (i64::from(head.x), i64::from(head.y));

    let mut window = vec![0.0; window_size * window_size];
    for dy in 0..side {
        for dx in 0..side {
            let (x, y) = (left + dx, top + dy);
            if x <= 0 || y <= 0 || x >= width - 1 || y >= height - 1 {
                window[(dy * side + dx) as usize] = 1.0;
            }
        }
    }

    for segment in &state.body {
        let dx = i64::from(segment.x) + pad - left;
        let dy = i64::from(segment.y) + pad - top;
        if (0..side).contains(&dx) && (0..side).contains(&dy) {
            window[(dy * side + dx) as usize] = 1.0;
        }
    }

    window
}
