use crate::game::{GameState, Point};

pub const EMPTY_CELL: char = '.';
pub const BODY_CELL: char = 'o';
pub const HEAD_CELL: char = '+';
pub const FOOD_CELL: char = 'x';

/// Plain-text picture of the field for inspection
///
/// One line per row; food is drawn over the snake when they overlap. Segments
/// outside the field are not drawn.
pub fn render_text(state: &GameState) -> String {
    let width = state.field_size.x.max(0) as usize;
    let height = state.field_size.y.max(0) as usize;
    let mut grid = vec![vec![EMPTY_CELL; width]; height];

    let mut put = |pos: Point, symbol: char| {
        if state.is_in_bounds(pos) {
            grid[pos.y as usize][pos.x as usize] = symbol;
        }
    };

    for &segment in state.body_segments() {
        put(segment, BODY_CELL);
    }
    put(state.head(), HEAD_CELL);
    put(state.food, FOOD_CELL);

    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
