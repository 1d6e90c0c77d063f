//! Plain-text rendering of board views and coordinate parsing for the
//! terminal front ends.

use std::fmt::Write;

use crate::config::MAX_BOARD_SIZE;
use crate::domain::BoardView;

/// Render a board view as a lettered grid: `S` ship, `X` hit, `o` miss,
/// `.` water or unknown. Boards larger than the supported maximum are cut
/// down to it.
pub fn render_board(view: &BoardView) -> String {
    let size = view.size.min(MAX_BOARD_SIZE);
    let mut out = String::new();
    out.push_str("    ");
    for x in 0..size {
        let _ = write!(out, " {}", column_letter(x));
    }
    out.push('\n');
    for (y, row) in view.cells.chunks(view.size.max(1)).take(size).enumerate() {
        let _ = write!(out, "  {:2}", y + 1);
        for cell in row.iter().take(size) {
            let ch = if cell.is_hit {
                'X'
            } else if cell.is_miss {
                'o'
            } else if cell.is_ship {
                'S'
            } else {
                '.'
            };
            let _ = write!(out, " {}", ch);
        }
        out.push('\n');
    }
    out
}

fn column_letter(x: usize) -> char {
    (b'A' + x as u8) as char
}

/// Parse input like `C7` into zero-based `(x, y)` for a board of side
/// `size`. The letter picks the column, the number the row.
pub fn parse_coord(input: &str, size: usize) -> Result<(i32, i32), String> {
    let input = input.trim();
    let size = size.min(MAX_BOARD_SIZE);
    let last_col = column_letter(size.saturating_sub(1));
    let mut chars = input.chars();
    let col_ch = chars
        .next()
        .ok_or("Empty input")?
        .to_ascii_uppercase();
    if !col_ch.is_ascii_alphabetic() {
        return Err(format!("Invalid column '{}' - must be a letter A-{}", col_ch, last_col));
    }
    let x = (col_ch as u8 - b'A') as usize;
    if x >= size {
        return Err(format!("Column '{}' out of bounds - must be A-{}", col_ch, last_col));
    }
    let row_str = chars.as_str().trim();
    let row: usize = row_str
        .parse()
        .map_err(|_| format!("Invalid row '{}' - must be a number 1-{}", row_str, size))?;
    if row == 0 || row > size {
        return Err(format!("Row {} out of bounds - must be 1-{}", row, size));
    }
    Ok((x as i32, (row - 1) as i32))
}
