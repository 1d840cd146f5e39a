//! VT100 escape sequence vocabulary.
//!
//! Every sequence the library emits comes from this module, byte for byte.
//! Constants cover the fixed sequences; the functions build the parameterized
//! ones (positioning, colors, relative moves and scrolling).

use crate::color::Rgb;

/// Resets every graphic attribute.
pub const RESET: &str = "\x1b[0m";

/// Clears the whole line under the cursor.
pub const CLEAR_LINE: &str = "\x1b[2K";
/// Clears from the cursor to the end of the line.
pub const CLEAR_RIGHT: &str = "\x1b[0K";
/// Clears from the start of the line to the cursor.
pub const CLEAR_LEFT: &str = "\x1b[1K";
/// Clears from the cursor to the end of the screen.
pub const CLEAR_DOWN: &str = "\x1b[0J";
/// Clears the whole screen.
pub const CLEAR_ALL: &str = "\x1b[2J";
/// Clears the scrollback buffer.
pub const CLEAR_SCROLL: &str = "\x1b[3J";

/// Shows the cursor.
pub const CURSOR_SHOW: &str = "\x1b[?25h";
/// Hides the cursor.
pub const CURSOR_HIDE: &str = "\x1b[?25l";
/// Saves the cursor position.
pub const CURSOR_SAVE: &str = "\x1b7";
/// Restores the position saved with [`CURSOR_SAVE`].
pub const CURSOR_LOAD: &str = "\x1b8";
/// Moves the cursor to the top-left cell.
pub const CURSOR_HOME: &str = "\x1b[H";

/// Switches to the alternate screen buffer.
pub const BUFFER_NEW: &str = "\x1b[?1049h";
/// Switches back to the main screen buffer.
pub const BUFFER_OLD: &str = "\x1b[?1049l";

/// Moves the cursor to column `x`, row `y` (both 1-based).
pub fn set_pos(x: i32, y: i32) -> String {
    format!("\x1b[{y};{x}f")
}

/// Sets the foreground (or background when `bg` is true) to a 24-bit color.
///
/// `None` stands for the terminal's default color and emits [`RESET`].
pub fn color(color: Option<Rgb>, bg: bool) -> String {
    match color {
        Some(Rgb { r, g, b }) => {
            let layer = if bg { 48 } else { 38 };
            format!("\x1b[{layer};2;{r};{g};{b}m")
        }
        None => RESET.to_string(),
    }
}

/// Moves the cursor horizontally. Positive values move right.
pub fn move_horiz(dist: i32) -> String {
    match dist {
        0 => String::new(),
        d if d > 0 => format!("\x1b[{d}C"),
        d => format!("\x1b[{}D", d.unsigned_abs()),
    }
}

/// Moves the cursor vertically. Positive values move down.
///
/// With `carriage` the cursor also returns to the first column.
pub fn move_vert(dist: i32, carriage: bool) -> String {
    let (up, down) = if carriage { ('F', 'E') } else { ('A', 'B') };
    match dist {
        0 => String::new(),
        d if d > 0 => format!("\x1b[{d}{down}"),
        d => format!("\x1b[{}{up}", d.unsigned_abs()),
    }
}

/// Scrolls the screen. Positive values scroll the content up.
pub fn scroll(dist: i32) -> String {
    match dist {
        0 => String::new(),
        d if d > 0 => format!("\x1b[{d}S"),
        d => format!("\x1b[{}T", d.unsigned_abs()),
    }
}

/// Wraps a frame so drawing it leaves the cursor where it was.
pub fn wrap_frame(body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 32);
    out.push_str(CURSOR_SAVE);
    out.push_str(CURSOR_HIDE);
    out.push_str(body);
    out.push_str(CURSOR_LOAD);
    out.push_str(CURSOR_SHOW);
    out.push_str(RESET);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_pos_is_row_then_column() {
        assert_eq!(set_pos(7, 3), "\x1b[3;7f");
    }

    #[test]
    fn test_color_sequences() {
        let c = Some(Rgb::new(21, 242, 141));
        assert_eq!(color(c, false), "\x1b[38;2;21;242;141m");
        assert_eq!(color(c, true), "\x1b[48;2;21;242;141m");
        assert_eq!(color(None, false), RESET);
    }

    #[test]
    fn test_relative_moves() {
        assert_eq!(move_horiz(3), "\x1b[3C");
        assert_eq!(move_horiz(-2), "\x1b[2D");
        assert_eq!(move_horiz(0), "");
        assert_eq!(move_vert(4, false), "\x1b[4B");
        assert_eq!(move_vert(-1, false), "\x1b[1A");
        assert_eq!(move_vert(2, true), "\x1b[2E");
        assert_eq!(move_vert(-5, true), "\x1b[5F");
        assert_eq!(scroll(2), "\x1b[2S");
        assert_eq!(scroll(-1), "\x1b[1T");
    }

    #[test]
    fn test_wrap_frame_order() {
        assert_eq!(
            wrap_frame("X"),
            "\x1b7\x1b[?25lX\x1b8\x1b[?25h\x1b[0m"
        );
    }
}
