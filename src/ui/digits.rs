//! Block-glyph font for the countdown.

/// Glyph rows per character
pub const GLYPH_HEIGHT: usize = 5;

const HORIZONTAL_SCALE: usize = 2;

fn glyph(c: char) -> [&'static str; GLYPH_HEIGHT] {
    match c {
        '0' => ["###", "# #", "# #", "# #", "###"],
        '1' => [" # ", "## ", " # ", " # ", "###"],
        '2' => ["###", "  #", "###", "#  ", "###"],
        '3' => ["###", "  #", "###", "  #", "###"],
        '4' => ["# #", "# #", "###", "  #", "  #"],
        '5' => ["###", "#  ", "###", "  #", "###"],
        '6' => ["###", "#  ", "###", "# #", "###"],
        '7' => ["###", "  #", "  #", "  #", "  #"],
        '8' => ["###", "# #", "###", "# #", "###"],
        '9' => ["###", "# #", "###", "  #", "###"],
        ':' => [" ", "#", " ", "#", " "],
        _ => ["   ", "   ", "   ", "   ", "   "],
    }
}

/// Render `text` as rows of block characters, one space between glyphs
pub fn render_lines(text: &str) -> Vec<String> {
    let mut rows = vec![String::new(); GLYPH_HEIGHT];
    for (i, c) in text.chars().enumerate() {
        for (row, pattern) in rows.iter_mut().zip(glyph(c)) {
            if i > 0 {
                row.push(' ');
            }
            for cell in pattern.chars() {
                let fill = if cell == '#' { '█' } else { ' ' };
                for _ in 0..HORIZONTAL_SCALE {
                    row.push(fill);
                }
            }
        }
    }
    rows
}

/// Terminal columns needed by `render_lines(text)`
pub fn rendered_width(text: &str) -> usize {
    let glyphs: usize = text
        .chars()
        .map(|c| glyph(c)[0].chars().count() * HORIZONTAL_SCALE)
        .sum();
    glyphs + text.chars().count().saturating_sub(1)
}
