//! Text measurement and wrapping for labels and the footnote panel.

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
/// Each glyph counts as 0.6 em, rounded up.
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    (text.chars().count() as u32 * font_px * 3).div_ceil(5)
}

/// Greedy word wrap. Words wider than `max_px` are split by characters.
pub fn wrap_to_width(text: &str, font_px: u32, max_px: u32) -> Vec<String> {
    let fits = |s: &str| estimate_text_width_px(s, font_px) <= max_px;
    let mut lines: Vec<String> = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        let candidate = if cur.is_empty() {
            word.to_string()
        } else {
            format!("{cur} {word}")
        };
        if fits(&candidate) {
            cur = candidate;
            continue;
        }
        if !cur.is_empty() {
            lines.push(std::mem::take(&mut cur));
        }
        if fits(word) {
            cur = word.to_string();
            continue;
        }
        for ch in word.chars() {
            cur.push(ch);
            if !fits(&cur) && cur.chars().count() > 1 {
                cur.pop();
                lines.push(std::mem::take(&mut cur));
                cur.push(ch);
            }
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}
