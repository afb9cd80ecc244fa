use crate::fonts::FontMetrics;

/// Greedy word wrap of `text` into lines no wider than `column_width`.
///
/// Newlines are hard breaks and blank lines between paragraphs are kept as
/// empty lines. A word wider than the column sits alone on its own line; words
/// are never hyphenated. Blank input yields no lines at all.
pub fn flow(text: &str, column_width: f32, metrics: &FontMetrics) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let space_w = metrics.text_width(" ");
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        wrap_paragraph(paragraph, column_width, space_w, metrics, &mut lines);
    }
    lines
}

fn wrap_paragraph(
    paragraph: &str,
    column_width: f32,
    space_w: f32,
    metrics: &FontMetrics,
    lines: &mut Vec<String>,
) {
    let mut current = String::new();
    let mut current_w = 0.0f32;

    for word in paragraph.split_whitespace() {
        let ww = metrics.text_width(word);
        if current.is_empty() {
            current.push_str(word);
            current_w = ww;
            continue;
        }

        let proposed_w = current_w + space_w + ww;
        if proposed_w > column_width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_w = ww;
        } else {
            current.push(' ');
            current.push_str(word);
            current_w = proposed_w;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
}
