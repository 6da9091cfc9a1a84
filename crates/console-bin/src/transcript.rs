use console_text::Segment;

/// Render segments as plain text, or with `[style]` tags around each run.
pub fn render(segments: &[Segment], tagged: bool) -> String {
    if !tagged {
        return segments.iter().map(|s| s.text.as_str()).collect();
    }
    let mut out = String::new();
    for seg in segments {
        out.push('[');
        out.push_str(seg.style.as_str());
        out.push(']');
        out.push_str(&seg.text);
        out.push_str("[/]");
    }
    out
}
