//! Font style inference from font family names.

/// Derive `(bold, italic)` from a font name such as `Helvetica-BoldOblique`.
pub fn infer_font_style(font_name: &str) -> (bool, bool) {
    if font_name.is_empty() {
        return (false, false);
    }
    let bold = font_name.contains("Bold");
    let italic = font_name.contains("Italic") || font_name.contains("Oblique");
    (bold, italic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_font_style() {
        assert_eq!(infer_font_style(""), (false, false));
        assert_eq!(infer_font_style("Arial"), (false, false));
        assert_eq!(infer_font_style("Arial-Bold"), (true, false));
        assert_eq!(infer_font_style("Times-Italic"), (false, true));
        assert_eq!(infer_font_style("Helvetica-BoldOblique"), (true, true));
    }

    #[test]
    fn test_infer_font_style_is_case_sensitive() {
        assert_eq!(infer_font_style("arial-bold"), (false, false));
    }
}
