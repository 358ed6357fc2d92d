//! Minimal single-page PDF assembly.
//!
//! Just enough of the format for a text-only invoice: catalog, page tree,
//! one Helvetica font, one content stream, xref table. Everything is written
//! into a buffer with byte-exact offset tracking, so output is fully
//! deterministic.

/// One positioned line of text on the page (PDF user-space coordinates,
/// origin bottom-left, A4 media box).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextLine {
    pub x: i32,
    pub y: i32,
    pub size: u32,
    pub text: String,
}

impl TextLine {
    pub fn new(x: i32, y: i32, size: u32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            size,
            text: text.into(),
        }
    }
}

/// Assemble a complete PDF document from positioned text lines.
pub(crate) fn document(lines: &[TextLine]) -> Vec<u8> {
    let content = content_stream(lines);

    let mut out: Vec<u8> = Vec::with_capacity(1024 + content.len());
    out.extend_from_slice(b"%PDF-1.4\n");

    let mut offsets: Vec<usize> = Vec::with_capacity(5);

    let objects: [String; 5] = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 595 842] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ),
    ];

    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", index + 1, body).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );

    out
}

fn content_stream(lines: &[TextLine]) -> String {
    let mut stream = String::new();
    for line in lines {
        stream.push_str(&format!(
            "BT /F1 {} Tf 1 0 0 1 {} {} Tm ({}) Tj ET\n",
            line.size,
            line.x,
            line.y,
            escape(&line.text)
        ));
    }
    // Drop the trailing newline so /Length matches exactly what follows.
    stream.pop();
    stream
}

/// Escape the PDF string delimiters.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_has_pdf_framing() {
        let bytes = document(&[TextLine::new(50, 780, 12, "Hello")]);
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF"));
    }

    #[test]
    fn parens_and_backslashes_are_escaped() {
        assert_eq!(escape(r"a(b)c\d"), r"a\(b\)c\\d");
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let bytes = document(&[TextLine::new(50, 780, 12, "x")]);
        let text = String::from_utf8_lossy(&bytes);
        // Each 10-digit xref entry must land on the "N 0 obj" it describes.
        for (i, entry) in text
            .split("xref\n")
            .nth(1)
            .unwrap()
            .lines()
            .skip(2)
            .take(5)
            .enumerate()
        {
            let offset: usize = entry.split_whitespace().next().unwrap().parse().unwrap();
            let expected = format!("{} 0 obj", i + 1);
            assert!(text[offset..].starts_with(&expected), "object {}", i + 1);
        }
    }
}
