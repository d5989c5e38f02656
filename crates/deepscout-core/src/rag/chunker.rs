//! Character-window text splitter with overlap.

/// Splits text into overlapping chunks, preferring paragraph, then sentence,
/// then word boundaries near the window edge.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

impl TextChunker {
    /// `overlap` must be smaller than `chunk_size`; it is clamped otherwise.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size / 2),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        if text.len() <= self.chunk_size {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < text.len() {
            let hard_end = floor_char_boundary(text, (start + self.chunk_size).min(text.len()));
            let end = if hard_end < text.len() {
                self.break_point(&text[start..hard_end])
                    .map(|offset| start + offset)
                    .unwrap_or(hard_end)
            } else {
                hard_end
            };

            let piece = text[start..end].trim();
            if !piece.is_empty() {
                chunks.push(piece.to_string());
            }

            if end >= text.len() {
                break;
            }
            let next = ceil_char_boundary(text, end.saturating_sub(self.overlap));
            // Guarantee forward progress even with pathological overlap.
            start = next.max(start + 1);
            start = ceil_char_boundary(text, start);
        }

        chunks
    }

    /// Best break offset within the window, searched in the trailing half so
    /// chunks never collapse to a fraction of the window.
    fn break_point(&self, window: &str) -> Option<usize> {
        let min_pos = window.len() / 2;

        for delimiter in ["\n\n", ". ", "\n", " "] {
            if let Some(pos) = window.rfind(delimiter)
                && pos >= min_pos
            {
                return Some(pos + delimiter.len());
            }
        }
        None
    }
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
