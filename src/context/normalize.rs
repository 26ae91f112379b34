/// A normalized copy of a chunk text (whitespace runs folded to a single
/// space, lowercased) plus a byte offset map back from the raw text.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    text: String,
    /// `offsets[i]` is the position in `text` that raw byte `i` maps to.
    /// Has `raw.len() + 1` entries so span ends map too.
    offsets: Vec<usize>,
}

impl NormalizedText {
    pub fn new(raw: &str) -> Self {
        let mut text = String::with_capacity(raw.len());
        let mut offsets = vec![0; raw.len() + 1];
        let mut in_space = false;

        for (i, c) in raw.char_indices() {
            let here = text.len();
            for slot in &mut offsets[i..i + c.len_utf8()] {
                *slot = here;
            }
            if c.is_whitespace() {
                if !in_space {
                    text.push(' ');
                    in_space = true;
                }
            } else {
                in_space = false;
                text.extend(c.to_lowercase());
            }
        }
        offsets[raw.len()] = text.len();

        Self { text, offsets }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Map a raw byte span onto the normalized text.
    pub fn map_span(&self, start: usize, end: usize) -> (usize, usize) {
        let last = self.offsets.len() - 1;
        (self.offsets[start.min(last)], self.offsets[end.min(last)])
    }
}
