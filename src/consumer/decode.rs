/// Incremental UTF-8 decoder for byte streams whose chunk boundaries may fall
/// inside a multi-byte sequence. Incomplete trailing bytes are held back until
/// later chunks complete them; invalid sequences decode to U+FFFD. An empty
/// chunk decodes to nothing.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn feed(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest = bytes.as_slice();

        while !rest.is_empty() {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    rest = &[];
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    if valid_up_to > 0
                        && let Ok(valid) = std::str::from_utf8(&rest[..valid_up_to])
                    {
                        out.push_str(valid);
                    }
                    rest = &rest[valid_up_to..];

                    match err.error_len() {
                        Some(invalid_len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &rest[invalid_len..];
                        }
                        None => {
                            // incomplete trailing sequence, wait for more bytes
                            self.pending = rest.to_vec();
                            rest = &[];
                        }
                    }
                }
            }
        }

        out
    }

    /// Flushes at end of stream. A dangling incomplete sequence can never be
    /// completed, so it decodes to a single replacement character.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            char::REPLACEMENT_CHARACTER.to_string()
        }
    }
}
