//! Input resolution: file/literal duality and Base64 decoding.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;

use codeprobe_core::{CodeprobeError, Result};

/// A textual input that is either a path to an existing file or literal text.
///
/// The duality is advisory convenience and is decided once per operation:
/// `resolve_all` auto-detects over the whole input set, `literal` forces
/// literal-text mode.
#[derive(Debug, Clone)]
pub struct TextInput {
    text: String,
}

impl TextInput {
    /// Treat `raw` as literal text, decoding Base64 first when asked.
    pub fn literal(raw: &str, base64_encoded: bool) -> Result<Self> {
        let text = if base64_encoded {
            decode_base64(raw)?
        } else {
            raw.to_string()
        };
        Ok(Self { text })
    }

    /// Auto-detect every input of an operation at once: file mode only when
    /// ALL inputs name existing files, otherwise every input is literal.
    /// Mixed sets never read anything from disk.
    ///
    /// Base64 mode implies literal mode — encoded text is never a path.
    pub fn resolve_all(raws: &[&str], base64_encoded: bool) -> Result<Vec<Self>> {
        if base64_encoded {
            return raws.iter().map(|raw| Self::literal(raw, true)).collect();
        }

        if raws.iter().all(|raw| Path::new(raw).is_file()) {
            debug!(count = raws.len(), "reading inputs from files");
            return raws
                .iter()
                .map(|raw| {
                    let text = std::fs::read_to_string(Path::new(raw))?;
                    Ok(Self { text })
                })
                .collect();
        }

        raws.iter().map(|raw| Self::literal(raw, false)).collect()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

fn decode_base64(raw: &str) -> Result<String> {
    let bytes = BASE64
        .decode(raw.trim())
        .map_err(|e| CodeprobeError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CodeprobeError::Decode(e.to_string()))
}
