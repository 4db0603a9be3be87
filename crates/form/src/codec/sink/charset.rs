use crate::protocol::FormError;

/// Text encodings a form body may declare through its `charset` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Charset {
    #[default]
    Utf8,
    Latin1,
    Ascii,
}

impl Charset {
    /// Looks up a charset by its (case-insensitive) label.
    pub fn from_label(label: &str) -> Option<Self> {
        const UTF8: [&str; 2] = ["utf-8", "utf8"];
        const LATIN1: [&str; 6] = ["iso-8859-1", "iso8859-1", "iso_8859-1", "latin1", "latin-1", "l1"];
        const ASCII: [&str; 3] = ["us-ascii", "ascii", "ansi_x3.4-1968"];

        let label = label.trim().trim_matches('"');

        let matches = |labels: &[&str]| labels.iter().any(|known| known.eq_ignore_ascii_case(label));
        if matches(&UTF8) {
            Some(Charset::Utf8)
        } else if matches(&LATIN1) {
            Some(Charset::Latin1)
        } else if matches(&ASCII) {
            Some(Charset::Ascii)
        } else {
            None
        }
    }

    /// Like [`Charset::from_label`], but an unknown label is a decode error.
    pub fn try_from_label(label: &str) -> Result<Self, FormError> {
        Self::from_label(label).ok_or_else(|| FormError::decode(format!("unsupported charset {label:?}")))
    }

    /// Decodes `bytes` into text.
    pub fn decode(self, bytes: Vec<u8>) -> Result<String, FormError> {
        match self {
            Charset::Utf8 => String::from_utf8(bytes).map_err(|e| FormError::decode(format!("invalid utf-8: {e}"))),
            Charset::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
            Charset::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(pos) => Err(FormError::decode(format!("non-ascii byte at offset {pos}"))),
                // ascii is valid utf-8
                None => String::from_utf8(bytes).map_err(|e| FormError::decode(e.to_string())),
            },
        }
    }
}
