use crate::DictCsvError;

/// Settings shared by the table encoder and decoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DictCsvOptions {
    /// Field separator. `;` by default; `,` is the other common choice.
    pub delimiter: u8,
}

impl Default for DictCsvOptions {
    fn default() -> Self {
        Self { delimiter: b';' }
    }
}

impl DictCsvOptions {
    /// Options using `delimiter` as the field separator.
    pub fn with_delimiter(delimiter: char) -> Result<Self, DictCsvError> {
        if !delimiter.is_ascii() {
            return Err(DictCsvError::InvalidDelimiter(delimiter));
        }
        let options = Self {
            delimiter: delimiter as u8,
        };
        options.validate()?;
        Ok(options)
    }

    pub(crate) fn validate(&self) -> Result<(), DictCsvError> {
        match self.delimiter {
            b'\n' | b'\r' | 0x80..=0xFF => {
                Err(DictCsvError::InvalidDelimiter(char::from(self.delimiter)))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn delimiter_char(&self) -> char {
        char::from(self.delimiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delimiter_is_semicolon() {
        assert_eq!(DictCsvOptions::default().delimiter, b';');
    }

    #[test]
    fn accepts_comma_and_tab() {
        assert_eq!(DictCsvOptions::with_delimiter(',').unwrap().delimiter, b',');
        assert_eq!(DictCsvOptions::with_delimiter('\t').unwrap().delimiter, b'\t');
    }

    #[test]
    fn rejects_line_breaks_and_non_ascii() {
        for ch in ['\n', '\r', '§'] {
            let err = DictCsvOptions::with_delimiter(ch).expect_err("delimiter should be rejected");
            assert!(
                matches!(err, DictCsvError::InvalidDelimiter(c) if c == ch),
                "unexpected error for {ch:?}: {err}"
            );
        }
    }

    #[test]
    fn validate_catches_raw_high_bytes() {
        let options = DictCsvOptions { delimiter: 0xA7 };
        assert!(options.validate().is_err());
    }
}
