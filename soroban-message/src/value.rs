//! Conversion between contract values (`ScVal`) and plain text.
//!
//! Only the `String` and `Symbol` variants carry text. Decoding is best
//! effort: anything that is not valid UTF-8 text in one of those two
//! variants comes back as `None` instead of an error.

use stellar_xdr::curr::{ScString, ScVal, StringM};

use crate::error::ErrorKind;
use crate::result::Result;

/// Outcome of reading text out of a single [`ScVal`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextDecode {
    /// A `String` or `Symbol` holding valid UTF-8.
    Text(String),
    /// A `String` or `Symbol` whose bytes are not UTF-8.
    InvalidUtf8,
    /// Any other variant.
    Unsupported,
}

impl TextDecode {
    pub fn from_val(value: &ScVal) -> Self {
        let bytes = match value {
            ScVal::String(ScString(s)) => s.as_slice(),
            ScVal::Symbol(sym) => sym.0.as_slice(),
            _ => return Self::Unsupported,
        };
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::Text(text.to_owned()),
            Err(_) => Self::InvalidUtf8,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::InvalidUtf8 | Self::Unsupported => None,
        }
    }
}

/// Decode an optional contract value into text.
pub fn decode_text(value: Option<&ScVal>) -> Option<String> {
    value.and_then(|v| TextDecode::from_val(v).into_text())
}

/// Encode text as the `String` variant expected by contract arguments.
pub fn encode_text(text: &str) -> Result<ScVal> {
    let inner: StringM = text
        .as_bytes()
        .to_vec()
        .try_into()
        .map_err(|e| ErrorKind::DataConversion.custom(e))?;
    Ok(ScVal::String(ScString(inner)))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;
    use stellar_xdr::curr::ScSymbol;

    #[test]
    fn test_string_variant() {
        let value = encode_text("Hola").unwrap();
        assert_eq!(decode_text(Some(&value)), Some("Hola".to_string()));
    }

    #[test]
    fn test_symbol_variant() {
        let value = ScVal::Symbol(ScSymbol(StringM::from_str("get_message").unwrap()));
        assert_eq!(decode_text(Some(&value)).as_deref(), Some("get_message"));
    }

    #[test]
    fn test_multibyte_text() {
        let text = "¡Hola desde Rust! 🦀";
        let value = encode_text(text).unwrap();
        assert_eq!(decode_text(Some(&value)).as_deref(), Some(text));
    }

    #[test]
    fn test_invalid_utf8_is_absent() {
        let bytes: StringM = vec![0xff, 0xfe, 0x48].try_into().unwrap();
        let value = ScVal::String(ScString(bytes));
        assert_eq!(TextDecode::from_val(&value), TextDecode::InvalidUtf8);
        assert_eq!(decode_text(Some(&value)), None);

        let bytes: StringM<32> = vec![0xc3].try_into().unwrap();
        let value = ScVal::Symbol(ScSymbol(bytes));
        assert_eq!(decode_text(Some(&value)), None);
    }

    #[test]
    fn test_other_variants_are_absent() {
        assert_eq!(TextDecode::from_val(&ScVal::U32(7)), TextDecode::Unsupported);
        assert_eq!(decode_text(Some(&ScVal::Bool(true))), None);
        assert_eq!(decode_text(Some(&ScVal::Void)), None);
        assert_eq!(decode_text(None), None);
    }

    #[test]
    fn test_backslashes_are_kept() {
        let text = r"C:\mensajes\x41";
        let value = encode_text(text).unwrap();
        assert_eq!(decode_text(Some(&value)).as_deref(), Some(text));
    }

    #[test]
    fn test_empty_string() {
        let value = encode_text("").unwrap();
        assert_eq!(decode_text(Some(&value)), Some(String::new()));
    }
}
