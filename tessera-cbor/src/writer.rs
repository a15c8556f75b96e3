//! CBOR output.

use std::borrow::Cow;

use tessera_format::{Consumer, EventError};

use crate::major::{BREAK, INDEFINITE, Major};

/// Consumer that encodes events as CBOR.
///
/// Integers and lengths use the shortest argument encoding. Containers
/// announced with a size are written with a definite length; the others
/// become indefinite-length containers closed by a break byte. Doubles are
/// always written at full width.
///
/// ```
/// use tessera_format::Consumer;
/// use tessera_cbor::CborWriter;
///
/// let mut w = CborWriter::new();
/// w.begin_array(Some(2)).unwrap();
/// w.number_u64(1).unwrap();
/// w.element().unwrap();
/// w.number_i64(-500).unwrap();
/// w.element().unwrap();
/// w.end_array(Some(2)).unwrap();
/// assert_eq!(w.into_bytes(), [0x82, 0x01, 0x39, 0x01, 0xf3]);
/// ```
#[derive(Debug, Default)]
pub struct CborWriter {
    out: Vec<u8>,
    /// One entry per open container: whether it needs a break byte.
    indefinite: Vec<bool>,
}

impl CborWriter {
    /// Create a writer with an empty buffer.
    pub const fn new() -> Self {
        CborWriter {
            out: Vec::new(),
            indefinite: Vec::new(),
        }
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.out
    }

    /// Consume the writer and return the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }

    fn head(&mut self, major: Major, n: u64) {
        match n {
            0..=23 => self.out.push(major.with(n as u8)),
            24..=0xff => {
                self.out.push(major.with(24));
                self.out.push(n as u8);
            }
            0x100..=0xffff => {
                self.out.push(major.with(25));
                self.out.extend_from_slice(&(n as u16).to_be_bytes());
            }
            0x1_0000..=0xffff_ffff => {
                self.out.push(major.with(26));
                self.out.extend_from_slice(&(n as u32).to_be_bytes());
            }
            _ => {
                self.out.push(major.with(27));
                self.out.extend_from_slice(&n.to_be_bytes());
            }
        }
    }

    fn text(&mut self, v: &str) {
        self.head(Major::Text, v.len() as u64);
        self.out.extend_from_slice(v.as_bytes());
    }

    fn open(&mut self, major: Major, size: Option<usize>) {
        match size {
            Some(n) => self.head(major, n as u64),
            None => self.out.push(major.with(INDEFINITE)),
        }
        self.indefinite.push(size.is_none());
    }

    fn close(&mut self) {
        if self.indefinite.pop() == Some(true) {
            self.out.push(BREAK);
        }
    }
}

impl<'de> Consumer<'de> for CborWriter {
    fn null(&mut self) -> Result<(), EventError> {
        self.out.push(Major::Simple.with(22));
        Ok(())
    }

    fn boolean(&mut self, v: bool) -> Result<(), EventError> {
        self.out.push(Major::Simple.with(20 + u8::from(v)));
        Ok(())
    }

    fn number_i64(&mut self, v: i64) -> Result<(), EventError> {
        if v >= 0 {
            self.head(Major::Unsigned, v as u64);
        } else {
            self.head(Major::Negative, !v as u64);
        }
        Ok(())
    }

    fn number_u64(&mut self, v: u64) -> Result<(), EventError> {
        self.head(Major::Unsigned, v);
        Ok(())
    }

    fn number_f64(&mut self, v: f64) -> Result<(), EventError> {
        self.out.push(Major::Simple.with(27));
        self.out.extend_from_slice(&v.to_bits().to_be_bytes());
        Ok(())
    }

    fn string(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.text(&v);
        Ok(())
    }

    fn binary(&mut self, v: Cow<'de, [u8]>) -> Result<(), EventError> {
        self.head(Major::Binary, v.len() as u64);
        self.out.extend_from_slice(&v);
        Ok(())
    }

    fn begin_array(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.open(Major::Array, size);
        Ok(())
    }

    fn element(&mut self) -> Result<(), EventError> {
        Ok(())
    }

    fn end_array(&mut self, _: Option<usize>) -> Result<(), EventError> {
        self.close();
        Ok(())
    }

    fn begin_object(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.open(Major::Map, size);
        Ok(())
    }

    fn key(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.text(&v);
        Ok(())
    }

    fn member(&mut self) -> Result<(), EventError> {
        Ok(())
    }

    fn end_object(&mut self, _: Option<usize>) -> Result<(), EventError> {
        self.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(f: impl FnOnce(&mut CborWriter) -> Result<(), EventError>) -> Vec<u8> {
        let mut w = CborWriter::new();
        f(&mut w).unwrap();
        w.into_bytes()
    }

    #[test]
    fn shortest_arguments() {
        assert_eq!(encode(|w| w.number_u64(23)), [0x17]);
        assert_eq!(encode(|w| w.number_u64(24)), [0x18, 0x18]);
        assert_eq!(encode(|w| w.number_u64(256)), [0x19, 0x01, 0x00]);
        assert_eq!(encode(|w| w.number_u64(65536)), [0x1a, 0, 1, 0, 0]);
        assert_eq!(
            encode(|w| w.number_u64(u64::MAX)),
            [0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
        assert_eq!(encode(|w| w.number_i64(-1)), [0x20]);
        assert_eq!(encode(|w| w.number_i64(-25)), [0x38, 0x18]);
        assert_eq!(
            encode(|w| w.number_i64(i64::MIN)),
            [0x3b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn scalars() {
        assert_eq!(encode(|w| w.null()), [0xf6]);
        assert_eq!(encode(|w| w.boolean(false)), [0xf4]);
        assert_eq!(encode(|w| w.boolean(true)), [0xf5]);
        assert_eq!(
            encode(|w| w.number_f64(1.5)),
            [0xfb, 0x3f, 0xf8, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            encode(|w| w.string(Cow::Borrowed("IETF"))),
            [0x64, b'I', b'E', b'T', b'F']
        );
        assert_eq!(encode(|w| w.binary(Cow::Borrowed(&[1, 2]))), [0x42, 1, 2]);
    }

    #[test]
    fn containers_without_size_are_indefinite() {
        let bytes = encode(|w| {
            w.begin_object(None)?;
            w.key(Cow::Borrowed("a"))?;
            w.begin_array(Some(0))?;
            w.end_array(Some(0))?;
            w.member()?;
            w.end_object(None)
        });
        assert_eq!(bytes, [0xbf, 0x61, b'a', 0x80, 0xff]);
    }
}
