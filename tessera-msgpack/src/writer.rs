//! MessagePack output.

use std::borrow::Cow;

use tessera_format::{Consumer, EventError};

use crate::format::{
    ARRAY16, ARRAY32, BIN8, BIN16, BIN32, FALSE, FIXARRAY, FIXMAP, FIXSTR, FLOAT64, INT8, INT16,
    INT32, INT64, MAP16, MAP32, NIL, STR8, STR16, STR32, TRUE, UINT8, UINT16, UINT32, UINT64,
};

const TOO_LONG: EventError = EventError::Unsupported {
    what: "msgpack lengths are limited to 32 bits",
};

/// A container being written.
#[derive(Debug)]
enum Open {
    /// The header is already final.
    Sized,
    /// The header is a one-byte placeholder at `pos`, patched once `count` is known.
    Counting { pos: usize, count: usize },
}

/// Consumer that encodes events as MessagePack.
///
/// Every value uses its smallest encoding, except doubles which are always
/// `float 64`. Containers announced with a size get their header straight
/// away; the others get a placeholder that is rewritten with the counted
/// entries when the container ends.
///
/// ```
/// use tessera_format::Consumer;
/// use tessera_msgpack::MsgPackWriter;
///
/// let mut w = MsgPackWriter::new();
/// w.begin_array(None).unwrap();
/// w.number_u64(1).unwrap();
/// w.element().unwrap();
/// w.number_i64(-200).unwrap();
/// w.element().unwrap();
/// w.end_array(None).unwrap();
/// assert_eq!(w.into_bytes(), [0x92, 0x01, 0xd1, 0xff, 0x38]);
/// ```
#[derive(Debug, Default)]
pub struct MsgPackWriter {
    out: Vec<u8>,
    stack: Vec<Open>,
}

impl MsgPackWriter {
    /// Create a writer with an empty buffer.
    pub const fn new() -> Self {
        MsgPackWriter {
            out: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// The bytes written so far.
    ///
    /// Headers of containers that are still open may be placeholders.
    pub fn as_bytes(&self) -> &[u8] {
        &self.out
    }

    /// Consume the writer and return the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }

    fn write_u64(&mut self, n: u64) {
        match n {
            0..=0x7f => self.out.push(n as u8),
            0x80..=0xff => self.out.extend_from_slice(&[UINT8, n as u8]),
            0x100..=0xffff => {
                self.out.push(UINT16);
                self.out.extend_from_slice(&(n as u16).to_be_bytes());
            }
            0x1_0000..=0xffff_ffff => {
                self.out.push(UINT32);
                self.out.extend_from_slice(&(n as u32).to_be_bytes());
            }
            _ => {
                self.out.push(UINT64);
                self.out.extend_from_slice(&n.to_be_bytes());
            }
        }
    }

    fn write_i64(&mut self, n: i64) {
        match n {
            0..=i64::MAX => self.write_u64(n as u64),
            -32..=-1 => self.out.push(n as u8),
            -128..=-33 => self.out.extend_from_slice(&[INT8, n as u8]),
            -32768..=-129 => {
                self.out.push(INT16);
                self.out.extend_from_slice(&(n as i16).to_be_bytes());
            }
            -2147483648..=-32769 => {
                self.out.push(INT32);
                self.out.extend_from_slice(&(n as i32).to_be_bytes());
            }
            _ => {
                self.out.push(INT64);
                self.out.extend_from_slice(&n.to_be_bytes());
            }
        }
    }

    /// Append a length header: `fix` carries lengths up to `fix_max` in its
    /// low bits, then `wide` holds the 8, 16 and 32 bit forms (`None` where
    /// the type has no such form).
    fn write_len(
        &mut self,
        len: usize,
        fix: Option<(u8, usize)>,
        wide: [Option<u8>; 3],
    ) -> Result<(), EventError> {
        match (fix, wide) {
            (Some((fix, max)), _) if len <= max => self.out.push(fix | len as u8),
            (_, [Some(marker), _, _]) if len <= 0xff => self.out.extend_from_slice(&[marker, len as u8]),
            (_, [_, Some(marker), _]) if len <= 0xffff => {
                self.out.push(marker);
                self.out.extend_from_slice(&(len as u16).to_be_bytes());
            }
            (_, [_, _, Some(marker)]) => {
                let len = u32::try_from(len).map_err(|_| TOO_LONG)?;
                self.out.push(marker);
                self.out.extend_from_slice(&len.to_be_bytes());
            }
            _ => return Err(TOO_LONG),
        }
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<(), EventError> {
        self.write_len(s.len(), Some((FIXSTR, 31)), [Some(STR8), Some(STR16), Some(STR32)])?;
        self.out.extend_from_slice(s.as_bytes());
        Ok(())
    }

    fn array_header(&mut self, len: usize) -> Result<(), EventError> {
        self.write_len(len, Some((FIXARRAY, 15)), [None, Some(ARRAY16), Some(ARRAY32)])
    }

    fn map_header(&mut self, len: usize) -> Result<(), EventError> {
        self.write_len(len, Some((FIXMAP, 15)), [None, Some(MAP16), Some(MAP32)])
    }

    fn open(&mut self, size: Option<usize>, fix: u8) -> Result<(), EventError> {
        match size {
            Some(len) if fix == FIXARRAY => self.array_header(len)?,
            Some(len) => self.map_header(len)?,
            None => {
                self.stack.push(Open::Counting {
                    pos: self.out.len(),
                    count: 0,
                });
                self.out.push(fix);
                return Ok(());
            }
        }
        self.stack.push(Open::Sized);
        Ok(())
    }

    fn count(&mut self) {
        if let Some(Open::Counting { count, .. }) = self.stack.last_mut() {
            *count += 1;
        }
    }

    /// Close the innermost container, rewriting its placeholder header if
    /// it had one.
    fn close(&mut self, array: bool) -> Result<(), EventError> {
        let Some(Open::Counting { pos, count }) = self.stack.pop() else {
            return Ok(());
        };
        let tail = self.out.split_off(pos + 1);
        self.out.truncate(pos);
        if array {
            self.array_header(count)?;
        } else {
            self.map_header(count)?;
        }
        self.out.extend_from_slice(&tail);
        Ok(())
    }
}

impl<'de> Consumer<'de> for MsgPackWriter {
    fn null(&mut self) -> Result<(), EventError> {
        self.out.push(NIL);
        Ok(())
    }

    fn boolean(&mut self, v: bool) -> Result<(), EventError> {
        self.out.push(if v { TRUE } else { FALSE });
        Ok(())
    }

    fn number_i64(&mut self, v: i64) -> Result<(), EventError> {
        self.write_i64(v);
        Ok(())
    }

    fn number_u64(&mut self, v: u64) -> Result<(), EventError> {
        self.write_u64(v);
        Ok(())
    }

    fn number_f64(&mut self, v: f64) -> Result<(), EventError> {
        self.out.push(FLOAT64);
        self.out.extend_from_slice(&v.to_be_bytes());
        Ok(())
    }

    fn string(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.write_str(&v)
    }

    fn binary(&mut self, v: Cow<'de, [u8]>) -> Result<(), EventError> {
        self.write_len(v.len(), None, [Some(BIN8), Some(BIN16), Some(BIN32)])?;
        self.out.extend_from_slice(&v);
        Ok(())
    }

    fn begin_array(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.open(size, FIXARRAY)
    }

    fn element(&mut self) -> Result<(), EventError> {
        self.count();
        Ok(())
    }

    fn end_array(&mut self, _: Option<usize>) -> Result<(), EventError> {
        self.close(true)
    }

    fn begin_object(&mut self, size: Option<usize>) -> Result<(), EventError> {
        self.open(size, FIXMAP)
    }

    fn key(&mut self, v: Cow<'de, str>) -> Result<(), EventError> {
        self.write_str(&v)
    }

    fn member(&mut self) -> Result<(), EventError> {
        self.count();
        Ok(())
    }

    fn end_object(&mut self, _: Option<usize>) -> Result<(), EventError> {
        self.close(false)
    }
}
