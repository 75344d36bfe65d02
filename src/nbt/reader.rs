//! Recursive-descent decoder for big-endian NBT

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Cursor, Read};

use super::types::{Compound, NamedTag, Tag, TagType};
use crate::error::{DecodeError, Error, Result};

/// Maximum compound/list nesting accepted by the reader
pub const MAX_DEPTH: usize = 128;

/// Decode a full NBT document. The root tag must be a compound.
pub fn decode(data: &[u8]) -> Result<NamedTag> {
    NbtReader::new(data).read_root()
}

/// Cursor over a decompressed NBT buffer
pub struct NbtReader<'a> {
    cursor: Cursor<&'a [u8]>,
    depth: usize,
}

impl<'a> NbtReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        NbtReader {
            cursor: Cursor::new(data),
            depth: 0,
        }
    }

    /// Current read offset
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Read the named root compound
    pub fn read_root(&mut self) -> Result<NamedTag> {
        let id = self.read_u8()?;
        if id != TagType::Compound.id() {
            return Err(DecodeError::RootNotCompound(id).into());
        }
        let name = self.read_string()?;
        let tag = Tag::Compound(self.read_compound()?);
        Ok(NamedTag { name, tag })
    }

    /// Read the payload of a tag whose type id has already been consumed
    pub fn read_payload(&mut self, tag_type: TagType) -> Result<Tag> {
        match tag_type {
            TagType::List => self.read_list(),
            TagType::Compound => {
                self.enter()?;
                let map = self.read_compound()?;
                self.depth -= 1;
                Ok(Tag::Compound(map))
            }
            other => self.read_leaf(other),
        }
    }

    /// Non-container payloads; stays out of the recursive frames
    #[inline(never)]
    fn read_leaf(&mut self, tag_type: TagType) -> Result<Tag> {
        Ok(match tag_type {
            TagType::Byte => Tag::Byte(self.io(|c| c.read_i8())?),
            TagType::Short => Tag::Short(self.io(|c| c.read_i16::<BigEndian>())?),
            TagType::Int => Tag::Int(self.io(|c| c.read_i32::<BigEndian>())?),
            TagType::Long => Tag::Long(self.io(|c| c.read_i64::<BigEndian>())?),
            TagType::Float => Tag::Float(self.io(|c| c.read_f32::<BigEndian>())?),
            TagType::Double => Tag::Double(self.io(|c| c.read_f64::<BigEndian>())?),
            TagType::ByteArray => {
                let len = self.read_length(1)?;
                let mut bytes = vec![0u8; len];
                self.io(|c| c.read_exact(&mut bytes))?;
                Tag::ByteArray(bytes)
            }
            TagType::String => Tag::String(self.read_string()?),
            TagType::IntArray => {
                let len = self.read_length(4)?;
                let mut values = Vec::with_capacity(len);
                for _ in 0..len {
                    values.push(self.io(|c| c.read_i32::<BigEndian>())?);
                }
                Tag::IntArray(values)
            }
            TagType::LongArray => {
                let len = self.read_length(8)?;
                let mut values = Vec::with_capacity(len);
                for _ in 0..len {
                    values.push(self.io(|c| c.read_i64::<BigEndian>())?);
                }
                Tag::LongArray(values)
            }
            TagType::End => Tag::End,
            TagType::List | TagType::Compound => return self.read_payload(tag_type),
        })
    }

    /// Element tag id, i32 length, then `len` payloads of that type.
    /// Only an empty list may declare TAG_End elements.
    fn read_list(&mut self) -> Result<Tag> {
        let elem_id = self.read_u8()?;
        let offset = self.position() - 1;
        let elem_type =
            TagType::from_id(elem_id).ok_or(DecodeError::UnknownTag { id: elem_id, offset })?;

        let len_offset = self.position();
        if elem_type == TagType::End {
            let len = self.read_length(0)?;
            if len > 0 {
                return Err(DecodeError::NonEmptyEndList { len, offset: len_offset }.into());
            }
            return Ok(Tag::List { elem_type, items: Vec::new() });
        }

        // every non-End payload takes at least one byte
        let len = self.read_length(1)?;

        self.enter()?;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(self.read_payload(elem_type)?);
        }
        self.depth -= 1;

        Ok(Tag::List { elem_type, items })
    }

    /// Read named entries until TAG_End.
    ///
    /// A repeated name keeps its first position and takes the later value.
    fn read_compound(&mut self) -> Result<Compound> {
        let mut map = Compound::new();
        loop {
            let offset = self.position();
            let id = self.read_u8()?;
            let tag_type =
                TagType::from_id(id).ok_or(DecodeError::UnknownTag { id, offset })?;
            if tag_type == TagType::End {
                break;
            }
            let name = self.read_string()?;
            let value = self.read_payload(tag_type)?;
            map.insert(name, value);
        }
        Ok(map)
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.io(|c| c.read_u8())
    }

    /// u16 length prefix followed by UTF-8 bytes, decoded lossily
    fn read_string(&mut self) -> Result<String> {
        let len = self.io(|c| c.read_u16::<BigEndian>())? as usize;
        let mut bytes = vec![0u8; len.min(self.remaining())];
        self.io(|c| c.read_exact(&mut bytes))?;
        if bytes.len() < len {
            return Err(self.eof());
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// i32 length prefix; rejects negatives and lengths the buffer cannot hold
    fn read_length(&mut self, elem_size: usize) -> Result<usize> {
        let offset = self.position();
        let len = self.io(|c| c.read_i32::<BigEndian>())?;
        if len < 0 {
            return Err(DecodeError::NegativeLength { len, offset }.into());
        }
        let len = len as usize;
        if len.saturating_mul(elem_size) > self.remaining() {
            return Err(self.eof());
        }
        Ok(len)
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(DecodeError::TooDeep { depth: MAX_DEPTH }.into());
        }
        Ok(())
    }

    fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len() as u64;
        len.saturating_sub(self.cursor.position()) as usize
    }

    fn eof(&self) -> Error {
        DecodeError::UnexpectedEof {
            offset: self.cursor.get_ref().len() as u64,
        }
        .into()
    }

    fn io<T>(&mut self, read: impl FnOnce(&mut Cursor<&'a [u8]>) -> io::Result<T>) -> Result<T> {
        read(&mut self.cursor).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => self.eof(),
            _ => Error::Io(e),
        })
    }
}
