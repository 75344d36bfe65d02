//! Test-only NBT writer used to build fixtures

use byteorder::{BigEndian, WriteBytesExt};

use super::types::{NamedTag, Tag, TagType};

/// Byte-level builder. Calls must follow the wire grammar; nothing is checked.
pub struct NbtWriter {
    buf: Vec<u8>,
}

impl NbtWriter {
    /// Start a document with a named root compound
    pub fn root(name: &str) -> Self {
        let mut w = NbtWriter { buf: Vec::new() };
        w.buf.push(TagType::Compound.id());
        w.put_string(name);
        w
    }

    /// Close the root compound and return the bytes
    pub fn finish(mut self) -> Vec<u8> {
        self.buf.push(TagType::End.id());
        self.buf
    }

    /// Encode a decoded document back to bytes
    pub fn encode(doc: &NamedTag) -> Vec<u8> {
        let mut w = NbtWriter { buf: Vec::new() };
        w.buf.push(doc.tag.tag_type().id());
        w.put_string(&doc.name);
        w.put_payload(&doc.tag);
        w.buf
    }

    pub fn byte(self, name: &str, v: i8) -> Self {
        self.named(TagType::Byte, name, |b| b.push(v as u8))
    }

    pub fn short(self, name: &str, v: i16) -> Self {
        self.named(TagType::Short, name, |b| b.write_i16::<BigEndian>(v).unwrap())
    }

    pub fn int(self, name: &str, v: i32) -> Self {
        self.named(TagType::Int, name, |b| b.write_i32::<BigEndian>(v).unwrap())
    }

    pub fn long(self, name: &str, v: i64) -> Self {
        self.named(TagType::Long, name, |b| b.write_i64::<BigEndian>(v).unwrap())
    }

    pub fn float(self, name: &str, v: f32) -> Self {
        self.named(TagType::Float, name, |b| b.write_f32::<BigEndian>(v).unwrap())
    }

    pub fn double(self, name: &str, v: f64) -> Self {
        self.named(TagType::Double, name, |b| b.write_f64::<BigEndian>(v).unwrap())
    }

    pub fn string(mut self, name: &str, v: &str) -> Self {
        self.header(TagType::String, name);
        self.put_string(v);
        self
    }

    pub fn byte_array(mut self, name: &str, v: &[u8]) -> Self {
        self.header(TagType::ByteArray, name);
        self.put_payload(&Tag::ByteArray(v.to_vec()));
        self
    }

    pub fn int_array(mut self, name: &str, v: &[i32]) -> Self {
        self.header(TagType::IntArray, name);
        self.put_payload(&Tag::IntArray(v.to_vec()));
        self
    }

    pub fn long_array(mut self, name: &str, v: &[i64]) -> Self {
        self.header(TagType::LongArray, name);
        self.put_payload(&Tag::LongArray(v.to_vec()));
        self
    }

    pub fn begin_compound(mut self, name: &str) -> Self {
        self.header(TagType::Compound, name);
        self
    }

    /// Close the innermost compound
    pub fn end(mut self) -> Self {
        self.buf.push(TagType::End.id());
        self
    }

    pub fn begin_list(mut self, name: &str, elem_type: TagType, len: i32) -> Self {
        self.header(TagType::List, name);
        self.buf.push(elem_type.id());
        self.buf.write_i32::<BigEndian>(len).unwrap();
        self
    }

    pub fn end_list(self) -> Self {
        self
    }

    pub fn item_int(mut self, v: i32) -> Self {
        self.buf.write_i32::<BigEndian>(v).unwrap();
        self
    }

    pub fn item_string(mut self, v: &str) -> Self {
        self.put_string(v);
        self
    }

    /// Start an unnamed compound list item; close it with [`NbtWriter::end`]
    pub fn item_compound(self) -> Self {
        self
    }

    fn named(mut self, tag_type: TagType, name: &str, write: impl FnOnce(&mut Vec<u8>)) -> Self {
        self.header(tag_type, name);
        write(&mut self.buf);
        self
    }

    fn header(&mut self, tag_type: TagType, name: &str) {
        self.buf.push(tag_type.id());
        self.put_string(name);
    }

    fn put_string(&mut self, s: &str) {
        self.buf.write_u16::<BigEndian>(s.len() as u16).unwrap();
        self.buf.extend_from_slice(s.as_bytes());
    }

    fn put_payload(&mut self, tag: &Tag) {
        match tag {
            Tag::End => {}
            Tag::Byte(v) => self.buf.push(*v as u8),
            Tag::Short(v) => self.buf.write_i16::<BigEndian>(*v).unwrap(),
            Tag::Int(v) => self.buf.write_i32::<BigEndian>(*v).unwrap(),
            Tag::Long(v) => self.buf.write_i64::<BigEndian>(*v).unwrap(),
            Tag::Float(v) => self.buf.write_f32::<BigEndian>(*v).unwrap(),
            Tag::Double(v) => self.buf.write_f64::<BigEndian>(*v).unwrap(),
            Tag::ByteArray(v) => {
                self.buf.write_i32::<BigEndian>(v.len() as i32).unwrap();
                self.buf.extend_from_slice(v);
            }
            Tag::String(s) => self.put_string(s),
            Tag::List { elem_type, items } => {
                self.buf.push(elem_type.id());
                self.buf.write_i32::<BigEndian>(items.len() as i32).unwrap();
                for item in items {
                    self.put_payload(item);
                }
            }
            Tag::Compound(map) => {
                for (name, value) in map {
                    self.header(value.tag_type(), name);
                    self.put_payload(value);
                }
                self.buf.push(TagType::End.id());
            }
            Tag::IntArray(v) => {
                self.buf.write_i32::<BigEndian>(v.len() as i32).unwrap();
                for x in v {
                    self.buf.write_i32::<BigEndian>(*x).unwrap();
                }
            }
            Tag::LongArray(v) => {
                self.buf.write_i32::<BigEndian>(v.len() as i32).unwrap();
                for x in v {
                    self.buf.write_i64::<BigEndian>(*x).unwrap();
                }
            }
        }
    }
}
