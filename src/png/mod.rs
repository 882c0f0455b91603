//! PNG textual metadata reader
//!
//! Only the chunk structure and the three text chunk types are understood,
//! pixel data is never decoded. Everything is read from a [`std::io::Read`]
//! stream in a single forward pass.
//!
//! # Top Level
//!
//! A PNG file is the 8 byte signature `89 50 4E 47 0D 0A 1A 0A` followed by a
//! sequence of chunks. Unless other wise noted everything is stored in Big
//! Endian format.
//!
//! | Type    | Name     | Description |
//! | ------: | -------- | ----------- |
//! | u32     | length   | The length of the data section of a chunk, is allowed to be 0 bytes |
//! | [u8; 4] | type     | The type of the chunk, ASCII such as `tEXt` |
//! | [u8; N] | data     | The content of the chunk, interpret according to the chunk type |
//! | u32     | crc      | CRC-32 of `type \|\| data`, read but never validated here |
//!
//! # Chunk Types
//!
//! | Chunk Type | Name                   | Handling |
//! | :--------: | ---------------------- | -------- |
//! | tEXt       | Textual data           | Latin-1 text, stored |
//! | zTXt       | Compressed textual data| zlib stream of Latin-1 text, inflated and stored |
//! | iTXt       | International text     | UTF-8 text, optionally compressed, stored |
//! | IEND       | Image trailer          | Stops the parse |
//! | *other*    |                        | Consumed and ignored |
//!
//! ## tEXt
//!
//! | Type    | Name    | Description |
//! | ------: | ------- | ----------- |
//! | [u8; N] | keyword | 1-79 bytes, no null |
//! | u8      | null    | Separator |
//! | [u8; N] | text    | Latin-1 text, runs to the end of the chunk |
//!
//! ## zTXt
//!
//! | Type    | Name               | Description |
//! | ------: | ------------------ | ----------- |
//! | [u8; N] | keyword            | 1-79 bytes, no null |
//! | u8      | null               | Separator |
//! | u8      | compression method | Only `0` (zlib) is defined |
//! | [u8; N] | compressed text    | zlib stream, runs to the end of the chunk |
//!
//! ## iTXt
//!
//! | Type    | Name               | Description |
//! | ------: | ------------------ | ----------- |
//! | [u8; N] | keyword            | 1-79 bytes, no null |
//! | u8      | null               | Separator |
//! | u8      | compression flag   | `1` when the text is compressed |
//! | u8      | compression method | Only `0` (zlib) is defined |
//! | [u8; N] | language tag       | Null terminated |
//! | [u8; N] | translated keyword | Null terminated, UTF-8 |
//! | [u8; N] | text               | UTF-8 text, runs to the end of the chunk |
//!
//! Damaged input never fails the caller, see [`reader::extract`].
pub mod raw;
pub mod reader;
pub mod text;

#[cfg(test)]
pub mod builder;

pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

// Largest chunk length the PNG format allows (2^31 - 1)
const MAX_CHUNK_SIZE: usize = 0x7FFF_FFFF;
