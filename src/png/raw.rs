use std::fmt;
use std::io::{self, Read};

use byteorder::{BigEndian, ReadBytesExt};
use thiserror::Error;

use crate::png::MAX_CHUNK_SIZE;
use crate::png::SIGNATURE;

#[derive(Error, Debug)]
pub enum PngError {
    #[error(transparent)]
    IOError(#[from] io::Error),
    #[error("not a png stream (signature mismatch)")]
    SignatureError,
    #[error("permitted max chunk size exceeded")]
    MaxLengthError,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    pub const TEXT: ChunkType = ChunkType(*b"tEXt");
    pub const ZTXT: ChunkType = ChunkType(*b"zTXt");
    pub const ITXT: ChunkType = ChunkType(*b"iTXt");
    pub const IEND: ChunkType = ChunkType(*b"IEND");
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let typ: String = self.0.iter().map(|&b| b as char).collect();
        write!(f, "{}", typ)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub length: u32,
    pub typ: ChunkType,
}

// This only returns complete chunks, the crc has been consumed but not checked
#[derive(Debug, PartialEq)]
pub struct PngChunkRaw {
    pub header: ChunkHeader,
    pub data: Vec<u8>,
}

pub struct PngReaderRaw<R: Read> {
    inner: R,
}

impl<R: Read> PngReaderRaw<R> {
    pub fn new(reader: R) -> Self {
        PngReaderRaw {
            inner: reader,
        }
    }

    /// Consume the 8 byte signature, must be called before iterating.
    pub fn read_signature(&mut self) -> Result<(), PngError> {
        let mut sig = [0u8; 8];
        self.inner.read_exact(&mut sig)?;

        if sig == SIGNATURE {
            Ok(())
        } else {
            Err(PngError::SignatureError)
        }
    }

    fn read_chunk(&mut self) -> Result<PngChunkRaw, PngError> {
        let length = self.inner.read_u32::<BigEndian>()?;
        if length as usize > MAX_CHUNK_SIZE {
            return Err(PngError::MaxLengthError);
        }

        let typ = {
            let mut typ: [u8; 4] = [0; 4];
            self.inner.read_exact(&mut typ)?;
            ChunkType(typ)
        };

        // Grow as the bytes arrive rather than trusting the declared length
        // for the allocation, truncated files can claim anything.
        let data = {
            let mut data = Vec::new();
            let got = (&mut self.inner).take(length as u64).read_to_end(&mut data)?;
            if got != length as usize {
                return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
            }
            data
        };

        let _crc = self.inner.read_u32::<BigEndian>()?;

        Ok(PngChunkRaw {
            header: ChunkHeader { length, typ },
            data,
        })
    }
}

impl<R: Read> Iterator for PngReaderRaw<R> {
    type Item = Result<PngChunkRaw, PngError>;

    fn next(&mut self) -> Option<Self::Item> {
        // An IOError here is a short read, the stream is done
        match self.read_chunk() {
            Err(PngError::IOError(_)) => None,
            Err(x) => Some(Err(x)),
            Ok(x)  => Some(Ok(x)),
        }
    }
}
