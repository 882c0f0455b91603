use std::io::{Error, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use flate2::Crc;

use crate::png::SIGNATURE;

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

pub struct PngBuilder<W: Write> {
    inner: W,
}

// Writes just enough PNG structure for the reader tests
impl<W: Write> PngBuilder<W> {
    pub fn new(writer: W) -> Self {
        PngBuilder {
            inner: writer,
        }
    }

    pub fn to_inner(self) -> W {
        self.inner
    }

    pub fn write_signature(&mut self) -> Result<usize, Error> {
        self.inner.write_all(&SIGNATURE)?;
        Ok(SIGNATURE.len())
    }

    pub fn write_chunk(&mut self, chunk_type: &[u8; 4], data: &[u8]) -> Result<usize, Error> {
        let crc = {
            let mut crc = Crc::new();
            crc.update(chunk_type);
            crc.update(data);
            crc.sum()
        };

        self.inner.write_all(&(data.len() as u32).to_be_bytes())?;
        self.inner.write_all(chunk_type)?;
        self.inner.write_all(data)?;
        self.inner.write_all(&crc.to_be_bytes())?;

        Ok(12 + data.len())
    }

    pub fn write_ihdr(&mut self, width: u32, height: u32) -> Result<usize, Error> {
        let mut data = vec![];
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        // 8 bit RGBA, deflate, adaptive filtering, no interlace
        data.extend_from_slice(&[8, 6, 0, 0, 0]);
        self.write_chunk(b"IHDR", &data)
    }

    pub fn write_text(&mut self, keyword: &[u8], text: &[u8]) -> Result<usize, Error> {
        let mut data = vec![];
        data.extend_from_slice(keyword);
        data.push(0);
        data.extend_from_slice(text);
        self.write_chunk(b"tEXt", &data)
    }

    pub fn write_ztxt(&mut self, keyword: &[u8], method: u8, payload: &[u8]) -> Result<usize, Error> {
        let mut data = vec![];
        data.extend_from_slice(keyword);
        data.push(0);
        data.push(method);
        data.extend_from_slice(payload);
        self.write_chunk(b"zTXt", &data)
    }

    pub fn write_itxt(
        &mut self,
        keyword: &[u8],
        flag: u8,
        method: u8,
        language: &[u8],
        translated: &[u8],
        text: &[u8],
    ) -> Result<usize, Error> {
        let mut data = vec![];
        data.extend_from_slice(keyword);
        data.push(0);
        data.push(flag);
        data.push(method);
        data.extend_from_slice(language);
        data.push(0);
        data.extend_from_slice(translated);
        data.push(0);
        data.extend_from_slice(text);
        self.write_chunk(b"iTXt", &data)
    }

    pub fn write_iend(&mut self) -> Result<usize, Error> {
        self.write_chunk(b"IEND", &[])
    }
}
