use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, warn};

use crate::png::raw::{ChunkType, PngChunkRaw, PngReaderRaw};
use crate::png::text::TextChunk;

/// Keyword to text, last chunk wins on a repeated keyword.
pub type MetadataMap = BTreeMap<String, String>;

// Default cap on the decompressed size of one text chunk
pub const MAX_TEXT_SIZE: usize = 1024 * 1024;

#[derive(Debug, PartialEq, Eq)]
pub enum ChunkOutcome {
    Accepted { keyword: String, text: String },
    Skipped,
    Halt,
}

pub fn process_chunk(chunk: &PngChunkRaw, text_limit: usize) -> ChunkOutcome {
    let typ = chunk.header.typ;
    let parsed = match typ {
        ChunkType::TEXT => TextChunk::parse_text(&chunk.data),
        ChunkType::ZTXT => TextChunk::parse_ztxt(&chunk.data, text_limit),
        ChunkType::ITXT => TextChunk::parse_itxt(&chunk.data, text_limit),
        ChunkType::IEND => return ChunkOutcome::Halt,
        _ => return ChunkOutcome::Skipped,
    };

    match parsed {
        Ok(text) => ChunkOutcome::Accepted {
            keyword: text.keyword(),
            text: text.text(),
        },
        Err(e) => {
            debug!("{:?} dropped: {}", typ, e);
            ChunkOutcome::Skipped
        }
    }
}

/// Collect every text chunk of a PNG stream.
///
/// This never fails: a bad signature gives an empty map, and a read error or
/// a malformed chunk header ends the parse with whatever was decoded so far.
pub fn extract<R: Read>(reader: R) -> MetadataMap {
    extract_with_limit(reader, MAX_TEXT_SIZE)
}

pub fn extract_with_limit<R: Read>(reader: R, text_limit: usize) -> MetadataMap {
    let mut out = MetadataMap::new();
    let mut raw = PngReaderRaw::new(reader);

    if let Err(e) = raw.read_signature() {
        debug!("no text: {}", e);
        return out;
    }

    for chunk in raw {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                debug!("parse halted: {}", e);
                break;
            }
        };

        match process_chunk(&chunk, text_limit) {
            ChunkOutcome::Accepted { keyword, text } => {
                out.insert(keyword, text);
            }
            ChunkOutcome::Skipped => (),
            ChunkOutcome::Halt => {
                debug!("IEND reached");
                break;
            }
        }
    }
    out
}

/// Open `path` and [`extract`] from at most `max_bytes` of it (`0` for the
/// whole file). An unreadable file gives an empty map.
pub fn read_file(path: &Path, max_bytes: u64, text_limit: usize) -> MetadataMap {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!("{}: {}", path.display(), e);
            return MetadataMap::new();
        }
    };

    let limit = if max_bytes == 0 { u64::MAX } else { max_bytes };
    extract_with_limit(BufReader::new(file).take(limit), text_limit)
}


#[cfg(test)]
mod test_extract {
    use std::io::Cursor;

    use crate::png::builder::{zlib, PngBuilder};
    use super::*;

    fn png<F: FnOnce(&mut PngBuilder<Vec<u8>>)>(body: F) -> Vec<u8> {
        let mut builder = PngBuilder::new(Vec::new());
        builder.write_signature().unwrap();
        builder.write_ihdr(16, 9).unwrap();
        body(&mut builder);
        builder.to_inner()
    }

    fn map(pairs: &[(&str, &str)]) -> MetadataMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn no_text_chunks() {
        let data = png(|b| {
            b.write_chunk(b"IDAT", &zlib(&[0; 64])).unwrap();
            b.write_iend().unwrap();
        });
        assert_eq!(extract(Cursor::new(data)), MetadataMap::new());
    }

    #[test]
    fn no_signature() {
        let mut data = png(|b| {
            b.write_text(b"Title", b"Hello").unwrap();
        });
        data[0] = 0x88;
        assert_eq!(extract(Cursor::new(data)), MetadataMap::new());
    }

    #[test]
    fn empty_stream() {
        assert_eq!(extract(Cursor::new(Vec::new())), MetadataMap::new());
    }

    #[test]
    fn one_text() {
        let data = png(|b| {
            b.write_text(b"Title", b"Hello").unwrap();
            b.write_iend().unwrap();
        });
        assert_eq!(extract(Cursor::new(data)), map(&[("Title", "Hello")]));
    }

    #[test]
    fn all_three_kinds() {
        let data = png(|b| {
            b.write_text(b"Author", b"Jos\xE9").unwrap();
            b.write_ztxt(b"Description", 0, &zlib("Café".as_bytes())).unwrap();
            b.write_itxt(b"Title", 1, 0, b"fr", "Titre".as_bytes(), &zlib("Été".as_bytes())).unwrap();
            b.write_iend().unwrap();
        });
        assert_eq!(
            extract(Cursor::new(data)),
            map(&[("Author", "José"), ("Description", "Café"), ("Title", "Été")])
        );
    }

    #[test]
    fn compressible_text_decoded() {
        let text = "Night skyline over the river. ".repeat(200);
        let comp = zlib(text.as_bytes());
        assert!(comp.len() * 10 < text.len());

        let data = png(|b| {
            b.write_ztxt(b"Description", 0, &comp).unwrap();
            b.write_itxt(b"Comment", 1, 0, b"en", b"", &comp).unwrap();
            b.write_iend().unwrap();
        });
        assert_eq!(
            extract(Cursor::new(data)),
            map(&[("Comment", text.as_str()), ("Description", text.as_str())])
        );
    }

    #[test]
    fn ztxt_bad_method_skipped() {
        let data = png(|b| {
            b.write_ztxt(b"Description", 1, &zlib(b"nope")).unwrap();
            b.write_text(b"Title", b"kept").unwrap();
            b.write_iend().unwrap();
        });
        assert_eq!(extract(Cursor::new(data)), map(&[("Title", "kept")]));
    }

    #[test]
    fn ztxt_corrupt_skipped() {
        let data = png(|b| {
            b.write_ztxt(b"Description", 0, b"not compressed at all!").unwrap();
            b.write_iend().unwrap();
        });
        assert_eq!(extract(Cursor::new(data)), MetadataMap::new());
    }

    #[test]
    fn itxt_corrupt_kept_raw() {
        let data = png(|b| {
            b.write_itxt(b"Comment", 1, 0, b"", b"", b"not compressed at all!").unwrap();
            b.write_iend().unwrap();
        });
        assert_eq!(
            extract(Cursor::new(data)),
            map(&[("Comment", "not compressed at all!")])
        );
    }

    #[test]
    fn malformed_itxt_only_drops_itself() {
        let data = png(|b| {
            b.write_chunk(b"iTXt", b"Comment\x00\x00\x00no-terminator").unwrap();
            b.write_text(b"Title", b"after").unwrap();
            b.write_iend().unwrap();
        });
        assert_eq!(extract(Cursor::new(data)), map(&[("Title", "after")]));
    }

    #[test]
    fn text_without_nul_skipped() {
        let data = png(|b| {
            b.write_chunk(b"tEXt", b"no separator").unwrap();
            b.write_text(b"Title", b"after").unwrap();
        });
        assert_eq!(extract(Cursor::new(data)), map(&[("Title", "after")]));
    }

    #[test]
    fn iend_first() {
        let data = png(|b| {
            b.write_iend().unwrap();
            b.write_text(b"Title", b"too late").unwrap();
        });
        assert_eq!(extract(Cursor::new(data)), MetadataMap::new());
    }

    #[test]
    fn after_iend_never_read() {
        let data = png(|b| {
            b.write_text(b"Title", b"before").unwrap();
            b.write_iend().unwrap();
            b.write_text(b"Title", b"after").unwrap();
        });
        assert_eq!(extract(Cursor::new(data)), map(&[("Title", "before")]));
    }

    #[test]
    fn truncated_keeps_prior() {
        let mut data = png(|b| {
            b.write_text(b"Title", b"first").unwrap();
        });
        data.extend_from_slice(&100u32.to_be_bytes());
        data.extend_from_slice(b"tEXt");
        data.extend_from_slice(b"Comment\x00ab");

        assert_eq!(extract(Cursor::new(data)), map(&[("Title", "first")]));
    }

    #[test]
    fn missing_iend_is_soft_end() {
        let data = png(|b| {
            b.write_text(b"Title", b"no trailer").unwrap();
        });
        assert_eq!(extract(Cursor::new(data)), map(&[("Title", "no trailer")]));
    }

    #[test]
    fn duplicate_keyword_last_wins() {
        let data = png(|b| {
            b.write_text(b"Comment", b"one").unwrap();
            b.write_itxt(b"Comment", 0, 0, b"", b"", b"two").unwrap();
            b.write_iend().unwrap();
        });
        assert_eq!(extract(Cursor::new(data)), map(&[("Comment", "two")]));
    }

    #[test]
    fn keyword_case_sensitive() {
        let data = png(|b| {
            b.write_text(b"title", b"lower").unwrap();
            b.write_text(b"Title", b"upper").unwrap();
        });
        assert_eq!(
            extract(Cursor::new(data)),
            map(&[("Title", "upper"), ("title", "lower")])
        );
    }

    #[test]
    fn idempotent() {
        let data = png(|b| {
            b.write_text(b"Title", b"Hello").unwrap();
            b.write_ztxt(b"Comment", 0, &zlib(b"World")).unwrap();
            b.write_iend().unwrap();
        });
        assert_eq!(extract(Cursor::new(&data)), extract(Cursor::new(&data)));
    }

    #[test]
    fn outcome_tags() {
        let chunk = |typ: &[u8; 4], data: &[u8]| {
            let mut b = PngBuilder::new(Vec::new());
            b.write_signature().unwrap();
            b.write_chunk(typ, data).unwrap();
            let mut raw = PngReaderRaw::new(Cursor::new(b.to_inner()));
            raw.read_signature().unwrap();
            raw.next().unwrap().unwrap()
        };

        assert_eq!(
            process_chunk(&chunk(b"tEXt", b"k\x00v"), MAX_TEXT_SIZE),
            ChunkOutcome::Accepted { keyword: "k".to_string(), text: "v".to_string() }
        );
        assert_eq!(process_chunk(&chunk(b"tEXt", b"kv"), MAX_TEXT_SIZE), ChunkOutcome::Skipped);
        assert_eq!(process_chunk(&chunk(b"pHYs", &[0; 9]), MAX_TEXT_SIZE), ChunkOutcome::Skipped);
        assert_eq!(process_chunk(&chunk(b"IEND", &[]), MAX_TEXT_SIZE), ChunkOutcome::Halt);
        // Exact match only
        assert_eq!(process_chunk(&chunk(b"TEXT", b"k\x00v"), MAX_TEXT_SIZE), ChunkOutcome::Skipped);
    }

    #[test]
    fn read_file_with_cap() {
        let data = png(|b| {
            b.write_text(b"Title", b"first").unwrap();
            b.write_text(b"Comment", b"second").unwrap();
        });
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capped.png");
        std::fs::write(&path, &data).unwrap();

        // Signature + IHDR + first tEXt only
        let first_end = 8 + 25 + 12 + "Title\x00first".len() as u64;

        assert_eq!(read_file(&path, first_end, MAX_TEXT_SIZE), map(&[("Title", "first")]));
        assert_eq!(read_file(&path, 0, MAX_TEXT_SIZE).len(), 2);
    }

    #[test]
    fn read_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_file(&dir.path().join("gone.png"), 0, MAX_TEXT_SIZE).is_empty());
    }
}
