use crate::png::reader::MetadataMap;

// Exact-case spellings come before their variants
pub const CANDIDATES: &[&str] = &[
    "Description",
    "description",
    "ImageDescription",
    "Comment",
    "comment",
    "Title",
    "title",
    "Caption",
    "caption",
    "Descripcion",
    "descripción",
    "Descripción",
];

const BLANK: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

pub fn trim_blank(s: &str) -> &str {
    s.trim_matches(BLANK)
}

/// First candidate keyword with non-blank text, trimmed.
pub fn select(meta: &MetadataMap) -> Option<String> {
    CANDIDATES
        .iter()
        .filter_map(|key| meta.get(*key))
        .map(|text| trim_blank(text))
        .find(|text| !text.is_empty())
        .map(str::to_owned)
}

/// Human title from a file name: `city-view_2.png` -> `City View 2`
pub fn title_from_filename(name: &str) -> String {
    let stem = match name.rfind('.') {
        Some(pos) if pos + 1 < name.len() => &name[..pos],
        _ => name,
    };

    let mut spaced = String::with_capacity(stem.len());
    let mut in_run = false;
    for ch in stem.chars() {
        if ch == '_' || ch == '-' {
            if !in_run {
                spaced.push(' ');
            }
            in_run = true;
        } else {
            spaced.push(ch);
            in_run = false;
        }
    }

    let mut title = String::with_capacity(spaced.len());
    let mut word_start = true;
    for ch in trim_blank(&spaced).chars() {
        if word_start {
            title.push(ch.to_ascii_uppercase());
        } else {
            title.push(ch);
        }
        word_start = matches!(ch, ' ' | '\t' | '\r' | '\n' | '\x0C' | '\x0B');
    }
    title
}
