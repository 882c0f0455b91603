//! Lists the PNG images of a directory as JSON, describing each one from
//! the text chunks embedded in the file (`tEXt`, `zTXt`, `iTXt`).
//!
//! The pieces, in the order a listing runs through them:
//! - [`scan`] finds the `*.png` files and sorts them naturally
//! - [`png::reader::extract`] pulls the keyword/text pairs out of one file
//! - [`describe`] picks a description, or builds a title from the file name
//! - [`listing`] assembles the entries, [`response`] shapes what is served
pub mod cli;
pub mod describe;
pub mod charset;
pub mod inflate;
pub mod listing;
pub mod png;
pub mod response;
pub mod scan;
