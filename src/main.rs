use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use log::error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use pngfolio::cli::Cli;
use pngfolio::cli::Commands;
use pngfolio::cli::Config;
use pngfolio::{listing, png, response};

fn main() -> ExitCode {
    env_logger::init();

    // Parse the cli
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let script_name = std::env::var("SCRIPT_NAME").ok();

    match cli.command {
        Commands::List { dir, base_url, pretty } => {
            let mut config = config;
            if let Some(dir) = dir {
                config.dir = dir;
            }
            if base_url.is_some() {
                config.base_url = base_url;
            }

            let opts = config.listing_options(script_name.as_deref());
            let resp = match response::listing_response(listing::build_listing(&opts), pretty) {
                Ok(resp) => resp,
                Err(e) => {
                    error!("response: {}", e);
                    return ExitCode::FAILURE;
                }
            };

            println!("{}", resp.body());
            if resp.status().is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        },
        Commands::Cgi => {
            let opts = config.listing_options(script_name.as_deref());
            let resp = match response::listing_response(listing::build_listing(&opts), false) {
                Ok(resp) => resp,
                Err(e) => {
                    error!("response: {}", e);
                    return ExitCode::FAILURE;
                }
            };

            // The status travels in the output, the process itself succeeded
            let mut stdout = std::io::stdout().lock();
            match stdout.write_all(response::render_cgi(&resp).as_bytes()).and_then(|_| stdout.flush()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!("stdout: {}", e);
                    ExitCode::FAILURE
                }
            }
        },
        Commands::Inspect { files } => {
            let opts = config.listing_options(None);
            for path in files.iter() {
                inspect(path, &opts);
            }
            ExitCode::SUCCESS
        },
    }
}

fn inspect(path: &Path, opts: &listing::ListingOptions) {
    println!("{}", path.display());

    let entry = listing::describe_file(path, opts);
    println!("\tsize:  {}", entry.size.as_deref().unwrap_or("-"));
    println!("\tdim:   {}", entry.dim.as_deref().unwrap_or("-"));

    let mtime = entry
        .mtime
        .and_then(|t| OffsetDateTime::from_unix_timestamp(t).ok())
        .and_then(|t| t.format(&Rfc3339).ok());
    println!("\tmtime: {}", mtime.as_deref().unwrap_or("-"));

    match (&entry.desc, &entry.title) {
        (Some(desc), _) => println!("\tdesc:  {:?}", desc),
        (None, Some(title)) => println!("\ttitle: {:?}", title),
        (None, None) => (),
    }

    let meta = png::reader::read_file(path, opts.max_file_size, opts.max_text_size);
    if meta.is_empty() {
        println!("\t(no text chunks)");
    }
    for (keyword, text) in meta.iter() {
        println!("\t{}: {:?}", keyword, text);
    }
}
