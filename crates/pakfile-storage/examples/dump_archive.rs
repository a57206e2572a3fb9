#![allow(clippy::expect_used, clippy::panic)]

//! List the members of a packed archive and show their leading bytes.
//!
//! Usage:
//!   cargo run --example dump_archive -p pakfile-storage -- DATA.PAK
//!   cargo run --example dump_archive -p pakfile-storage -- DATA.PAK \
//!       '{"kind":"record_table","preamble":0}'
//!
//! The optional second argument is a JSON layout. Without it the record
//! table layout is assumed. Set `RUST_LOG=debug` to see parse details.

use pakfile_storage::{Archive, ArchiveConfig, FormatVariant};
use std::io::Read;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .unwrap_or_else(|| panic!("usage: dump_archive <archive> [layout-json]"));
    let variant = args.next().map_or_else(FormatVariant::record_table, |json| {
        serde_json::from_str(&json).expect("layout must be a JSON FormatVariant")
    });

    let config = ArchiveConfig::new().with_accept_empty(true);
    let archive =
        Archive::open_with_config(&path, variant, config).expect("failed to open archive");

    println!(
        "{}: {} layout, {} members",
        archive.path().display(),
        archive.directory().kind(),
        archive.len()
    );
    for warning in archive.warnings() {
        println!("  warning: {warning}");
    }
    println!();

    for entry in archive.directory() {
        let mut stream = match archive.open_member(&entry.name) {
            Ok(stream) => stream,
            Err(e) => {
                println!(
                    "{:<24} offset={:>10} size={:>8}  error: {e}",
                    entry.name, entry.offset, entry.size
                );
                continue;
            }
        };

        let mut head = [0u8; 16];
        let mut filled = 0;
        while filled < head.len() {
            match stream.read(&mut head[filled..]) {
                Ok(0) | Err(_) => break,
                Ok(n) => filled += n,
            }
        }

        println!(
            "{:<24} offset={:>10} size={:>8} {} {}",
            entry.name,
            entry.offset,
            entry.size,
            if stream.is_decompressed() {
                format!("lzss->{}", stream.len())
            } else {
                "raw".to_string()
            },
            hex::encode(&head[..filled])
        );
    }
}
