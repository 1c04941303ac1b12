//! File-handling wrapper around `packer-core`'s in-memory codec.
//!
//! `packer-core` performs no I/O by design (spec §5); this crate is the
//! layer that knows about paths, extensions, and the CLI. There is no
//! process-wide file handle or ambient plugin singleton here -- every
//! call takes the path and the value it needs explicitly, unlike the
//! host-plugin design spec.md's Design Notes describe and reject (see
//! DESIGN.md).

use std::path::Path;

pub use packer_core::{CodecError, Level, Table, Value};

/// Extensions that strongly suggest a human- or tool-readable text
/// sink, where writing an LZ4-framed Level 3 payload would silently
/// produce an unreadable file. `save_as` refuses these unless told
/// `force`.
const TEXT_SINK_EXTENSIONS: &[&str] = &["txt", "json", "lua", "luau"];

pub fn save_as(path: &Path, value: &Value, level: Level, force: bool) -> packer_base::Result<()> {
    if level == Level::Three && !force && looks_like_text_sink(path) {
        return Err(packer_base::err(format!(
            "refusing to write a level-3 (binary, entropy-coded) payload to {}; \
             pass force=true to override",
            path.display()
        )));
    }
    let bytes = packer_core::compress(value, level).map_err(packer_base::Error::from)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

pub fn load_from(path: &Path) -> packer_base::Result<Value> {
    let bytes = std::fs::read(path)?;
    packer_core::decompress(&bytes).map_err(packer_base::Error::from)
}

fn looks_like_text_sink(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TEXT_SINK_EXTENSIONS.iter().any(|&known| known.eq_ignore_ascii_case(ext)))
}
