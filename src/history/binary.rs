use super::{LoadedHistory, REDO_SECTION, UNDO_SECTION};
use crate::command::MacroCommand;
use anyhow::{bail, Context, Result};
use flate2::{write::GzEncoder, read::GzDecoder, Compression};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
pub const MAGIC: &[u8; 8] = b"FUNDOLOG";
pub const SCHEMA_VERSION: u16 = 1;
const HEADER_LEN: usize = 8 + 2 + 16;
#[derive(Serialize)]
struct SectionRef<'a> {
    tag: &'a str,
    commands: &'a [&'a MacroCommand],
}
/// The tag is informational; sections are read back by position.
#[derive(Deserialize)]
struct Section {
    #[allow(dead_code)]
    tag: String,
    commands: Vec<MacroCommand>,
}
pub fn encode(undo: &[&MacroCommand], redo: &[&MacroCommand], level: u8) -> Result<Vec<u8>> {
    let sections = (
        SectionRef {
            tag: UNDO_SECTION,
            commands: undo,
        },
        SectionRef {
            tag: REDO_SECTION,
            commands: redo,
        },
    );
    let payload = bincode::serialize(&sections).context("Failed to encode history")?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level.min(9) as u32));
    encoder.write_all(&payload)?;
    let compressed = encoder.finish().context("Failed to compress history")?;
    let mut data = Vec::with_capacity(HEADER_LEN + compressed.len());
    data.extend_from_slice(MAGIC);
    data.extend_from_slice(&SCHEMA_VERSION.to_le_bytes());
    data.extend_from_slice(&md5::compute(&compressed).0);
    data.extend_from_slice(&compressed);
    Ok(data)
}
pub fn decode(data: &[u8]) -> Result<LoadedHistory> {
    if data.len() < HEADER_LEN {
        bail!("history file truncated ({} bytes)", data.len());
    }
    let (magic, rest) = data.split_at(MAGIC.len());
    if magic != MAGIC {
        bail!("not a fundo history file");
    }
    let (version, rest) = rest.split_at(2);
    let version = u16::from_le_bytes([version[0], version[1]]);
    if version == 0 || version > SCHEMA_VERSION {
        bail!(
            "unsupported history schema version {} (this build reads 1 to {})", version,
            SCHEMA_VERSION
        );
    }
    let (digest, payload) = rest.split_at(16);
    if md5::compute(payload).0 != digest {
        bail!("history checksum mismatch");
    }
    let mut decoder = GzDecoder::new(payload);
    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw).context("Failed to decompress history")?;
    decode_payload(version, &raw)
}
/// Each schema version keeps its own reader; a new version adds an arm here.
fn decode_payload(version: u16, raw: &[u8]) -> Result<LoadedHistory> {
    match version {
        1 => {
            let (undo, redo): (Section, Section) = bincode::deserialize(raw)
                .context("Failed to decode history")?;
            Ok(LoadedHistory {
                undo: undo.commands,
                redo: redo.commands,
            })
        }
        other => bail!("no reader for history schema version {}", other),
    }
}
