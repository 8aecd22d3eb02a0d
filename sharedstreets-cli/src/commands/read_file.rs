//! Read-file command - dump the records of a local layer file.
//!
//! Works offline on a downloaded `.pbf` layer. When no kind is given it is
//! guessed from the first frame that decodes as some record kind and then
//! applied to the whole file, since a layer holds a single kind.

use std::path::PathBuf;

use serde_json::{json, Value};

use sharedstreets::codec::{sniff_kind, FramedRecords, ProtobufCodec, TileCodec};
use sharedstreets::model::{Layer, RecordKind};

use crate::error::CliError;
use crate::geojson::record_to_json;

/// Arguments for the read-file command.
pub struct ReadFileArgs {
    pub path: PathBuf,
    pub kind: Option<Layer>,
}

/// Outcome of dumping one buffer.
#[derive(Debug, Default)]
pub struct Dump {
    pub kind: Option<RecordKind>,
    pub entries: Vec<Value>,
    pub skipped: usize,
}

/// Run the read-file command.
pub fn run(args: ReadFileArgs) -> Result<(), CliError> {
    let buf = std::fs::read(&args.path).map_err(|error| CliError::FileRead {
        path: args.path.clone(),
        error,
    })?;

    let dump = dump_records(&buf, args.kind.map(RecordKind::from));
    for entry in &dump.entries {
        println!("{}", entry);
    }

    match dump.kind {
        Some(kind) => eprintln!(
            "{} {} record(s), {} skipped, {} bytes",
            dump.entries.len(),
            kind,
            dump.skipped,
            buf.len()
        ),
        None => eprintln!("No decodable records in {} bytes", buf.len()),
    }
    Ok(())
}

/// Decodes every frame of `buf`, one JSON line per record.
///
/// Each entry carries the byte offset of its frame. Undecodable frames are
/// counted and passed over; a broken length prefix ends the dump.
pub fn dump_records(buf: &[u8], kind: Option<RecordKind>) -> Dump {
    let codec = ProtobufCodec;
    let mut dump = Dump {
        kind,
        ..Dump::default()
    };

    let mut frames = FramedRecords::new(buf);
    loop {
        let offset = frames.position();
        let frame = match frames.next() {
            Some(Ok(frame)) => frame,
            Some(Err(e)) => {
                eprintln!("bytes {}: {}", offset, e);
                dump.skipped += 1;
                break;
            }
            None => break,
        };

        let kind = match dump.kind.or_else(|| sniff_kind(frame)) {
            Some(kind) => kind,
            None => {
                dump.skipped += 1;
                continue;
            }
        };
        dump.kind = Some(kind);

        match codec.decode(frame, kind) {
            Ok(record) => dump.entries.push(json!({
                "offset": offset,
                "length": frame.len(),
                "kind": kind.to_string(),
                "record": record_to_json(&record),
            })),
            Err(e) => {
                eprintln!("bytes {}: {}", offset, e);
                dump.skipped += 1;
            }
        }
    }

    dump
}
