//! Lattice event-log generator
//!
//! Writes a timestamped event log that builds an n×n plane, closes it into a
//! cylinder, then a torus, and finally tears the whole graph down. Feed the
//! output to the replay producer (STREAM_MODE=replay) to watch the
//! construction in a connected visualization client.
//!
//! Environment: LATTICE_SIZE (default 20) sets n; LATTICE_OUT writes to a
//! file instead of stdout.

use std::env;
use std::fs::File;
use std::io::{self, Write};

use graph_stream::client::StreamWriter;
use graph_stream::types::{AttrValue, AttributeMap, StreamResult};

/// Seconds between cell placements, and pauses after each phase, mirroring
/// the pacing of the live demo this log replays.
const STEP: f64 = 0.05;
const PHASE_PAUSE: f64 = 10.0;

fn main() -> StreamResult<()> {
    let n: usize = env::var("LATTICE_SIZE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(20);

    match env::var("LATTICE_OUT") {
        Ok(path) => {
            let mut writer = StreamWriter::buffered(File::create(&path)?);
            emit(&mut writer, n)?;
            writer.flush()?;
            eprintln!("[Lattice] wrote {}x{} lattice log to {}", n, n, path);
        }
        Err(_) => {
            let stdout = io::stdout();
            let mut writer = StreamWriter::buffered(stdout.lock());
            emit(&mut writer, n)?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn emit<W: Write>(writer: &mut StreamWriter<W>, n: usize) -> StreamResult<()> {
    let idx = |i: usize, j: usize| (i * n + j).to_string();
    let mut t = 0.0;

    writer.clean(Some(t))?;

    // Plane: each cell links to its left and upper neighbor.
    for i in 0..n {
        for j in 0..n {
            writer.add_node(&idx(i, j), node_attrs(i, j), Some(t))?;
            if i != 0 {
                add_edge(writer, &idx(i, j), &idx(i - 1, j), t)?;
            }
            if j != 0 {
                add_edge(writer, &idx(i, j), &idx(i, j - 1), t)?;
            }
            t += STEP;
        }
    }
    t += PHASE_PAUSE;

    // Cylinder: close each row.
    for i in 0..n {
        add_edge(writer, &idx(i, n - 1), &idx(i, 0), t)?;
        t += STEP;
    }
    t += PHASE_PAUSE;

    // Torus: close each column.
    for j in 0..n {
        add_edge(writer, &idx(n - 1, j), &idx(0, j), t)?;
        t += STEP;
    }
    t += PHASE_PAUSE;

    // Tear it down.
    for i in 0..n {
        for j in 0..n {
            writer.delete_node(&idx(i, j), Some(t))?;
            t += STEP;
        }
    }

    Ok(())
}

fn node_attrs(i: usize, j: usize) -> AttributeMap {
    let mut attrs = AttributeMap::new();
    attrs.insert("size".to_string(), AttrValue::Int(10));
    attrs.insert("r".to_string(), AttrValue::Float(0.0));
    attrs.insert("g".to_string(), AttrValue::Float(0.0));
    attrs.insert("b".to_string(), AttrValue::Float(1.0));
    attrs.insert("x".to_string(), AttrValue::Int((i % 2) as i64 + 1));
    attrs.insert("y".to_string(), AttrValue::Int((j % 2) as i64 + 1));
    attrs
}

fn add_edge<W: Write>(
    writer: &mut StreamWriter<W>,
    source: &str,
    target: &str,
    t: f64,
) -> StreamResult<()> {
    let id = format!("{}{}", source, target);
    writer.add_edge(&id, source, target, false, AttributeMap::new(), Some(t))
}
