//! Append-only trajectory rows
//!
//! One row per call, space separated:
//! - `position`:    `x y z`
//! - `time_radius`: `t |r|` (distance from the coordinate origin)

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::error::SimResult;
use crate::simulation::vector::Vector;

/// Row layout written by [`TrajectoryWriter`]
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowFormat {
    #[default]
    #[serde(rename = "position")]
    Position,

    #[serde(rename = "time_radius")]
    TimeRadius,
}

pub struct TrajectoryWriter<W: Write = BufWriter<File>> {
    out: W,
    format: RowFormat,
    rows: u64,
}

impl TrajectoryWriter {
    /// Open `path` for appending, creating it if needed
    pub fn append(path: impl AsRef<Path>, format: RowFormat) -> SimResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("creating trajectory file {}", path.display());
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_writer(BufWriter::new(file), format))
    }
}

impl<W: Write> TrajectoryWriter<W> {
    pub fn from_writer(out: W, format: RowFormat) -> Self {
        Self {
            out,
            format,
            rows: 0,
        }
    }

    /// Write one sample taken at time `t`
    pub fn record(&mut self, t: f64, position: Vector) -> SimResult<()> {
        match self.format {
            RowFormat::Position => writeln!(self.out, "{position}")?,
            RowFormat::TimeRadius => writeln!(self.out, "{} {}", t, position.magnitude())?,
        }
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn flush(&mut self) -> SimResult<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
