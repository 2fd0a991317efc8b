//! Tab-separated output tables.
//!
//! Values use Rust's shortest round-trip `f64` formatting, so re-reading a
//! row reproduces every value exactly.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use jointspace_types::AnalysisConfig;
use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::decompose::Decomposition;
use crate::error::AnalysisError;
use crate::Result;

/// Inertia forces file.
pub const INERTIA_FILE: &str = "inertia.txt";
/// Coriolis forces file.
pub const CORIOLIS_FILE: &str = "coriolis.txt";
/// Gravity forces file.
pub const GRAVITY_FILE: &str = "gravity.txt";
/// Combined ground-contact forces file.
pub const EXTERNAL_FILE: &str = "external.txt";
/// Recorded actuation file.
pub const ACTUATION_FILE: &str = "actuation.txt";
/// Residual file.
pub const RESIDUAL_FILE: &str = "residual.txt";
/// Internal forces file.
pub const INTERNAL_FILE: &str = "internal.txt";
/// Right attachment Jacobian file.
pub const RIGHT_ATTACHMENT_FILE: &str = "right_attachment_jacobian.txt";
/// Left attachment Jacobian file.
pub const LEFT_ATTACHMENT_FILE: &str = "left_attachment_jacobian.txt";

/// Writes rows of numbers, optionally prefixed with a time stamp.
#[derive(Debug)]
pub struct ForceTableWriter<W> {
    inner: W,
    target: String,
    write_time: bool,
    rows: usize,
    line: String,
}

impl ForceTableWriter<BufWriter<File>> {
    /// Create (truncate) a file.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Open`] if the file cannot be created.
    pub fn create(path: impl AsRef<Path>, write_time: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| AnalysisError::open(path, e))?;
        Ok(Self::new(
            BufWriter::new(file),
            path.display().to_string(),
            write_time,
        ))
    }
}

impl<W: Write> ForceTableWriter<W> {
    /// Wrap a writer. `target` names it in error messages.
    pub fn new(inner: W, target: impl Into<String>, write_time: bool) -> Self {
        Self {
            inner,
            target: target.into(),
            write_time,
            rows: 0,
            line: String::new(),
        }
    }

    /// Rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// The wrapped writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the writer. Buffered data is not flushed.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn write_row(&mut self, time: f64, values: impl Iterator<Item = f64>) -> Result<()> {
        self.line.clear();
        if self.write_time {
            self.line.push_str(&time.to_string());
        }
        for (i, v) in values.enumerate() {
            if i > 0 || self.write_time {
                self.line.push('\t');
            }
            self.line.push_str(&v.to_string());
        }
        self.line.push('\n');
        self.inner
            .write_all(self.line.as_bytes())
            .map_err(|e| AnalysisError::write(self.target.clone(), e))?;
        self.rows += 1;
        Ok(())
    }

    /// Write one row.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Write`] on I/O failure.
    pub fn write_vector(&mut self, time: f64, values: &DVector<f64>) -> Result<()> {
        self.write_row(time, values.iter().copied())
    }

    /// Write a matrix as consecutive rows, each prefixed with `time` when
    /// time stamps are enabled.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Write`] on I/O failure.
    pub fn write_matrix(&mut self, time: f64, matrix: &DMatrix<f64>) -> Result<()> {
        for row in matrix.row_iter() {
            self.write_row(time, row.iter().copied())?;
        }
        Ok(())
    }

    /// Flush the writer.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Write`] on I/O failure.
    pub fn flush(&mut self) -> Result<()> {
        self.inner
            .flush()
            .map_err(|e| AnalysisError::write(self.target.clone(), e))
    }
}

/// The output tables of a force run.
#[derive(Debug)]
pub struct ForceOutputs<W> {
    /// `M q̈`.
    pub inertia: ForceTableWriter<W>,
    /// Coriolis and centrifugal forces.
    pub coriolis: ForceTableWriter<W>,
    /// Gravity forces.
    pub gravity: ForceTableWriter<W>,
    /// Right plus left ground-contact forces.
    pub external: ForceTableWriter<W>,
    /// Recorded net torques.
    pub actuation: ForceTableWriter<W>,
    /// Residual check.
    pub residual: ForceTableWriter<W>,
    /// Internal forces.
    pub internal: ForceTableWriter<W>,
    /// Right and left attachment Jacobians, when configured.
    pub attachments: Option<(ForceTableWriter<W>, ForceTableWriter<W>)>,
}

impl ForceOutputs<BufWriter<File>> {
    /// Create every output file in `dir`, creating the directory if needed.
    ///
    /// Attachment files are created only when `config.attachment` is set.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Open`] if the directory or a file cannot be
    /// created.
    pub fn create(dir: impl AsRef<Path>, config: &AnalysisConfig) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| AnalysisError::open(dir, e))?;
        let outputs = Self::from_fn(config, |name| {
            ForceTableWriter::create(dir.join(name), config.write_time)
        })?;
        debug!(dir = %dir.display(), "created output files");
        Ok(outputs)
    }
}

impl<W: Write> ForceOutputs<W> {
    /// Build the tables from a constructor called once per file name.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `open`.
    pub fn from_fn(
        config: &AnalysisConfig,
        mut open: impl FnMut(&'static str) -> Result<ForceTableWriter<W>>,
    ) -> Result<Self> {
        let attachments = if config.attachment.is_some() {
            Some((open(RIGHT_ATTACHMENT_FILE)?, open(LEFT_ATTACHMENT_FILE)?))
        } else {
            None
        };
        Ok(Self {
            inertia: open(INERTIA_FILE)?,
            coriolis: open(CORIOLIS_FILE)?,
            gravity: open(GRAVITY_FILE)?,
            external: open(EXTERNAL_FILE)?,
            actuation: open(ACTUATION_FILE)?,
            residual: open(RESIDUAL_FILE)?,
            internal: open(INTERNAL_FILE)?,
            attachments,
        })
    }

    /// Append one decomposed frame to every table.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Write`] on I/O failure.
    pub fn write(&mut self, d: &Decomposition) -> Result<()> {
        let t = d.time;
        self.inertia.write_vector(t, &d.forces.inertia)?;
        self.coriolis.write_vector(t, &d.forces.coriolis)?;
        self.gravity.write_vector(t, &d.forces.gravity)?;
        self.external.write_vector(t, &d.forces.external())?;
        self.actuation.write_vector(t, &d.forces.actuation)?;
        self.residual.write_vector(t, &d.check.residual)?;
        self.internal.write_vector(t, &d.check.internal)?;
        if let (Some((right, left)), Some(jacobians)) = (&mut self.attachments, &d.attachments) {
            right.write_matrix(t, &jacobians.right)?;
            left.write_matrix(t, &jacobians.left)?;
        }
        Ok(())
    }

    /// Flush every table.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Write`] on I/O failure.
    pub fn flush(&mut self) -> Result<()> {
        for table in [
            &mut self.inertia,
            &mut self.coriolis,
            &mut self.gravity,
            &mut self.external,
            &mut self.actuation,
            &mut self.residual,
            &mut self.internal,
        ] {
            table.flush()?;
        }
        if let Some((right, left)) = &mut self.attachments {
            right.flush()?;
            left.flush()?;
        }
        Ok(())
    }
}

/// Parse a row written by [`ForceTableWriter`].
///
/// # Errors
///
/// Returns [`AnalysisError::Malformed`] for a token that is not a number.
pub fn parse_row(line: &str) -> Result<Vec<f64>> {
    line.split('\t')
        .map(|token| {
            token
                .trim()
                .parse::<f64>()
                .map_err(|_| AnalysisError::Malformed {
                    stream: "output row".to_string(),
                    line: 1,
                    token: token.to_string(),
                })
        })
        .collect()
}
