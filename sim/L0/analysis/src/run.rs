//! End-to-end analysis runs.
//!
//! A run owns the read → decompose → write loop. Any error stops the run;
//! rows already written stay on disk.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use jointspace_types::{
    first_duplicate_name, first_invalid_name, AnalysisConfig, ContactPointSpec, DynamicsError,
    MultibodySystem,
};
use nalgebra::Vector3;
use tracing::{debug, info};

use crate::decompose::{Decomposer, RealizedFrame};
use crate::error::AnalysisError;
use crate::frame::nan_max;
use crate::output::{ForceOutputs, ForceTableWriter};
use crate::reader::SynchronizedReader;
use crate::stream::NumericTable;
use crate::Result;

/// Counters reported at the end of a force run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunSummary {
    /// Frames read and decomposed.
    pub frames_read: usize,
    /// Frames written to the outputs.
    pub frames_written: usize,
    /// Largest absolute residual over the written frames, NaN if any
    /// residual was NaN.
    pub max_abs_residual: f64,
}

/// Decomposes every frame of a recording and writes the components.
pub struct JointSpaceForceRun<'a, S: ?Sized> {
    system: &'a mut S,
    decomposer: Decomposer,
    skip_first_frame: bool,
}

impl<'a, S: MultibodySystem + ?Sized> JointSpaceForceRun<'a, S> {
    /// Prepare a run over `system`.
    ///
    /// # Errors
    ///
    /// See [`Decomposer::new`].
    pub fn new(system: &'a mut S, config: &AnalysisConfig) -> Result<Self> {
        let decomposer = Decomposer::new(&*system, config)?;
        Ok(Self {
            system,
            decomposer,
            skip_first_frame: config.skip_first_frame,
        })
    }

    /// Read frames until the streams are exhausted, writing each decomposed
    /// frame. With `skip_first_frame` the first frame is computed but not
    /// written.
    ///
    /// # Errors
    ///
    /// Returns the first reader, system or write error.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        reader: &mut SynchronizedReader<R>,
        outputs: &mut ForceOutputs<W>,
    ) -> Result<RunSummary> {
        let dofs = self.decomposer.dof_count();
        let found = reader.dof_count();
        if found != dofs {
            let err = DynamicsError::dimension("stream degrees of freedom", dofs, found);
            return Err(err.into());
        }
        info!(
            dofs,
            bodies = self.system.body_count(),
            skip_first_frame = self.skip_first_frame,
            "starting joint-space force run"
        );

        let mut summary = RunSummary::default();
        while let Some(frame) = reader.next_frame()? {
            let decomposition = self.decomposer.decompose(&mut *self.system, &frame)?;
            summary.frames_read += 1;
            if self.skip_first_frame && summary.frames_read == 1 {
                debug!(time = frame.time, "first frame not written");
                continue;
            }
            outputs.write(&decomposition)?;
            summary.frames_written += 1;
            summary.max_abs_residual = nan_max(
                summary.max_abs_residual,
                decomposition.check.max_abs_residual(),
            );
        }
        outputs.flush()?;

        info!(
            frames_read = summary.frames_read,
            frames_written = summary.frames_written,
            max_abs_residual = summary.max_abs_residual,
            "joint-space force run complete"
        );
        Ok(summary)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PointTarget {
    body: usize,
    station: Vector3<f64>,
    output_name: String,
}

/// Writes the frame Jacobian of every contact point for every recorded state.
pub struct FrameJacobianRun<'a, S: ?Sized> {
    system: &'a mut S,
    targets: Vec<PointTarget>,
}

impl<'a, S: MultibodySystem + ?Sized> FrameJacobianRun<'a, S> {
    /// Resolve the points' frames against `system`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DuplicatePointName`] for repeated output
    /// names, [`AnalysisError::InvalidPointName`] for an output name that is
    /// not a plain file name and [`AnalysisError::MissingBody`] for a frame
    /// the model lacks.
    pub fn new(system: &'a mut S, points: &[ContactPointSpec]) -> Result<Self> {
        if let Some(name) = first_invalid_name(points) {
            return Err(AnalysisError::InvalidPointName(name.to_string()));
        }
        if let Some(name) = first_duplicate_name(points) {
            return Err(AnalysisError::DuplicatePointName(name.to_string()));
        }
        let targets = points
            .iter()
            .map(|p| {
                let body = system
                    .find_body_index(&p.frame_name)
                    .ok_or_else(|| AnalysisError::MissingBody {
                        role: "point frame",
                        name: p.frame_name.clone(),
                    })?;
                Ok(PointTarget {
                    body,
                    station: p.point,
                    output_name: p.output_name.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { system, targets })
    }

    /// Output names in point order.
    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.output_name.as_str())
    }

    /// Open a states file (`1 + 2·D` columns) for this system.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Open`] if the file cannot be opened.
    pub fn open_states(&self, path: impl AsRef<Path>) -> Result<NumericTable<BufReader<File>>> {
        NumericTable::open(path, 1 + 2 * self.system.dof_count())
    }

    /// Create `<dir>/<output_name>.txt` for every point.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Open`] if a file cannot be created.
    pub fn create_outputs(
        &self,
        dir: impl AsRef<Path>,
        write_time: bool,
    ) -> Result<Vec<ForceTableWriter<BufWriter<File>>>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| AnalysisError::open(dir, e))?;
        self.output_names()
            .map(|name| ForceTableWriter::create(dir.join(format!("{name}.txt")), write_time))
            .collect()
    }

    /// Realize every state row and append each point's 6×D Jacobian to its
    /// table. Returns the number of frames processed; every frame is
    /// written.
    ///
    /// # Errors
    ///
    /// Returns the first read, system or write error, or a dimension error
    /// when `outputs` does not hold one table per point.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        states: &mut NumericTable<R>,
        outputs: &mut [ForceTableWriter<W>],
    ) -> Result<usize> {
        if outputs.len() != self.targets.len() {
            let expected = self.targets.len();
            let err = DynamicsError::dimension("jacobian outputs", expected, outputs.len());
            return Err(err.into());
        }
        info!(points = self.targets.len(), "starting frame jacobian run");

        let mut frames = 0;
        while let Some(row) = states.next_row()? {
            let time = row[0];
            let realized = RealizedFrame::new(&mut *self.system, &row[1..])?;
            for (target, table) in self.targets.iter().zip(outputs.iter_mut()) {
                let jacobian = realized.frame_jacobian(Some(target.body), &target.station)?;
                table.write_matrix(time, &jacobian)?;
            }
            frames += 1;
        }
        for table in outputs.iter_mut() {
            table.flush()?;
        }

        info!(frames, "frame jacobian run complete");
        Ok(frames)
    }
}
