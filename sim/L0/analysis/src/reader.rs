//! Synchronized reader over the four input streams.

use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use jointspace_types::AnalysisConfig;
use nalgebra::DVector;
use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::frame::{GroundReaction, TimeSeriesFrame, GRF_CHANNELS};
use crate::stream::NumericTable;
use crate::Result;

/// Paths of the four input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamPaths {
    /// Ground-reaction channels (19 columns).
    pub ground_reaction: PathBuf,
    /// States (1 + 2·D columns).
    pub states: PathBuf,
    /// Accelerations (1 + D columns).
    pub accelerations: PathBuf,
    /// Inverse-dynamics net torques (1 + D columns).
    pub dynamics: PathBuf,
}

/// The four input streams, in any [`BufRead`] form.
#[derive(Debug)]
pub struct InputStreams<R> {
    /// Ground-reaction channels.
    pub ground_reaction: R,
    /// States.
    pub states: R,
    /// Accelerations.
    pub accelerations: R,
    /// Net torques.
    pub dynamics: R,
}

/// Reads one time-aligned [`TimeSeriesFrame`] per call from four streams.
///
/// Accelerations not listed in
/// [`AnalysisConfig::unconverted_accelerations`] are converted from degrees
/// to radians.
#[derive(Debug)]
pub struct SynchronizedReader<R> {
    ground_reaction: NumericTable<R>,
    states: NumericTable<R>,
    accelerations: NumericTable<R>,
    dynamics: NumericTable<R>,
    dof_count: usize,
    radians: Vec<bool>,
    time_tolerance: f64,
    require_equal_length: bool,
    frames: usize,
    finished: bool,
}

impl SynchronizedReader<BufReader<File>> {
    /// Open the four input files for a model with `dof_count` DOFs.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Open`] for the first file that cannot be
    /// opened, or a configuration error from
    /// [`AnalysisConfig::validate_for_dofs`].
    pub fn open(
        paths: &StreamPaths,
        dof_count: usize,
        config: &AnalysisConfig,
    ) -> Result<Self> {
        let open = |path: &Path| -> Result<BufReader<File>> {
            File::open(path)
                .map(BufReader::new)
                .map_err(|e| AnalysisError::open(path, e))
        };
        let streams = InputStreams {
            ground_reaction: open(&paths.ground_reaction)?,
            states: open(&paths.states)?,
            accelerations: open(&paths.accelerations)?,
            dynamics: open(&paths.dynamics)?,
        };
        debug!(?paths, dof_count, "opened input streams");
        Self::new(streams, dof_count, config)
    }
}

impl<R: BufRead> SynchronizedReader<R> {
    /// Wrap already open streams.
    ///
    /// # Errors
    ///
    /// Returns a configuration error from
    /// [`AnalysisConfig::validate_for_dofs`], including an unconverted
    /// acceleration index at or beyond `dof_count`.
    pub fn new(
        streams: InputStreams<R>,
        dof_count: usize,
        config: &AnalysisConfig,
    ) -> Result<Self> {
        config.validate_for_dofs(dof_count)?;
        let radians = (0..dof_count)
            .map(|i| config.converts_acceleration(i))
            .collect();
        Ok(Self {
            ground_reaction: NumericTable::new(
                "ground reaction",
                streams.ground_reaction,
                1 + GRF_CHANNELS,
            ),
            states: NumericTable::new("states", streams.states, 1 + 2 * dof_count),
            accelerations: NumericTable::new(
                "accelerations",
                streams.accelerations,
                1 + dof_count,
            ),
            dynamics: NumericTable::new("dynamics", streams.dynamics, 1 + dof_count),
            dof_count,
            radians,
            time_tolerance: config.time_tolerance,
            require_equal_length: config.require_equal_length,
            frames: 0,
            finished: false,
        })
    }

    /// Degrees of freedom per frame.
    pub fn dof_count(&self) -> usize {
        self.dof_count
    }

    /// Frames produced so far.
    pub fn frames_read(&self) -> usize {
        self.frames
    }

    /// Read the next aligned frame, or `None` once the streams are exhausted.
    ///
    /// # Errors
    ///
    /// Propagates stream errors, returns [`AnalysisError::Misaligned`] when a
    /// time stamp differs from the states stream by more than the tolerance,
    /// and [`AnalysisError::LengthMismatch`] when streams end at different
    /// rows and equal lengths are required.
    pub fn next_frame(&mut self) -> Result<Option<TimeSeriesFrame>> {
        if self.finished {
            return Ok(None);
        }

        let grf = self.ground_reaction.next_row()?;
        let states = self.states.next_row()?;
        let acc = self.accelerations.next_row()?;
        let tau = self.dynamics.next_row()?;

        let (Some(grf), Some(states), Some(acc), Some(tau)) =
            (grf.as_ref(), states.as_ref(), acc.as_ref(), tau.as_ref())
        else {
            self.finished = true;
            let present = [
                (self.ground_reaction.name(), grf.is_some()),
                (self.states.name(), states.is_some()),
                (self.accelerations.name(), acc.is_some()),
                (self.dynamics.name(), tau.is_some()),
            ];
            let ended = present.iter().find(|(_, has)| !has).map(|(n, _)| *n);
            let longer = present.iter().find(|(_, has)| *has).map(|(n, _)| *n);
            if let (Some(ended), Some(longer)) = (ended, longer) {
                if self.require_equal_length {
                    return Err(AnalysisError::LengthMismatch {
                        ended: ended.to_string(),
                        rows: self.frames,
                        longer: longer.to_string(),
                    });
                }
                warn!(
                    ended,
                    longer,
                    rows = self.frames,
                    "input streams have unequal lengths"
                );
            }
            debug!(frames = self.frames, "input streams exhausted");
            return Ok(None);
        };

        let time = states[0];
        for (name, row) in [
            (self.ground_reaction.name(), grf),
            (self.accelerations.name(), acc),
            (self.dynamics.name(), tau),
        ] {
            let aligned = row[0].is_finite() && (row[0] - time).abs() <= self.time_tolerance;
            if !aligned {
                return Err(AnalysisError::Misaligned {
                    frame: self.frames,
                    stream: name.to_string(),
                    time: row[0],
                    expected: time,
                });
            }
        }

        let accelerations = DVector::from_iterator(
            self.dof_count,
            acc[1..]
                .iter()
                .zip(&self.radians)
                .map(|(&a, &convert)| if convert { a * PI / 180.0 } else { a }),
        );
        let ground_reaction = GroundReaction::from_slice(&grf[1..]).unwrap_or_default();

        let frame = TimeSeriesFrame {
            time,
            states: states[1..].to_vec(),
            accelerations,
            net_torques: DVector::from_column_slice(&tau[1..]),
            ground_reaction,
        };
        self.frames += 1;
        Ok(Some(frame))
    }
}

impl<R: BufRead> Iterator for SynchronizedReader<R> {
    type Item = Result<TimeSeriesFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
