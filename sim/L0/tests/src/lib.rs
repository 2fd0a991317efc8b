//! Shared fixtures for the end-to-end tests: MJCF sources and synthetic gait
//! recordings written in the on-disk stream layout.

#![deny(clippy::unwrap_used, clippy::expect_used)]

use std::fmt::Write as _;
use std::io;
use std::path::Path;

use jointspace_analysis::GRF_CHANNELS;
use jointspace_types::AnalysisConfig;

/// MJCF source equivalent to `Model::n_link_pendulum(n, length, mass)`.
#[must_use]
pub fn pendulum_mjcf(n: usize, length: f64, mass: f64) -> String {
    let mut bodies = String::new();
    for i in 0..n {
        let pos = if i == 0 { 0.0 } else { -length };
        let _ = write!(
            bodies,
            r#"<body name="link_{i}" pos="0 0 {pos}">
                <joint name="hinge_{i}" type="hinge" axis="0 1 0"/>
                <inertial pos="0 0 {}" mass="{mass}" diaginertia="0.001 0.001 0.001"/>"#,
            -length
        );
    }
    bodies.push_str(&"</body>".repeat(n));
    format!(
        r#"<mujoco model="{n}_link_pendulum">
            <option gravity="0 0 -9.81"/>
            <worldbody>{bodies}</worldbody>
        </mujoco>"#
    )
}

/// A synthetic recording for a model with `D` degrees of freedom.
///
/// Accelerations are in model units; [`GaitRecording::write`] converts them
/// to the file convention.
#[derive(Debug, Clone)]
pub struct GaitRecording {
    /// Frame times.
    pub times: Vec<f64>,
    /// `[q, u]` per frame.
    pub states: Vec<Vec<f64>>,
    /// Generalized accelerations per frame.
    pub accelerations: Vec<Vec<f64>>,
    /// Ground-reaction channels per frame.
    pub ground_reaction: Vec<[f64; GRF_CHANNELS]>,
    /// Net joint torques per frame.
    pub net_torques: Vec<Vec<f64>>,
}

impl GaitRecording {
    /// Smooth motion of every coordinate with a single-stance ground
    /// reaction under the right foot. Net torques start at zero.
    #[must_use]
    pub fn synthetic(dofs: usize, frames: usize, dt: f64) -> Self {
        let mut recording = Self {
            times: Vec::with_capacity(frames),
            states: Vec::with_capacity(frames),
            accelerations: Vec::with_capacity(frames),
            ground_reaction: Vec::with_capacity(frames),
            net_torques: Vec::with_capacity(frames),
        };
        let w = std::f64::consts::TAU;
        for f in 0..frames {
            let t = f as f64 * dt;
            let mut state = vec![0.0; 2 * dofs];
            let mut acc = vec![0.0; dofs];
            for i in 0..dofs {
                let phase = 0.3 * i as f64;
                let amp = 0.2 / (1.0 + i as f64 * 0.1);
                state[i] = amp * (w * t + phase).sin();
                state[dofs + i] = amp * w * (w * t + phase).cos();
                acc[i] = -amp * w * w * (w * t + phase).sin();
            }

            let mut grf = [0.0; GRF_CHANNELS];
            grf[0] = 40.0 * (w * t).sin();
            grf[1] = 700.0 + 50.0 * (w * t).cos();
            grf[2] = -8.0;
            grf[3] = 0.05 + 0.1 * t;
            grf[4] = 0.0;
            grf[5] = 0.09;
            grf[13] = 1.5;

            recording.times.push(t);
            recording.states.push(state);
            recording.accelerations.push(acc);
            recording.ground_reaction.push(grf);
            recording.net_torques.push(vec![0.0; dofs]);
        }
        recording
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the recording has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Write `grf.txt`, `states.txt`, `accelerations.txt` and `dynamics.txt`
    /// into `dir`, each with a header line. Accelerations not exempted by
    /// `config` are written in degrees.
    ///
    /// # Errors
    ///
    /// Returns any I/O error.
    pub fn write(&self, dir: &Path, config: &AnalysisConfig) -> io::Result<()> {
        let degrees: Vec<Vec<f64>> = self
            .accelerations
            .iter()
            .map(|acc| {
                acc.iter()
                    .enumerate()
                    .map(|(i, a)| {
                        if config.converts_acceleration(i) {
                            a.to_degrees()
                        } else {
                            *a
                        }
                    })
                    .collect()
            })
            .collect();
        let grf: Vec<Vec<f64>> = self.ground_reaction.iter().map(|c| c.to_vec()).collect();

        let tables = [
            ("grf.txt", "time\tground_force", &grf),
            ("states.txt", "time\tstates", &self.states),
            ("accelerations.txt", "time\tudot", &degrees),
            ("dynamics.txt", "time\ttau", &self.net_torques),
        ];
        for (name, header, rows) in tables {
            write_table(&dir.join(name), header, &self.times, rows)?;
        }
        Ok(())
    }
}

/// Write a header line then `time<TAB>values...` per row.
///
/// # Errors
///
/// Returns any I/O error.
pub fn write_table(
    path: &Path,
    header: &str,
    times: &[f64],
    rows: &[Vec<f64>],
) -> io::Result<()> {
    let mut text = format!("{header}\n");
    for (t, row) in times.iter().zip(rows) {
        text.push_str(&t.to_string());
        for v in row {
            text.push('\t');
            text.push_str(&v.to_string());
        }
        text.push('\n');
    }
    std::fs::write(path, text)
}
