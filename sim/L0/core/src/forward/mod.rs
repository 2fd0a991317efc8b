//! Stage pipeline: position, velocity and dynamics passes.
//!
//! [`Data::realize`] runs the passes in order up to a requested [`Stage`],
//! skipping passes that are already valid for the current state.

mod position;
mod velocity;

pub use position::fwd_position;
pub use velocity::fwd_velocity;

use jointspace_types::Stage;
use tracing::trace;

use crate::dynamics::fwd_bias;
use crate::types::{Data, Model};

impl Data {
    /// Realize the current `qpos`/`qvel` up to and including `stage`.
    ///
    /// Passes already valid for the current state are not repeated.
    pub fn realize(&mut self, model: &Model, stage: Stage) {
        if self.stage < Stage::Position && stage >= Stage::Position {
            fwd_position(model, self);
            self.stage = Stage::Position;
        }
        if self.stage < Stage::Velocity && stage >= Stage::Velocity {
            fwd_velocity(model, self);
            self.stage = Stage::Velocity;
        }
        if self.stage < Stage::Dynamics && stage >= Stage::Dynamics {
            fwd_bias(model, self);
            self.stage = Stage::Dynamics;
        }
        trace!(stage = ?self.stage, "realized");
    }

    /// Mark every derived quantity stale, e.g. after writing `qpos`/`qvel`.
    pub fn invalidate(&mut self) {
        self.stage = Stage::Model;
    }
}
