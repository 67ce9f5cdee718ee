use log::warn;

use crate::{
    config::DEFAULT_MAX_STEPS_PER_FRAME,
    dynamics::integrator::BodyIntegrator,
    interaction::pointer::{InteractionEvent, PointerSample},
    object::DeformableObject,
};

/// Host loop owning a deformable object and driving both cadences.
///
/// Each frame runs the input phase once, then as many fixed steps as the
/// accumulator allows. A fixed step is the object's simulation step followed
/// by body integration.
///
/// The step length always comes from the object's current config, so a
/// reconfigured object is stepped at its new rate from the next frame on.
pub struct DeformWorld {
    pub object: DeformableObject,
    pub integrator: BodyIntegrator,
    pub time_accumulated: f32,
    pub max_steps_per_frame: u32,
    steps_taken: u64,
}

impl DeformWorld {
    pub fn new(object: DeformableObject) -> Self {
        Self {
            object,
            integrator: BodyIntegrator::default(),
            time_accumulated: 0.0,
            max_steps_per_frame: DEFAULT_MAX_STEPS_PER_FRAME,
            steps_taken: 0,
        }
    }

    pub fn with_integrator(mut self, integrator: BodyIntegrator) -> Self {
        self.integrator = integrator;
        self
    }

    /// Fixed step length in seconds.
    pub fn time_step(&self) -> f32 {
        self.object.config().fixed_dt()
    }

    /// Total fixed steps executed since construction.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Advances one rendered frame of `frame_dt` seconds.
    pub fn step(&mut self, frame_dt: f32, sample: PointerSample) -> Option<InteractionEvent> {
        let event = self.object.advance_input(sample, frame_dt);

        let time_step = self.time_step();
        self.time_accumulated += frame_dt.max(0.0);
        let mut steps = 0;
        while self.time_accumulated >= time_step {
            if steps == self.max_steps_per_frame {
                warn!(
                    "dropping {:.4} s of simulation after {} fixed steps",
                    self.time_accumulated, steps
                );
                self.time_accumulated = 0.0;
                break;
            }
            self.time_accumulated -= time_step;
            self.fixed_step();
            steps += 1;
        }

        event
    }

    /// Runs exactly one fixed step regardless of the accumulator.
    pub fn fixed_step(&mut self) {
        let time_step = self.time_step();
        self.object.advance_simulation(time_step);
        self.integrator.step(self.object.body_mut(), time_step);
        self.steps_taken += 1;
    }
}
