//! Host loop wiring a controller to its collaborators

use log::{debug, info};

use crate::controller::AnimationController;
use crate::error::Result;
use crate::source::{AnimationSource, InputSource, Renderer, SkeletonSource};

/// Something a host calls once to set up and then once per frame
pub trait Simulation {
    fn init(&mut self) -> Result<()>;

    fn update(&mut self, delta_time: f32) -> Result<()>;
}

/// Owns an [`AnimationController`] together with the sources, input and
/// renderer it is driven with
#[derive(Debug)]
pub struct SimulationHost<S, A, I, R> {
    controller: AnimationController,
    skeleton: S,
    animations: A,
    input: I,
    renderer: R,
    frames: usize,
}

impl<S, A, I, R> SimulationHost<S, A, I, R>
where
    S: SkeletonSource,
    A: AnimationSource,
    I: InputSource,
    R: Renderer,
{
    pub fn new(
        controller: AnimationController,
        skeleton: S,
        animations: A,
        input: I,
        renderer: R,
    ) -> Self {
        Self {
            controller,
            skeleton,
            animations,
            input,
            renderer,
            frames: 0,
        }
    }

    /// Run `frames` updates of `delta_time` seconds each
    ///
    /// Stops at the first failing frame.
    pub fn run_frames(&mut self, frames: usize, delta_time: f32) -> Result<()> {
        for _ in 0..frames {
            self.update(delta_time)?;
        }
        debug!("Ran {} frames, {} in total", frames, self.frames);
        Ok(())
    }

    /// Updates completed so far
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AnimationController {
        &mut self.controller
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<S, A, I, R> Simulation for SimulationHost<S, A, I, R>
where
    S: SkeletonSource,
    A: AnimationSource,
    I: InputSource,
    R: Renderer,
{
    fn init(&mut self) -> Result<()> {
        self.frames = 0;
        self.controller.init(&self.skeleton, &self.animations)?;
        info!("Simulation ready");
        Ok(())
    }

    fn update(&mut self, delta_time: f32) -> Result<()> {
        self.controller
            .update(delta_time, &mut self.input, &mut self.renderer)?;
        self.frames += 1;
        Ok(())
    }
}
