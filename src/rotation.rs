//! # Rotation State
//!
//! The scene spins its mesh about the Y axis. `RotationState` owns the accumulated angle and
//! decides how much it grows each frame.
//!
//! Two policies are available through [`RotationMode`]:
//!
//! - [`RotationMode::ElapsedTime`] advances by `speed * delta_time`, so the mesh turns at the same
//!   rate whatever the display manages to sustain.
//! - [`RotationMode::FixedStep`] advances by `speed / target_fps` every frame and ignores the
//!   clock. The mesh only turns at `speed` when the display actually hits `target_fps`.
//!
//! The angle is never wrapped; it is only ever fed to `sin` and `cos`.

/// How the rotation angle advances from one frame to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum RotationMode {
    /// Advance by `speed / target_fps` per frame, regardless of elapsed time.
    FixedStep {
        /// The refresh rate the step is tuned for. Zero is treated as one.
        target_fps: u32,
    },

    /// Advance by `speed * delta_time`.
    #[default]
    ElapsedTime,
}

/// The accumulated rotation angle of the scene's mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    angle: f32,

    /// Angular speed in radians per second.
    pub speed: f32,

    /// The advance policy.
    pub mode: RotationMode,
}

impl RotationState {
    /// Creates a state at angle zero.
    pub fn new(speed: f32, mode: RotationMode) -> Self {
        Self {
            angle: 0.0,
            speed,
            mode,
        }
    }

    /// The current angle in radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Advances the angle for one frame and returns the new value.
    ///
    /// `delta_time` is the wall-clock time since the previous frame, in seconds. It is ignored in
    /// [`RotationMode::FixedStep`].
    pub fn advance(&mut self, delta_time: f32) -> f32 {
        self.angle += self.step(delta_time);
        self.angle
    }

    fn step(&self, delta_time: f32) -> f32 {
        match self.mode {
            RotationMode::FixedStep { target_fps } => self.speed / target_fps.max(1) as f32,
            RotationMode::ElapsedTime => self.speed * delta_time,
        }
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new(0.5, RotationMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(RotationState::default().angle(), 0.0);
    }

    #[test]
    fn fixed_step_ignores_elapsed_time() {
        let mut state = RotationState::new(0.5, RotationMode::FixedStep { target_fps: 60 });

        state.advance(0.0);
        state.advance(1.0);
        state.advance(0.25);

        assert!((state.angle() - 3.0 * 0.5 / 60.0).abs() < 1e-7);
    }

    #[test]
    fn fixed_step_matches_accumulated_increments_exactly() {
        let mut state = RotationState::new(0.5, RotationMode::FixedStep { target_fps: 60 });
        let mut expected = 0.0_f32;
        for _ in 0..600 {
            expected += 0.5 / 60.0;
            state.advance(1.0 / 30.0);
        }
        assert_eq!(state.angle(), expected);
    }

    #[test]
    fn fixed_step_with_zero_fps_stays_finite() {
        let mut state = RotationState::new(0.5, RotationMode::FixedStep { target_fps: 0 });
        assert_eq!(state.advance(0.016), 0.5);
    }

    #[test]
    fn elapsed_time_scales_with_delta() {
        let mut state = RotationState::new(0.5, RotationMode::ElapsedTime);

        state.advance(0.5);
        assert!((state.angle() - 0.25).abs() < 1e-7);

        // Two short frames cover the same angle as one long one.
        state.advance(0.25);
        state.advance(0.25);
        assert!((state.angle() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn angle_is_not_wrapped() {
        let mut state = RotationState::new(10.0, RotationMode::ElapsedTime);
        state.advance(1.0);
        assert!(state.angle() > std::f32::consts::TAU);
    }
}
