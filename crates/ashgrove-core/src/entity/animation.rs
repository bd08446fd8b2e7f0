//! Locomotion and attack animation state.
//!
//! [`Animation`] only stores and indexes into frame arrays handed to it by the
//! host's frame provider. It never loads images itself.
//!
//! # Direction precedence
//!
//! Direction is derived from velocity with the vertical axis checked first:
//! `vy > 0` faces down, `vy < 0` faces up, and only a purely horizontal
//! velocity faces left or right.
//!
//! # Attacks
//!
//! [`Animation::start_attack`] latches the current direction's frame slice.
//! While the attack runs, velocity changes neither the direction nor the
//! locomotion frame. The sequence plays once and then hands control back to
//! locomotion.

use tilegrid::Rect;

use super::components::Velocity;
use crate::assets::ImageId;
use crate::error::ConfigError;

/// Facing direction. The discriminant indexes per-direction frame arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Towards the bottom of the screen
    #[default]
    Down = 0,
    /// Towards the left edge
    Left = 1,
    /// Towards the right edge
    Right = 2,
    /// Towards the top of the screen
    Up = 3,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Self; 4] = [Self::Down, Self::Left, Self::Right, Self::Up];

    /// Index into a `[_; 4]` per-direction array.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Facing implied by a velocity, or `None` when at rest.
    #[must_use]
    pub const fn from_velocity(velocity: Velocity) -> Option<Self> {
        if velocity.y > 0 {
            Some(Self::Down)
        } else if velocity.y < 0 {
            Some(Self::Up)
        } else if velocity.x < 0 {
            Some(Self::Left)
        } else if velocity.x > 0 {
            Some(Self::Right)
        } else {
            None
        }
    }
}

/// A running attack sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackState {
    direction: Direction,
    frames: Vec<ImageId>,
    hitboxes: Vec<Vec<Rect>>,
    frame: usize,
    timer: f32,
    frame_duration: f32,
    total_frames: usize,
}

impl AttackState {
    /// Direction latched when the attack started.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Current attack frame.
    #[must_use]
    pub const fn frame(&self) -> usize {
        self.frame
    }

    /// Number of frames the sequence plays.
    #[must_use]
    pub const fn total_frames(&self) -> usize {
        self.total_frames
    }

    /// Image for the current attack frame.
    #[must_use]
    pub fn image(&self) -> Option<ImageId> {
        self.frames.get(self.frame).copied()
    }

    /// Hitboxes declared for the current attack frame, relative to the
    /// entity position.
    #[must_use]
    pub fn hitboxes(&self) -> &[Rect] {
        self.hitboxes.get(self.frame).map_or(&[], Vec::as_slice)
    }
}

/// Per-entity animation state.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    walk_frames: [Vec<ImageId>; 4],
    frame_period: f32,
    direction: Direction,
    frame: usize,
    timer: f32,
    attack: Option<AttackState>,
}

impl Animation {
    /// Creates a facing-down animation from per-direction walk cycles.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFrameRate`] unless `fps` is positive.
    pub fn new(walk_frames: [Vec<ImageId>; 4], fps: f32) -> Result<Self, ConfigError> {
        if !(fps.is_finite() && fps > 0.0) {
            return Err(ConfigError::InvalidFrameRate(fps));
        }
        Ok(Self {
            walk_frames,
            frame_period: 1.0 / fps,
            direction: Direction::Down,
            frame: 0,
            timer: 0.0,
            attack: None,
        })
    }

    /// Current facing.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Current locomotion frame.
    #[must_use]
    pub const fn frame(&self) -> usize {
        self.frame
    }

    /// Returns true while an attack sequence is playing.
    #[must_use]
    pub const fn is_attacking(&self) -> bool {
        self.attack.is_some()
    }

    /// The running attack, if any.
    #[must_use]
    pub const fn attack(&self) -> Option<&AttackState> {
        self.attack.as_ref()
    }

    /// Advances the walk cycle from this tick's velocity.
    ///
    /// Does nothing while an attack is active.
    pub fn update_locomotion(&mut self, velocity: Velocity, dt: f32) {
        if self.attack.is_some() {
            return;
        }
        let Some(direction) = Direction::from_velocity(velocity) else {
            self.frame = 0;
            self.timer = 0.0;
            return;
        };
        if direction != self.direction {
            self.direction = direction;
            self.frame = 0;
            self.timer = 0.0;
        }
        let cycle = self.walk_frames[direction.index()].len().max(1);
        self.timer += dt;
        while self.timer >= self.frame_period {
            self.timer -= self.frame_period;
            self.frame = (self.frame + 1) % cycle;
        }
    }

    /// Turns toward `velocity` without advancing the walk cycle.
    ///
    /// A zero velocity keeps the current facing. Ignored while attacking.
    pub fn face(&mut self, velocity: Velocity) {
        if self.attack.is_some() {
            return;
        }
        if let Some(direction) = Direction::from_velocity(velocity) {
            if direction != self.direction {
                self.direction = direction;
                self.frame = 0;
                self.timer = 0.0;
            }
        }
    }

    /// Starts an attack facing the current direction.
    ///
    /// `frames` and `hitboxes` are indexed by [`Direction::index`]. The
    /// sequence plays `total_frames` frames, capped at the slice length.
    /// Returns false and leaves no attack active when the slice for the
    /// current direction is empty.
    pub fn start_attack(
        &mut self,
        frames: &[Vec<ImageId>; 4],
        hitboxes: &[Vec<Vec<Rect>>; 4],
        frame_duration: f32,
        total_frames: usize,
    ) -> bool {
        let slot = self.direction.index();
        let slice = &frames[slot];
        let total_frames = total_frames.min(slice.len());
        if total_frames == 0 {
            self.attack = None;
            return false;
        }
        self.attack = Some(AttackState {
            direction: self.direction,
            frames: slice.clone(),
            hitboxes: hitboxes[slot].clone(),
            frame: 0,
            timer: 0.0,
            frame_duration: frame_duration.max(0.0),
            total_frames,
        });
        true
    }

    /// Advances the attack timer. Returns true while the attack is still active.
    pub fn advance_attack(&mut self, dt: f32) -> bool {
        let Some(attack) = self.attack.as_mut() else {
            return false;
        };
        attack.timer += dt;
        if attack.timer >= attack.frame_duration {
            attack.timer = 0.0;
            if attack.frame + 1 >= attack.total_frames {
                self.attack = None;
                return false;
            }
            attack.frame += 1;
        }
        true
    }

    /// Image to draw this tick: the attack frame if attacking, else the walk frame.
    #[must_use]
    pub fn current_image(&self) -> Option<ImageId> {
        match &self.attack {
            Some(attack) => attack.image(),
            None => self.walk_frames[self.direction.index()]
                .get(self.frame)
                .copied(),
        }
    }

    /// Hitboxes of the current attack frame, empty outside attacks.
    ///
    /// Offsets are relative to the entity's position. Combat resolves hits by
    /// range; hosts read these for frame-accurate hit checks and debug overlays.
    #[must_use]
    pub fn active_hitboxes(&self) -> &[Rect] {
        self.attack.as_ref().map_or(&[], AttackState::hitboxes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(start: u32, count: u32) -> Vec<ImageId> {
        (start..start + count).map(ImageId::new).collect()
    }

    fn walker() -> Animation {
        Animation::new(
            [images(0, 3), images(10, 3), images(20, 3), images(30, 3)],
            10.0,
        )
        .unwrap()
    }

    fn attack_set(per_direction: [u32; 4]) -> ([Vec<ImageId>; 4], [Vec<Vec<Rect>>; 4]) {
        let frames = per_direction.map(|n| images(100, n));
        let hitboxes =
            per_direction.map(|n| (0..n).map(|i| vec![Rect::new(i as i32, 0, 4, 4)]).collect());
        (frames, hitboxes)
    }

    #[test]
    fn rejects_non_positive_fps() {
        assert_eq!(
            Animation::new(Default::default(), 0.0),
            Err(ConfigError::InvalidFrameRate(0.0))
        );
    }

    mod locomotion_tests {
        use super::*;

        #[test]
        fn vertical_axis_takes_precedence() {
            assert_eq!(
                Direction::from_velocity(Velocity::new(5, 1)),
                Some(Direction::Down)
            );
            assert_eq!(
                Direction::from_velocity(Velocity::new(-5, -1)),
                Some(Direction::Up)
            );
            assert_eq!(
                Direction::from_velocity(Velocity::new(-5, 0)),
                Some(Direction::Left)
            );
            assert_eq!(Direction::from_velocity(Velocity::ZERO), None);
        }

        #[test]
        fn frames_advance_by_time_not_ticks() {
            let mut anim = walker();
            let right = Velocity::new(2, 0);
            anim.update_locomotion(right, 0.05);
            assert_eq!(anim.frame(), 0);
            anim.update_locomotion(right, 0.05);
            assert_eq!(anim.frame(), 1);
            anim.update_locomotion(right, 0.2);
            assert_eq!(anim.frame(), 0);
            assert_eq!(anim.current_image(), Some(ImageId::new(20)));
        }

        #[test]
        fn direction_change_resets_frame() {
            let mut anim = walker();
            anim.update_locomotion(Velocity::new(2, 0), 0.15);
            assert_eq!(anim.frame(), 1);
            anim.update_locomotion(Velocity::new(0, -2), 0.05);
            assert_eq!(anim.direction(), Direction::Up);
            assert_eq!(anim.frame(), 0);
        }

        #[test]
        fn standing_still_holds_first_frame() {
            let mut anim = walker();
            anim.update_locomotion(Velocity::new(0, 3), 0.25);
            assert_ne!(anim.frame(), 0);
            anim.update_locomotion(Velocity::ZERO, 0.25);
            assert_eq!(anim.frame(), 0);
            assert_eq!(anim.direction(), Direction::Down);
        }
    }

    mod attack_tests {
        use super::*;

        #[test]
        fn attack_latches_direction_and_plays_once() {
            let mut anim = walker();
            anim.update_locomotion(Velocity::new(-1, 0), 0.01);
            let (frames, hitboxes) = attack_set([3, 3, 3, 3]);
            assert!(anim.start_attack(&frames, &hitboxes, 0.1, 3));

            anim.update_locomotion(Velocity::new(0, 4), 0.5);
            assert_eq!(anim.direction(), Direction::Left);
            assert_eq!(anim.attack().map(AttackState::direction), Some(Direction::Left));

            assert!(anim.advance_attack(0.1));
            assert_eq!(anim.attack().map(AttackState::frame), Some(1));
            assert_eq!(anim.active_hitboxes(), &[Rect::new(1, 0, 4, 4)]);
            assert!(anim.advance_attack(0.1));
            assert!(!anim.advance_attack(0.1));
            assert!(!anim.is_attacking());
            assert!(anim.active_hitboxes().is_empty());
        }

        #[test]
        fn facing_turns_without_stepping_and_waits_for_attacks() {
            let mut anim = walker();
            anim.face(Velocity::new(3, 0));
            assert_eq!(anim.direction(), Direction::Right);
            assert_eq!(anim.frame(), 0);
            anim.face(Velocity::ZERO);
            assert_eq!(anim.direction(), Direction::Right);

            let (frames, hitboxes) = attack_set([3, 3, 3, 3]);
            assert!(anim.start_attack(&frames, &hitboxes, 0.1, 3));
            anim.face(Velocity::new(0, -3));
            assert_eq!(anim.direction(), Direction::Right);
        }

        #[test]
        fn empty_slice_aborts_attack() {
            let mut anim = walker();
            anim.update_locomotion(Velocity::new(0, -1), 0.01);
            let (frames, hitboxes) = attack_set([3, 3, 3, 0]);
            assert!(!anim.start_attack(&frames, &hitboxes, 0.1, 3));
            assert!(!anim.is_attacking());
            assert_eq!(anim.current_image(), Some(ImageId::new(30)));
        }

        #[test]
        fn total_frames_is_capped_at_slice_length() {
            let mut anim = walker();
            let (frames, hitboxes) = attack_set([2, 2, 2, 2]);
            assert!(anim.start_attack(&frames, &hitboxes, 0.0, 8));
            assert_eq!(anim.attack().map(AttackState::total_frames), Some(2));
            assert!(anim.advance_attack(0.0));
            assert!(!anim.advance_attack(0.0));
        }
    }
}
