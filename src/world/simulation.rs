use tracing::info;

use crate::config::SimSettings;
use super::collision;
use super::controls::ControlState;
use super::integrator;
use super::scene::World;

/// Borrow two distinct objects from the same slice mutably.
fn pair_mut<T>(slice: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (low, high) = slice.split_at_mut(j);
        (&mut low[i], &mut high[0])
    } else {
        let (low, high) = slice.split_at_mut(i);
        (&mut high[0], &mut low[j])
    }
}

/// The per-frame state advancement over a [`World`]. Owns the control
/// state; the settings are fixed for the run.
pub struct Simulation {
    pub world: World,
    pub controls: ControlState,
    settings: SimSettings,
    frame: u64,
}

impl Simulation {
    pub fn new(world: World, settings: SimSettings) -> Self {
        let controls = ControlState::new(world.dozers.len());
        Self {
            world,
            controls,
            settings,
            frame: 0,
        }
    }

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advance the simulation by one frame: drive the dozers from their
    /// control flags, run the collision passes (dozer-ball, ball-ball,
    /// ball-goal, boundary), integrate the balls, then sweep scored balls
    /// out of the active list.
    pub fn step(&mut self) {
        // dozer control mapping and motion
        for (slot, &dozer_index) in self.world.dozers.iter().enumerate() {
            integrator::drive_dozer(
                &mut self.world.objects[dozer_index].transform,
                &mut self.controls.dozers[slot],
                &self.settings,
            );
        }

        // every dozer against every ball
        for &ball_index in &self.world.balls {
            if self.world.objects[ball_index].retired {
                continue;
            }
            for &dozer_index in &self.world.dozers {
                let (dozer, ball) = pair_mut(&mut self.world.objects, dozer_index, ball_index);
                collision::dozer_collision(&dozer.transform, &mut ball.transform, &self.settings);
            }
        }

        // all ordered ball pairs; the self-pair is skipped
        for i in 0..self.world.balls.len() {
            for j in 0..self.world.balls.len() {
                if i == j {
                    continue;
                }
                let (first_index, second_index) = (self.world.balls[i], self.world.balls[j]);
                if self.world.objects[first_index].retired
                    || self.world.objects[second_index].retired
                {
                    continue;
                }
                let (first, second) = pair_mut(&mut self.world.objects, first_index, second_index);
                collision::sphere_collision(
                    &mut first.transform,
                    &mut second.transform,
                    &self.settings,
                );
            }
        }

        // goal triggers: mark now, sweep after all passes finish
        for &ball_index in &self.world.balls {
            if self.world.objects[ball_index].retired {
                continue;
            }
            for &goal_index in &self.world.goals {
                if collision::goal_collision(
                    &self.world.objects[goal_index].transform,
                    &self.world.objects[ball_index].transform,
                    &self.settings,
                ) {
                    self.world.objects[ball_index].retired = true;
                    info!(
                        "{} scored in {}",
                        self.world.objects[ball_index].name, self.world.objects[goal_index].name
                    );
                    break;
                }
            }
        }

        // boundary containment for everything that moves
        for &index in self.world.dozers.iter().chain(self.world.balls.iter()) {
            if self.world.objects[index].retired {
                continue;
            }
            collision::border_collision(&mut self.world.objects[index].transform, &self.settings);
        }

        // integrate the balls
        for &ball_index in &self.world.balls {
            if self.world.objects[ball_index].retired {
                continue;
            }
            integrator::step_ball(&mut self.world.objects[ball_index].transform, &self.settings);
        }

        self.world.sweep_retired();
        self.frame += 1;
    }
}
