//! Built-in attack patterns
//!
//! A small data-driven pattern library implementing the runner contract. Each
//! phase sways the enemy side to side and fires volleys (rings or fans) of
//! straight-flying bullets. Patterns are plain data so they can be shipped as
//! JSON next to the tuning file.

use std::f32::consts::TAU;
use std::path::Path;

use glam::Vec2;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::pattern::{FiredBullet, PatternRunner, PatternSource, RunnerHost};
use crate::error::{ConfigError, PatternError};
use crate::{aim_angle, polar_to_cartesian};

/// One phase of the encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrageSpec {
    pub name: String,
    /// Horizontal sway of the enemy around where the phase started (px)
    pub sway_amplitude: f32,
    /// Ticks per full sway cycle
    pub sway_period: u32,
    /// Ticks between volleys
    pub fire_interval: u32,
    pub bullets_per_volley: u32,
    /// Angular width of a volley; `>= TAU` means an evenly spaced ring
    pub spread: f32,
    /// Pixels per tick
    pub bullet_speed: f32,
    /// Centre each volley on the player
    pub aimed: bool,
    /// Rotation added after every volley (radians)
    pub spin: f32,
    /// Random offset range applied to each volley (radians)
    pub jitter: f32,
    /// Ticks before a bullet's script ends
    pub bullet_ttl: u32,
}

impl Default for BarrageSpec {
    fn default() -> Self {
        Self {
            name: "ring".to_string(),
            sway_amplitude: 80.0,
            sway_period: 240,
            fire_interval: 20,
            bullets_per_volley: 16,
            spread: TAU,
            bullet_speed: 2.5,
            aimed: false,
            spin: 0.15,
            jitter: 0.0,
            bullet_ttl: 600,
        }
    }
}

impl BarrageSpec {
    /// Aimed fan that tracks the player
    pub fn aimed_fan() -> Self {
        Self {
            name: "aimed-fan".to_string(),
            sway_amplitude: 120.0,
            sway_period: 300,
            fire_interval: 12,
            bullets_per_volley: 5,
            spread: 0.8,
            bullet_speed: 4.0,
            aimed: true,
            spin: 0.0,
            jitter: 0.1,
            bullet_ttl: 400,
        }
    }

    fn validate(&self, index: usize) -> Result<(), PatternError> {
        let invalid = |reason: &str| {
            Err(PatternError::Invalid {
                index,
                reason: reason.to_string(),
            })
        };

        if self.bullets_per_volley == 0 {
            return invalid("bullets_per_volley must be at least 1");
        }
        if self.fire_interval == 0 || self.sway_period == 0 {
            return invalid("fire_interval and sway_period must be non-zero");
        }
        let finite = [
            self.sway_amplitude,
            self.spread,
            self.bullet_speed,
            self.spin,
            self.jitter,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return invalid("numeric fields must be finite");
        }
        if self.bullet_speed <= 0.0 {
            return invalid("bullet_speed must be positive");
        }
        Ok(())
    }

    /// Direction of bullet `i` in a volley centred on `base`
    fn volley_angle(&self, base: f32, i: u32) -> f32 {
        let n = self.bullets_per_volley;
        if self.spread >= TAU {
            base + TAU * i as f32 / n as f32
        } else if n == 1 {
            base
        } else {
            base - self.spread / 2.0 + self.spread * i as f32 / (n - 1) as f32
        }
    }
}

/// The pattern sequence for one encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarrageSet {
    pub patterns: Vec<BarrageSpec>,
}

impl Default for BarrageSet {
    fn default() -> Self {
        Self {
            patterns: vec![BarrageSpec::default(), BarrageSpec::aimed_fan()],
        }
    }
}

impl BarrageSet {
    pub fn new(patterns: Vec<BarrageSpec>) -> Self {
        Self { patterns }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a pattern set from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let set = Self::from_json(&std::fs::read_to_string(path)?)?;
        if set.patterns.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "{} holds no patterns",
                path.display()
            )));
        }
        log::info!("Loaded {} patterns from {}", set.patterns.len(), path.display());
        Ok(set)
    }
}

impl PatternSource for BarrageSet {
    fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    fn bind(
        &self,
        index: usize,
        host: &dyn RunnerHost,
    ) -> Result<Box<dyn PatternRunner>, PatternError> {
        let spec = self.patterns.get(index).ok_or(PatternError::OutOfRange {
            index,
            count: self.patterns.len(),
        })?;
        spec.validate(index)?;

        let origin = host.shooter_position();
        Ok(Box::new(EnemyDriver {
            spec: spec.clone(),
            origin,
            pos: origin,
            ticks: 0,
            volleys: 0,
        }))
    }
}

/// Runner that moves the enemy and fires volleys
#[derive(Debug, Clone)]
pub struct EnemyDriver {
    spec: BarrageSpec,
    origin: Vec2,
    pos: Vec2,
    ticks: u32,
    volleys: u32,
}

impl PatternRunner for EnemyDriver {
    fn advance(
        &mut self,
        host: &dyn RunnerHost,
        rng: &mut dyn RngCore,
        fired: &mut Vec<FiredBullet>,
    ) -> Result<(), PatternError> {
        self.ticks += 1;

        let phase = TAU * (self.ticks % self.spec.sway_period) as f32 / self.spec.sway_period as f32;
        self.pos = self.origin + Vec2::new(self.spec.sway_amplitude * phase.sin(), 0.0);
        if !self.pos.is_finite() {
            return Err(PatternError::Fault(format!(
                "{}: enemy position diverged at tick {}",
                self.spec.name, self.ticks
            )));
        }

        if !self.ticks.is_multiple_of(self.spec.fire_interval) {
            return Ok(());
        }

        let muzzle = host.shooter_position();
        let mut base = self.spec.spin * self.volleys as f32;
        if self.spec.aimed {
            base += aim_angle(muzzle, host.target_position());
        }
        if self.spec.jitter > 0.0 {
            base += (rng.random::<f32>() - 0.5) * self.spec.jitter;
        }

        for i in 0..self.spec.bullets_per_volley {
            let vel = polar_to_cartesian(self.spec.bullet_speed, self.spec.volley_angle(base, i));
            fired.push(FiredBullet {
                position: muzzle,
                runner: Box::new(Shot {
                    pos: muzzle,
                    vel,
                    ticks: 0,
                    ttl: self.spec.bullet_ttl,
                }),
            });
        }
        self.volleys += 1;

        Ok(())
    }

    fn position(&self) -> Vec2 {
        self.pos
    }

    fn vanished(&self) -> bool {
        false
    }
}

/// Straight-flying bullet script
#[derive(Debug, Clone)]
pub struct Shot {
    pos: Vec2,
    vel: Vec2,
    ticks: u32,
    ttl: u32,
}

impl PatternRunner for Shot {
    fn advance(
        &mut self,
        _host: &dyn RunnerHost,
        _rng: &mut dyn RngCore,
        _fired: &mut Vec<FiredBullet>,
    ) -> Result<(), PatternError> {
        self.pos += self.vel;
        self.ticks += 1;
        Ok(())
    }

    fn position(&self) -> Vec2 {
        self.pos
    }

    fn vanished(&self) -> bool {
        self.ticks >= self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::pattern::Aim;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn run_ticks(
        runner: &mut dyn PatternRunner,
        shooter: Vec2,
        target: Vec2,
        ticks: u32,
    ) -> Vec<FiredBullet> {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut fired = Vec::new();
        for _ in 0..ticks {
            let aim = Aim {
                shooter: &shooter,
                target: &target,
            };
            runner.advance(&aim, &mut rng, &mut fired).unwrap();
        }
        fired
    }

    #[test]
    fn test_ring_fires_on_interval() {
        let set = BarrageSet::default();
        let shooter = Vec2::new(320.0, 96.0);
        let target = Vec2::new(320.0, 384.0);
        let aim = Aim {
            shooter: &shooter,
            target: &target,
        };
        let mut runner = set.bind(0, &aim).unwrap();

        let spec = &set.patterns[0];
        let fired = run_ticks(runner.as_mut(), shooter, target, spec.fire_interval - 1);
        assert!(fired.is_empty());

        let fired = run_ticks(runner.as_mut(), shooter, target, 1);
        assert_eq!(fired.len(), spec.bullets_per_volley as usize);
        assert!(fired.iter().all(|b| b.position == shooter));
    }

    #[test]
    fn test_aimed_fan_heads_for_target() {
        let spec = BarrageSpec {
            jitter: 0.0,
            bullets_per_volley: 1,
            fire_interval: 1,
            ..BarrageSpec::aimed_fan()
        };
        let set = BarrageSet::new(vec![spec]);
        let shooter = Vec2::new(100.0, 100.0);
        let target = Vec2::new(100.0, 300.0);
        let aim = Aim {
            shooter: &shooter,
            target: &target,
        };
        let mut runner = set.bind(0, &aim).unwrap();
        let mut fired = run_ticks(runner.as_mut(), shooter, target, 1);
        let mut bullet = fired.pop().unwrap();

        let mut rng = Pcg32::seed_from_u64(0);
        let mut sink = Vec::new();
        bullet.runner.advance(&aim, &mut rng, &mut sink).unwrap();
        let step = bullet.runner.position() - shooter;
        assert!(step.x.abs() < 1e-4);
        assert!(step.y > 0.0);
    }

    #[test]
    fn test_shot_vanishes_after_ttl() {
        let mut shot = Shot {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, 0.0),
            ticks: 0,
            ttl: 3,
        };
        let fired = run_ticks(&mut shot, Vec2::ZERO, Vec2::ZERO, 2);
        assert!(fired.is_empty());
        assert!(!shot.vanished());
        run_ticks(&mut shot, Vec2::ZERO, Vec2::ZERO, 1);
        assert!(shot.vanished());
        assert_eq!(shot.position(), Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_bind_rejects_invalid_spec() {
        let set = BarrageSet::new(vec![BarrageSpec {
            bullets_per_volley: 0,
            ..Default::default()
        }]);
        let p = Vec2::ZERO;
        let aim = Aim {
            shooter: &p,
            target: &p,
        };
        assert!(matches!(
            set.bind(0, &aim).unwrap_err(),
            PatternError::Invalid { index: 0, .. }
        ));
        assert!(matches!(
            set.bind(5, &aim).unwrap_err(),
            PatternError::OutOfRange { index: 5, count: 1 }
        ));
    }

    #[test]
    fn test_volley_angles() {
        let fan = BarrageSpec {
            spread: 1.0,
            bullets_per_volley: 3,
            ..Default::default()
        };
        assert!((fan.volley_angle(0.0, 0) + 0.5).abs() < 1e-6);
        assert!(fan.volley_angle(0.0, 1).abs() < 1e-6);
        assert!((fan.volley_angle(0.0, 2) - 0.5).abs() < 1e-6);

        let ring = BarrageSpec {
            bullets_per_volley: 4,
            ..Default::default()
        };
        assert!((ring.volley_angle(0.0, 1) - TAU / 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_jitter_is_seed_deterministic() {
        let set = BarrageSet::default();
        let shooter = Vec2::new(320.0, 96.0);
        let target = Vec2::new(200.0, 384.0);
        let aim = Aim {
            shooter: &shooter,
            target: &target,
        };
        let positions = |seed: u64| {
            let mut runner = set.bind(1, &aim).unwrap();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut fired = Vec::new();
            for _ in 0..40 {
                runner.advance(&aim, &mut rng, &mut fired).unwrap();
            }
            for b in fired.iter_mut() {
                b.runner.advance(&aim, &mut rng, &mut Vec::new()).unwrap();
            }
            fired.iter().map(|b| b.runner.position()).collect::<Vec<_>>()
        };
        assert_eq!(positions(3), positions(3));
        assert_ne!(positions(3), positions(4));
    }

    #[test]
    fn test_pattern_set_from_json() {
        let json = r#"{ "patterns": [ { "name": "slow", "bullet_speed": 1.0 } ] }"#;
        let set = BarrageSet::from_json(json).unwrap();
        assert_eq!(set.pattern_count(), 1);
        assert_eq!(set.patterns[0].name, "slow");
        assert_eq!(set.patterns[0].fire_interval, BarrageSpec::default().fire_interval);
    }
}
