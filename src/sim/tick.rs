//! Per-frame simulation step
//!
//! One call runs the whole ordered pass: movement, collisions, encounter timer,
//! cleanup, then the tick's discrete actions. Nothing here blocks or reads the
//! clock; the same sequence of deltas and inputs always yields the same state.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;

use super::collision::{planet_in_scan_range, projectile_target, touches_player};
use super::state::{GamePhase, GameState, MAX_PARTICLES, Owner, Particle, Projectile};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::hud::{EventSink, HudEvent, PhotoGate};
use crate::input::ActionSet;
use crate::settings::Settings;

/// What a tick did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Session continues
    Continue,
    /// Hull hit zero during this tick
    GameOver,
    /// Session had already ended; nothing changed
    Ended,
}

/// Advance the session by `delta`
pub fn tick(
    state: &mut GameState,
    input: &ActionSet,
    delta: Duration,
    settings: &Settings,
    sink: &mut dyn EventSink,
) -> TickOutcome {
    if state.phase == GamePhase::GameOver {
        return TickOutcome::Ended;
    }
    let mut sink = PhotoGate::new(sink, state.photo_mode);
    let dt = delta.as_secs_f32();

    state.elapsed = state.elapsed.saturating_add(delta);
    state
        .director
        .set_period(Duration::from_millis(settings.encounter_period_ms));

    // Timers
    state.player.decay_shield(delta);
    state.scan_pulse = state.scan_pulse.saturating_sub(delta);
    update_dust(state, dt, settings.particle_density);

    // Movement
    state.player.vel = input.movement() * PLAYER_SPEED;
    state.player.pos = state.bounds.clamp(state.player.pos + state.player.vel * dt);
    for projectile in &mut state.projectiles {
        projectile.pos += projectile.vel * dt;
    }
    for enemy in &mut state.enemies {
        enemy.pos += enemy.vel * dt;
    }

    // Collisions
    resolve_projectile_hits(state, &mut sink);
    if resolve_player_contact(state, &mut sink) {
        return TickOutcome::GameOver;
    }

    // Encounters
    let weights = state.sector.encounter_weights;
    state
        .director
        .tick(delta, Some(&weights), &mut state.enemies);

    // Cleanup
    state
        .projectiles
        .retain(|p| p.pos.y >= -OFFSCREEN_MARGIN);
    let floor = state.bounds.height + OFFSCREEN_MARGIN;
    state.enemies.retain(|e| e.pos.y <= floor);

    // Actions
    if input.fire {
        fire(state, &mut sink);
    }
    if input.scan {
        scan(state, &mut sink);
    }
    if input.shield && state.player.raise_shield() {
        sink.cue(SoundEffect::ShieldUp);
    }
    if input.toggle_photo_mode {
        toggle_photo_mode(state, &mut sink);
    }

    TickOutcome::Continue
}

/// Shots hitting enemies: each shot damages at most one enemy and is spent
fn resolve_projectile_hits(state: &mut GameState, sink: &mut dyn EventSink) {
    if state.projectiles.is_empty() || state.enemies.is_empty() {
        return;
    }

    let mut spent = vec![false; state.projectiles.len()];
    let mut kills = 0u32;
    for (i, projectile) in state.projectiles.iter().enumerate() {
        if let Some(enemy) = projectile_target(projectile.pos, state.enemies.as_mut_slice()) {
            spent[i] = true;
            enemy.hp = enemy.hp.saturating_sub(1);
            if !enemy.is_alive() {
                kills += 1;
            }
        }
    }

    let mut index = 0;
    state.projectiles.retain(|_| {
        let keep = !spent[index];
        index += 1;
        keep
    });
    state.enemies.retain(|e| e.is_alive());

    for _ in 0..kills {
        award_discovery(state, sink);
    }
}

/// Enemies ramming the ship. Returns true when this ends the session.
fn resolve_player_contact(state: &mut GameState, sink: &mut dyn EventSink) -> bool {
    let player_pos = state.player.pos;
    let mut contacts = 0u32;
    state.enemies.retain(|e| {
        let hit = touches_player(player_pos, e);
        if hit {
            contacts += 1;
        }
        !hit
    });

    if state.player.shielded {
        return false;
    }
    for _ in 0..contacts {
        let hull = state.player.take_hit();
        sink.hud(HudEvent::Hull(hull));
        sink.cue(SoundEffect::Hit);
        if hull == 0 {
            state.phase = GamePhase::GameOver;
            sink.cue(SoundEffect::GameOver);
            log::info!(
                "Game over after {:.1}s with {} discoveries",
                state.elapsed.as_secs_f32(),
                state.player.discoveries
            );
            return true;
        }
    }
    false
}

/// +1 discovery; every fifth one jumps to the next sector
fn award_discovery(state: &mut GameState, sink: &mut dyn EventSink) {
    state.player.discoveries += 1;
    let discoveries = state.player.discoveries;
    sink.hud(HudEvent::Discoveries(discoveries));
    sink.cue(SoundEffect::Discovery);

    if discoveries % DISCOVERIES_PER_JUMP == 0 {
        state.jump();
        sink.hud(HudEvent::Sector(state.sector.name()));
        sink.cue(SoundEffect::Jump);
    }
}

fn fire(state: &mut GameState, sink: &mut dyn EventSink) {
    let projectile = Projectile {
        pos: state.player.pos,
        vel: Vec2::new(0.0, -PROJECTILE_SPEED),
        owner: Owner::Player,
    };
    if state.projectiles.try_push(projectile) {
        sink.cue(SoundEffect::Fire);
    } else {
        log::debug!(
            "Projectile pool exhausted ({}); fire dropped",
            state.projectiles.capacity()
        );
    }
}

/// Discover the first unscanned planet in range; a miss changes nothing
fn scan(state: &mut GameState, sink: &mut dyn EventSink) {
    let Some(index) =
        planet_in_scan_range(state.player.pos, &state.sector.planets, &state.scanned)
    else {
        return;
    };
    state.scanned.push(index);
    state.scan_pulse = Duration::from_millis(SCAN_PULSE_MS);
    award_discovery(state, sink);
}

fn toggle_photo_mode(state: &mut GameState, sink: &mut PhotoGate<'_>) {
    state.photo_mode = !state.photo_mode;
    sink.set_hidden(state.photo_mode);
    sink.hud(HudEvent::PhotoModeOn(state.photo_mode));
    log::debug!("Photo mode {}", if state.photo_mode { "on" } else { "off" });

    if !state.photo_mode {
        // The display missed everything while hidden
        sink.hud(HudEvent::Discoveries(state.player.discoveries));
        sink.hud(HudEvent::Hull(state.player.hull));
        sink.hud(HudEvent::Sector(state.sector.name()));
    }
}

/// Drift existing dust and emit new dust at the configured density
fn update_dust(state: &mut GameState, dt: f32, density: f32) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.life -= dt * 0.5;
    }
    let floor = state.bounds.height;
    state.particles.retain(|p| p.life > 0.0 && p.pos.y <= floor);

    state.dust_carry =
        (state.dust_carry + density * DUST_PER_SECOND * dt).min(MAX_PARTICLES as f32);
    while state.dust_carry >= 1.0 {
        state.dust_carry -= 1.0;
        if state.particles.len() >= MAX_PARTICLES {
            continue;
        }
        let x = state.dust_rng.random::<f32>() * state.bounds.width;
        let speed = state.dust_rng.random_range(20.0..80.0);
        let size = state.dust_rng.random_range(0.5..2.0);
        state.particles.push(Particle {
            pos: Vec2::new(x, 0.0),
            vel: Vec2::new(0.0, speed),
            life: 1.0,
            size,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::EventLog;
    use crate::sim::sector::Planet;
    use crate::sim::state::{Bounds, Enemy, EnemyKind};
    use proptest::prelude::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn new_state() -> GameState {
        GameState::new(1000, &Settings::default(), Bounds::default())
    }

    fn idle() -> ActionSet {
        ActionSet::default()
    }

    fn press(f: impl FnOnce(&mut ActionSet)) -> ActionSet {
        let mut actions = ActionSet::default();
        f(&mut actions);
        actions
    }

    fn enemy_at(kind: EnemyKind, pos: Vec2) -> Enemy {
        Enemy::new(kind, pos, Vec2::ZERO)
    }

    #[test]
    fn test_fire_until_pool_full() {
        let mut state = new_state();
        let settings = Settings::default();
        let mut log = EventLog::new();
        let fire = press(|a| a.fire = true);

        for _ in 0..3 {
            tick(&mut state, &fire, Duration::ZERO, &settings, &mut log);
        }
        assert_eq!(state.projectiles.len(), 3);
        assert!(state.projectiles.iter().all(|p| p.owner == Owner::Player));

        let outcome = tick(&mut state, &fire, Duration::ZERO, &settings, &mut log);
        assert_eq!(outcome, TickOutcome::Continue);
        assert_eq!(state.projectiles.len(), 3);
        assert_eq!(log.cues.iter().filter(|c| **c == SoundEffect::Fire).count(), 3);
    }

    #[test]
    fn test_projectiles_culled_above_top() {
        let mut state = new_state();
        let settings = Settings::default();
        let mut log = EventLog::new();
        tick(&mut state, &press(|a| a.fire = true), Duration::ZERO, &settings, &mut log);
        assert_eq!(state.projectiles.len(), 1);

        // 520 units up to the top edge plus the 50 margin at 480/s
        for _ in 0..100 {
            tick(&mut state, &idle(), FRAME, &settings, &mut log);
        }
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_kill_awards_discovery() {
        let mut state = new_state();
        let settings = Settings::default();
        let mut log = EventLog::new();
        let target = Vec2::new(100.0, 100.0);
        state.enemies.try_push(enemy_at(EnemyKind::Scout, target));

        for expected_hp in [1, 0] {
            state.projectiles.try_push(Projectile {
                pos: target,
                vel: Vec2::ZERO,
                owner: Owner::Player,
            });
            tick(&mut state, &idle(), Duration::ZERO, &settings, &mut log);
            assert!(state.projectiles.is_empty());
            if expected_hp > 0 {
                assert_eq!(state.enemies.as_slice()[0].hp, expected_hp);
            }
        }
        assert!(state.enemies.is_empty());
        assert_eq!(state.player.discoveries, 1);
        assert_eq!(log.events, vec![HudEvent::Discoveries(1)]);
    }

    #[test]
    fn test_unshielded_contact_damages_hull() {
        let mut state = new_state();
        let settings = Settings::default();
        let mut log = EventLog::new();
        let pos = state.player.pos;
        state.enemies.try_push(enemy_at(EnemyKind::Scout, pos));

        tick(&mut state, &idle(), Duration::ZERO, &settings, &mut log);
        assert_eq!(state.player.hull, 2);
        assert!(state.enemies.is_empty());
        assert_eq!(log.events, vec![HudEvent::Hull(2)]);
    }

    #[test]
    fn test_last_hull_point_ends_session_once() {
        let mut state = new_state();
        let settings = Settings::default();
        let mut log = EventLog::new();
        state.player.hull = 1;
        let pos = state.player.pos;
        state.enemies.try_push(enemy_at(EnemyKind::Scout, pos));
        state.enemies.try_push(enemy_at(EnemyKind::Tank, pos));

        let outcome = tick(&mut state, &idle(), Duration::ZERO, &settings, &mut log);
        assert_eq!(outcome, TickOutcome::GameOver);
        assert_eq!(state.player.hull, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(log.events, vec![HudEvent::Hull(0)]);

        // Nothing more happens once over
        state.enemies.try_push(enemy_at(EnemyKind::Scout, pos));
        let outcome = tick(&mut state, &press(|a| a.fire = true), FRAME, &settings, &mut log);
        assert_eq!(outcome, TickOutcome::Ended);
        assert_eq!(state.player.hull, 0);
        assert_eq!(log.events.len(), 1);
        assert_eq!(log.cues.iter().filter(|c| **c == SoundEffect::GameOver).count(), 1);
    }

    #[test]
    fn test_shield_blocks_within_window_only() {
        let mut state = new_state();
        let settings = Settings::default();
        let mut log = EventLog::new();
        let pos = state.player.pos;

        tick(&mut state, &press(|a| a.shield = true), Duration::ZERO, &settings, &mut log);
        assert!(state.player.shielded);

        // 100ms in: blocked
        state.enemies.try_push(enemy_at(EnemyKind::Scout, pos));
        tick(&mut state, &idle(), Duration::from_millis(100), &settings, &mut log);
        assert_eq!(state.player.hull, 3);
        assert!(state.enemies.is_empty(), "blocked enemy is still destroyed");

        // Re-trigger at 200ms does not extend the window
        let shield = press(|a| a.shield = true);
        tick(&mut state, &shield, Duration::from_millis(100), &settings, &mut log);
        assert_eq!(state.player.shield_remaining, Duration::from_millis(100));

        // 300ms: window closed before collisions run
        state.enemies.try_push(enemy_at(EnemyKind::Scout, pos));
        tick(&mut state, &idle(), Duration::from_millis(100), &settings, &mut log);
        assert!(!state.player.shielded);
        assert_eq!(state.player.hull, 2);
        assert_eq!(log.cues.iter().filter(|c| **c == SoundEffect::ShieldUp).count(), 1);
    }

    #[test]
    fn test_scan_discovers_each_planet_once() {
        let mut state = new_state();
        let settings = Settings::default();
        let mut log = EventLog::new();
        let near = Planet {
            pos: state.player.pos + Vec2::new(120.0, -60.0),
            scale: 1.0,
            tint: 0xffffff,
        };
        let far = Planet {
            pos: Vec2::new(0.0, 0.0),
            ..near
        };
        state.sector.planets = vec![far, near];
        let scan = press(|a| a.scan = true);

        tick(&mut state, &scan, Duration::ZERO, &settings, &mut log);
        assert_eq!(state.player.discoveries, 1);
        assert_eq!(state.scanned, vec![1]);
        assert!(state.scan_pulse_progress().is_some());

        tick(&mut state, &scan, Duration::ZERO, &settings, &mut log);
        assert_eq!(state.player.discoveries, 1);
        assert_eq!(log.events, vec![HudEvent::Discoveries(1)]);

        // Pulse runs out on its own
        tick(&mut state, &idle(), Duration::from_millis(SCAN_PULSE_MS), &settings, &mut log);
        assert!(state.scan_pulse_progress().is_none());
    }

    #[test]
    fn test_scan_miss_changes_nothing() {
        let mut state = new_state();
        let settings = Settings::default();
        let mut log = EventLog::new();
        state.sector.planets.clear();

        tick(&mut state, &press(|a| a.scan = true), Duration::ZERO, &settings, &mut log);
        assert_eq!(state.player.discoveries, 0);
        assert!(state.scan_pulse_progress().is_none());
        assert!(log.events.is_empty());
        assert!(log.cues.is_empty());
    }

    #[test]
    fn test_fifth_discovery_jumps() {
        let mut state = new_state();
        let settings = Settings::default();
        let mut log = EventLog::new();
        state.player.discoveries = 4;
        state.player.pos = state.sector.planets[0].pos;

        tick(&mut state, &press(|a| a.scan = true), Duration::ZERO, &settings, &mut log);
        assert_eq!(state.player.discoveries, 5);
        assert_eq!(state.seed, 16_807_000);
        assert_eq!(state.sector.id, 16_807_000);
        assert_eq!(
            log.events,
            vec![
                HudEvent::Discoveries(5),
                HudEvent::Sector(state.sector.name())
            ]
        );
    }

    #[test]
    fn test_no_jump_off_cadence() {
        let mut state = new_state();
        let settings = Settings::default();
        let mut log = EventLog::new();
        state.player.discoveries = 5;
        state.player.pos = state.sector.planets[0].pos;

        tick(&mut state, &press(|a| a.scan = true), Duration::ZERO, &settings, &mut log);
        assert_eq!(state.player.discoveries, 6);
        assert_eq!(state.seed, 1000);
    }

    #[test]
    fn test_photo_mode_hides_hud() {
        let mut state = new_state();
        let settings = Settings::default();
        let mut log = EventLog::new();
        let toggle = press(|a| a.toggle_photo_mode = true);

        tick(&mut state, &toggle, Duration::ZERO, &settings, &mut log);
        assert!(state.photo_mode);
        assert_eq!(log.take(), vec![HudEvent::PhotoModeOn(true)]);

        // Damage still happens, the HUD just doesn't hear about it
        let pos = state.player.pos;
        state.enemies.try_push(enemy_at(EnemyKind::Scout, pos));
        tick(&mut state, &idle(), Duration::ZERO, &settings, &mut log);
        assert_eq!(state.player.hull, 2);
        assert!(log.events.is_empty());

        tick(&mut state, &toggle, Duration::ZERO, &settings, &mut log);
        assert_eq!(
            log.take(),
            vec![
                HudEvent::PhotoModeOn(false),
                HudEvent::Discoveries(0),
                HudEvent::Hull(2),
                HudEvent::Sector(state.sector.name()),
            ]
        );
    }

    #[test]
    fn test_first_encounter_after_period() {
        let mut state = new_state();
        let settings = Settings::default();
        let mut log = EventLog::new();

        tick(&mut state, &idle(), Duration::from_millis(15_000), &settings, &mut log);
        assert!(state.enemies.is_empty());
        tick(&mut state, &idle(), Duration::from_millis(1), &settings, &mut log);
        assert_eq!(state.enemies.len(), 3);
        assert_eq!(state.director.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_encounter_period_follows_settings() {
        let mut state = new_state();
        let settings = Settings {
            encounter_period_ms: 1_000,
            ..Default::default()
        };
        let mut log = EventLog::new();
        tick(&mut state, &idle(), Duration::from_millis(1_001), &settings, &mut log);
        assert_eq!(state.enemies.len(), 3);
    }

    #[test]
    fn test_extreme_delta_saturates_elapsed() {
        let mut state = new_state();
        let settings = Settings::default();
        let mut log = EventLog::new();
        state.sector.planets.clear();
        tick(&mut state, &idle(), Duration::MAX, &settings, &mut log);
        tick(&mut state, &idle(), Duration::MAX, &settings, &mut log);
        assert_eq!(state.elapsed, Duration::MAX);
    }

    #[test]
    fn test_player_stays_in_bounds() {
        let mut state = new_state();
        let settings = Settings::default();
        let mut log = EventLog::new();
        let left = press(|a| a.move_vector = Vec2::new(-1.0, 0.0));
        for _ in 0..200 {
            tick(&mut state, &left, FRAME, &settings, &mut log);
        }
        assert_eq!(state.player.pos.x, 0.0);
    }

    #[test]
    fn test_dust_density() {
        let mut log = EventLog::new();
        let mut state = new_state();
        let none = Settings {
            particle_density: 0.0,
            ..Default::default()
        };
        tick(&mut state, &idle(), Duration::from_secs(1), &none, &mut log);
        assert!(state.particles.is_empty());

        let mut state = new_state();
        tick(&mut state, &idle(), Duration::from_secs(1), &Settings::default(), &mut log);
        assert_eq!(state.particles.len(), 40);

        let mut state = new_state();
        let dense = Settings {
            particle_density: 100.0,
            ..Default::default()
        };
        tick(&mut state, &idle(), Duration::from_secs(5), &dense, &mut log);
        assert_eq!(state.particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_determinism() {
        let settings = Settings::default();
        let mut a = new_state();
        let mut b = new_state();
        let mut log = EventLog::new();
        let inputs = [
            press(|a| a.move_vector = Vec2::new(0.5, -1.0)),
            press(|a| a.fire = true),
            press(|a| a.scan = true),
            idle(),
        ];
        for step in 0..2_000 {
            let input = &inputs[step % inputs.len()];
            tick(&mut a, input, FRAME, &settings, &mut log);
            tick(&mut b, input, FRAME, &settings, &mut log);
        }
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.player.hull, b.player.hull);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.particles.len(), b.particles.len());
        assert_eq!(a.seed, b.seed);
    }

    proptest! {
        #[test]
        fn prop_hull_never_negative_and_game_over_once(
            contacts in proptest::collection::vec(0usize..4, 1..20)
        ) {
            let settings = Settings::default();
            let mut state = new_state();
            let mut log = EventLog::new();
            let mut game_overs = 0;
            for count in contacts {
                let pos = state.player.pos;
                for _ in 0..count {
                    state.enemies.try_push(enemy_at(EnemyKind::Scout, pos));
                }
                let outcome = tick(&mut state, &idle(), Duration::ZERO, &settings, &mut log);
                if outcome == TickOutcome::GameOver {
                    game_overs += 1;
                }
                prop_assert!(state.player.hull <= PLAYER_START_HULL);
            }
            prop_assert!(game_overs <= 1);
            prop_assert_eq!(game_overs == 1, state.player.hull == 0);
        }
    }
}
