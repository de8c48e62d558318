//! Overlap queries between circular bodies
//!
//! Everything collides as a circle: ship, shots and enemies have fixed radii.

use glam::Vec2;

use super::sector::Planet;
use super::state::Enemy;
use crate::circles_overlap;
use crate::consts::*;

/// First live enemy overlapping a projectile at `pos`
pub fn projectile_target(pos: Vec2, enemies: &mut [Enemy]) -> Option<&mut Enemy> {
    enemies
        .iter_mut()
        .find(|e| e.is_alive() && circles_overlap(pos, PROJECTILE_RADIUS, e.pos, ENEMY_RADIUS))
}

/// Whether an enemy touches the player ship at `player_pos`
pub fn touches_player(player_pos: Vec2, enemy: &Enemy) -> bool {
    enemy.is_alive() && circles_overlap(player_pos, PLAYER_RADIUS, enemy.pos, ENEMY_RADIUS)
}

/// Index of the first unscanned planet within scan range of `pos`
pub fn planet_in_scan_range(pos: Vec2, planets: &[Planet], scanned: &[usize]) -> Option<usize> {
    planets
        .iter()
        .enumerate()
        .find(|(i, p)| !scanned.contains(i) && p.pos.distance(pos) <= SCAN_RANGE)
        .map(|(i, _)| i)
}
