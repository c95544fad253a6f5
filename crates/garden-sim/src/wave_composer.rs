//! Wave composition: which enemies a wave spawns, in what order.

use rand::seq::SliceRandom;
use rand::Rng;

use garden_core::balance::{SpawnPool, WaveConfig};

/// Number of regular (pool-drawn) enemies in a wave.
pub fn regular_count(wave_number: u32, waves: &WaveConfig) -> usize {
    let growth = (f64::from(wave_number) * waves.growth_rate).floor().max(0.0);
    waves.base_count as usize + growth as usize
}

/// Boss injected into a wave, if any. Only the highest tier applies.
pub fn boss_for_wave(wave_number: u32, waves: &WaveConfig) -> Option<&str> {
    if wave_number == 0 {
        return None;
    }
    if wave_number % 100 == 0 {
        Some(waves.bosses.wave100.as_str())
    } else if wave_number % 50 == 0 {
        Some(waves.bosses.wave50.as_str())
    } else if wave_number % 10 == 0 {
        Some(waves.bosses.wave10.as_str())
    } else {
        None
    }
}

/// Sneak units injected into a wave.
pub fn sneak_count(wave_number: u32, waves: &WaveConfig) -> usize {
    if waves.sneak_interval == 0 || wave_number == 0 || wave_number % waves.sneak_interval != 0 {
        return 0;
    }
    wave_number.div_ceil(10) as usize
}

/// Build the shuffled spawn queue for a wave.
pub fn generate_wave(wave_number: u32, waves: &WaveConfig, rng: &mut impl Rng) -> Vec<String> {
    let count = regular_count(wave_number, waves);
    let sneaks = sneak_count(wave_number, waves);
    let mut queue = Vec::with_capacity(count + sneaks + 1);

    if let Some(boss) = boss_for_wave(wave_number, waves) {
        queue.push(boss.to_string());
    }
    queue.extend(std::iter::repeat(waves.sneak_enemy.clone()).take(sneaks));

    let (_, pool) = waves.spawn_rules.pool_for_wave(wave_number);
    for _ in 0..count {
        if let Some(id) = draw(pool, rng.gen::<f64>()) {
            queue.push(id.to_string());
        }
    }

    queue.shuffle(rng);
    queue
}

/// Cumulative-weight sampling with a single uniform draw in `0..1`.
/// Weights are relative; rounding at the top end falls to the last entry.
pub fn draw(pool: &SpawnPool, roll: f64) -> Option<&str> {
    let total: f64 = pool.weights.iter().sum();
    if pool.enemies.is_empty() || total <= 0.0 {
        return None;
    }
    let target = roll * total;
    let mut cumulative = 0.0;
    for (id, weight) in pool.enemies.iter().zip(&pool.weights) {
        cumulative += weight;
        if target < cumulative {
            return Some(id);
        }
    }
    pool.enemies.last().map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use garden_core::balance::BalanceTable;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn waves() -> WaveConfig {
        BalanceTable::builtin().unwrap().waves
    }

    #[test]
    fn first_wave_is_regular_only() {
        let waves = waves();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let queue = generate_wave(1, &waves, &mut rng);
        // 5 + floor(1 * 2)
        assert_eq!(queue.len(), 7);
        let (_, pool) = waves.spawn_rules.pool_for_wave(1);
        assert!(queue.iter().all(|id| pool.enemies.contains(id)));
    }

    #[test]
    fn first_wave_without_growth_is_base_count() {
        let mut waves = waves();
        waves.growth_rate = 0.0;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(generate_wave(1, &waves, &mut rng).len(), 5);
    }

    #[test]
    fn boss_tiers_are_exclusive() {
        let waves = waves();
        assert_eq!(boss_for_wave(10, &waves), Some("dark_knight"));
        assert_eq!(boss_for_wave(50, &waves), Some("king"));
        assert_eq!(boss_for_wave(100, &waves), Some("emperor"));
        assert_eq!(boss_for_wave(200, &waves), Some("emperor"));
        assert_eq!(boss_for_wave(7, &waves), None);

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let queue = generate_wave(100, &waves, &mut rng);
        assert_eq!(queue.iter().filter(|id| *id == "emperor").count(), 1);
        assert!(!queue.iter().any(|id| id == "king" || id == "dark_knight"));
    }

    #[test]
    fn sneaks_every_interval() {
        let waves = waves();
        assert_eq!(sneak_count(4, &waves), 0);
        assert_eq!(sneak_count(5, &waves), 1);
        assert_eq!(sneak_count(25, &waves), 3);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let queue = generate_wave(5, &waves, &mut rng);
        assert_eq!(queue.len(), regular_count(5, &waves) + 1);
        assert!(queue.iter().any(|id| id == "sneak"));
    }

    #[test]
    fn draw_respects_relative_weights() {
        let pool = SpawnPool {
            enemies: vec!["a".into(), "b".into()],
            weights: vec![3.0, 1.0],
        };
        assert_eq!(draw(&pool, 0.0), Some("a"));
        assert_eq!(draw(&pool, 0.74), Some("a"));
        assert_eq!(draw(&pool, 0.76), Some("b"));
        assert_eq!(draw(&pool, 0.999_999), Some("b"));
    }

    #[test]
    fn same_seed_same_queue() {
        let waves = waves();
        let a = generate_wave(30, &waves, &mut ChaCha8Rng::seed_from_u64(77));
        let b = generate_wave(30, &waves, &mut ChaCha8Rng::seed_from_u64(77));
        assert_eq!(a, b);
    }
}
