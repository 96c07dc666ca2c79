use log::debug;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Distribution;
use std::fmt;
use std::ops::RangeInclusive;

pub mod dispatch;
pub mod history;
pub mod pool;
pub mod storage;
pub mod theme;

/// Default generation parameters.
pub mod defaults {
    pub const PLAY_COUNT: usize = 3;
    pub const MIN_PLAY_COUNT: usize = 1;
    pub const MAX_PLAY_COUNT: usize = 12;
}

/// One play: the chosen numbers for a single bet slip, sorted ascending.
pub type Play = Vec<u8>;

/// Which lottery game is active. Drives the number range, how many numbers
/// a play holds, how many past contests feed the draw pool, and how plays
/// are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GameVariant {
    MegaSena,
    Lotofacil,
}

impl GameVariant {
    pub const DEFAULT: GameVariant = GameVariant::MegaSena;

    /// All variants, in display order.
    pub const ALL: [GameVariant; 2] = [GameVariant::MegaSena, GameVariant::Lotofacil];

    /// Key fragment used in storage keys, DOM attributes and API paths.
    pub fn key(self) -> &'static str {
        match self {
            GameVariant::MegaSena => "megasena",
            GameVariant::Lotofacil => "lotofacil",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GameVariant::MegaSena => "Mega-Sena",
            GameVariant::Lotofacil => "Lotofácil",
        }
    }

    pub fn from_key(key: &str) -> Option<GameVariant> {
        GameVariant::ALL.into_iter().find(|v| v.key() == key)
    }

    /// Full range of playable numbers.
    pub fn number_range(self) -> RangeInclusive<u8> {
        match self {
            GameVariant::MegaSena => 1..=60,
            GameVariant::Lotofacil => 1..=25,
        }
    }

    /// Allowed numbers-per-play bounds.
    pub fn pick_bounds(self) -> RangeInclusive<usize> {
        match self {
            GameVariant::MegaSena => 6..=12,
            GameVariant::Lotofacil => 15..=20,
        }
    }

    pub fn default_pick_count(self) -> usize {
        *self.pick_bounds().start()
    }

    /// How many past contests feed the draw pool.
    pub fn draw_window(self) -> u32 {
        match self {
            GameVariant::MegaSena => 10,
            GameVariant::Lotofacil => 5,
        }
    }
}

// Custom error type for play generation
#[derive(Debug, PartialEq, Eq)]
pub enum GenerateError {
    EmptyPool,
    PlayCountOutOfRange(usize),
    PickCountOutOfRange {
        variant: GameVariant,
        requested: usize,
    },
    NotEnoughDistinct {
        needed: usize,
        available: usize,
    },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::EmptyPool => write!(f, "The number pool is empty"),
            GenerateError::PlayCountOutOfRange(n) => write!(
                f,
                "Play count {} is outside the allowed range ({}-{})",
                n,
                defaults::MIN_PLAY_COUNT,
                defaults::MAX_PLAY_COUNT
            ),
            GenerateError::PickCountOutOfRange { variant, requested } => write!(
                f,
                "{} plays must hold between {} and {} numbers, got {}",
                variant.label(),
                variant.pick_bounds().start(),
                variant.pick_bounds().end(),
                requested
            ),
            GenerateError::NotEnoughDistinct { needed, available } => write!(
                f,
                "Not enough distinct numbers in the pool: needed {}, but only {} available",
                needed, available
            ),
        }
    }
}

impl std::error::Error for GenerateError {}

/// Generates `play_count` plays of `pick_count` distinct numbers each.
///
/// Numbers are sampled from the pool weighted by multiplicity, so numbers
/// drawn often in the recent window are proportionally more likely. Each
/// play is sorted ascending before being returned.
pub fn generate_plays(
    variant: GameVariant,
    pool: &pool::DrawPool,
    play_count: usize,
    pick_count: usize,
    rng: &mut impl rand::Rng,
) -> Result<Vec<Play>, GenerateError> {
    if !(defaults::MIN_PLAY_COUNT..=defaults::MAX_PLAY_COUNT).contains(&play_count) {
        return Err(GenerateError::PlayCountOutOfRange(play_count));
    }
    if !variant.pick_bounds().contains(&pick_count) {
        return Err(GenerateError::PickCountOutOfRange {
            variant,
            requested: pick_count,
        });
    }

    let (numbers, base_weights) = pool.weighted();
    if numbers.is_empty() {
        return Err(GenerateError::EmptyPool);
    }
    if numbers.len() < pick_count {
        return Err(GenerateError::NotEnoughDistinct {
            needed: pick_count,
            available: numbers.len(),
        });
    }

    let mut plays = Vec::with_capacity(play_count);
    for _ in 0..play_count {
        // Weights are zeroed as numbers are taken so a play never repeats one.
        let mut weights = base_weights.clone();
        let mut play: Play = Vec::with_capacity(pick_count);

        while play.len() < pick_count {
            let dist = WeightedIndex::new(weights.iter().copied())
                .map_err(|_| GenerateError::EmptyPool)?;
            let idx = dist.sample(rng);
            play.push(numbers[idx]);
            weights[idx] = 0;
        }

        play.sort_unstable();
        plays.push(play);
    }

    debug!(
        "Generated {} plays of {} numbers for {}",
        play_count,
        pick_count,
        variant.key()
    );

    Ok(plays)
}

/// Generation entry point: seeds the RNG when a seed is given so results
/// are reproducible, otherwise uses the thread RNG.
pub fn generate_batch(
    variant: GameVariant,
    pool: &pool::DrawPool,
    play_count: usize,
    pick_count: usize,
    seed: Option<u64>,
) -> Result<Vec<Play>, GenerateError> {
    match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            generate_plays(variant, pool, play_count, pick_count, &mut rng)
        }
        None => {
            let mut rng = rand::rng();
            generate_plays(variant, pool, play_count, pick_count, &mut rng)
        }
    }
}

/// Zero-pads a number to two digits, the way bet slips print them.
pub fn pad2(n: u8) -> String {
    format!("{:02}", n)
}

/// Formats one play as a dash-joined row, e.g. "05 - 12 - 23".
pub fn format_play_row(play: &[u8]) -> String {
    play.iter()
        .map(|&n| pad2(n))
        .collect::<Vec<_>>()
        .join(" - ")
}

/// Splits one play into grid rows of `width` numbers for the grid layout.
pub fn grid_rows(play: &[u8], width: usize) -> Vec<Vec<u8>> {
    if width == 0 {
        return Vec::new();
    }
    play.chunks(width).map(|chunk| chunk.to_vec()).collect()
}

/// Grid width for the Lotofácil play layout.
pub const GRID_WIDTH: usize = 5;

/// A visual group break is inserted after every this many plays.
pub const PLAY_GROUP_SIZE: usize = 3;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DrawPool;

    #[test]
    fn variant_round_trips_through_key() {
        for variant in GameVariant::ALL {
            assert_eq!(GameVariant::from_key(variant.key()), Some(variant));
        }
        assert_eq!(GameVariant::from_key("quina"), None);
    }

    #[test]
    fn generated_plays_are_sorted_distinct_and_sized() {
        let pool = DrawPool::statistical(GameVariant::MegaSena);
        let plays = generate_batch(GameVariant::MegaSena, &pool, 4, 6, Some(7)).unwrap();

        assert_eq!(plays.len(), 4);
        for play in &plays {
            assert_eq!(play.len(), 6);
            let mut sorted = play.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(&sorted, play, "play must be sorted and duplicate-free");
            assert!(play.iter().all(|n| (1..=60).contains(n)));
        }
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let pool = DrawPool::statistical(GameVariant::Lotofacil);
        let first = generate_batch(GameVariant::Lotofacil, &pool, 2, 15, Some(42)).unwrap();
        let second = generate_batch(GameVariant::Lotofacil, &pool, 2, 15, Some(42)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn pick_bounds_are_enforced_per_variant() {
        let pool = DrawPool::statistical(GameVariant::MegaSena);
        let err = generate_batch(GameVariant::MegaSena, &pool, 1, 13, Some(1)).unwrap_err();
        assert_eq!(
            err,
            GenerateError::PickCountOutOfRange {
                variant: GameVariant::MegaSena,
                requested: 13
            }
        );

        let pool = DrawPool::statistical(GameVariant::Lotofacil);
        let err = generate_batch(GameVariant::Lotofacil, &pool, 1, 14, Some(1)).unwrap_err();
        assert!(matches!(err, GenerateError::PickCountOutOfRange { .. }));
    }

    #[test]
    fn play_count_is_bounded() {
        let pool = DrawPool::statistical(GameVariant::MegaSena);
        let err = generate_batch(GameVariant::MegaSena, &pool, 0, 6, Some(1)).unwrap_err();
        assert_eq!(err, GenerateError::PlayCountOutOfRange(0));
        let err = generate_batch(GameVariant::MegaSena, &pool, 13, 6, Some(1)).unwrap_err();
        assert_eq!(err, GenerateError::PlayCountOutOfRange(13));
    }

    #[test]
    fn formatting_pads_and_joins() {
        assert_eq!(pad2(5), "05");
        assert_eq!(pad2(42), "42");
        assert_eq!(format_play_row(&[5, 12, 23]), "05 - 12 - 23");
        assert_eq!(format_play_row(&[]), "");
    }

    #[test]
    fn grid_rows_chunk_by_five() {
        let play: Vec<u8> = (1..=15).collect();
        let rows = grid_rows(&play, GRID_WIDTH);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == 5));

        // a 17-number play leaves a short trailing row
        let play: Vec<u8> = (1..=17).collect();
        let rows = grid_rows(&play, GRID_WIDTH);
        assert_eq!(rows.last().unwrap().len(), 2);
    }
}
