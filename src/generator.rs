//! Random board generation.
//!
//! A board is built in three steps:
//! 1. a planner splits the board area into group sizes (`plan_group_sizes`, or
//!    `plan_with_targets` which aims for a size histogram),
//! 2. `assign_colors` gives each planned group a palette color and scatters the
//!    resulting tiles with a shuffle,
//! 3. `build_grid` lays the shuffled tiles out row by row.
//!
//! The shuffle means planned groups rarely survive as connected regions. The plan
//! only controls how many tiles of each color exist; `groups::find_groups` is what
//! tells the actual groups apart.
use crate::config::{Color, Config, PlanStrategy};
use crate::engine::Grid;
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

/// How many times `plan_with_targets` retries before using the greedy planner.
pub const MAX_PLAN_ATTEMPTS: usize = 32;

/// Desired number of groups of one size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeTarget {
    pub size: usize,
    pub min_count: usize,
    pub max_count: usize,
}

impl SizeTarget {
    const fn new(size: usize, min_count: usize, max_count: usize) -> Self {
        SizeTarget {
            size,
            min_count,
            max_count,
        }
    }
}

/// Histogram used by `PlanStrategy::Targeted`: a few large groups, mostly mid-sized ones.
pub fn default_targets() -> Vec<SizeTarget> {
    vec![
        SizeTarget::new(10, 0, 2),
        SizeTarget::new(9, 1, 3),
        SizeTarget::new(8, 1, 4),
        SizeTarget::new(7, 1, 3),
        SizeTarget::new(6, 2, 4),
        SizeTarget::new(5, 2, 4),
        SizeTarget::new(4, 2, 5),
        SizeTarget::new(3, 2, 4),
        SizeTarget::new(2, 1, 4),
    ]
}

/// A generated board together with the group sizes it was planned from.
#[derive(Clone, Debug)]
pub struct GeneratedBoard {
    pub grid: Grid,
    pub plan: Vec<usize>,
}

/// Generates a full board for `config`.
///
/// Plans group sizes with the configured `PlanStrategy`, colors each planned group,
/// scatters the tiles and lays them out row-major.
///
/// # Arguments
/// * `config`: The board settings. Must have passed `Config::validate`.
/// * `rng`: Source of randomness. The same seed always yields the same board.
///
/// # Returns
/// A `GeneratedBoard` whose `grid` is `grid_size x grid_size` with every cell
/// filled from `config.palette`, and whose `plan` lists the group sizes used.
///
/// # Examples
/// ```
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
/// use tileswap::config::Config;
/// use tileswap::generator::generate;
///
/// let config = Config::default();
/// let board = generate(&config, &mut SmallRng::seed_from_u64(1));
/// assert!(board.grid.is_full());
/// assert_eq!(board.plan.iter().sum::<usize>(), 100);
/// ```
pub fn generate(config: &Config, rng: &mut impl Rng) -> GeneratedBoard {
    let total = config.total_cells();
    let (min, max) = (config.min_group_size, config.max_group_size);
    let plan = match config.planner {
        PlanStrategy::Greedy => plan_group_sizes(total, min, max, rng),
        PlanStrategy::Targeted => plan_with_targets(total, min, max, &default_targets(), rng),
    };
    let colors = assign_colors(&plan, &config.palette, rng);
    let grid = build_grid(colors, config.grid_size);
    debug!("generated {} groups: {:?}", plan.len(), plan);
    GeneratedBoard { grid, plan }
}

/// Splits `total` cells into random group sizes in `[min, max]`.
///
/// Every size is drawn uniformly from the bounds. A draw that would leave fewer
/// than `min` cells behind is adjusted instead: the group takes the whole remainder
/// when it fits, otherwise the remainder is halved. The remainder is therefore
/// always 0 or at least `min`, and the loop ends after at most `total / min` draws.
///
/// # Arguments
/// * `total`: Number of cells to split. Must be 0 or at least `min`.
/// * `min`, `max`: Inclusive group size bounds with `min >= 2` and
///   `max >= 2 * min - 1`.
/// * `rng`: Source of randomness.
///
/// # Returns
/// Group sizes in draw order, summing to `total`, each within `[min, max]`.
pub fn plan_group_sizes(total: usize, min: usize, max: usize, rng: &mut impl Rng) -> Vec<usize> {
    debug_assert!(total == 0 || total >= min);
    let mut sizes = Vec::new();
    let mut remaining = total;

    while remaining > 0 {
        let mut size = rng.gen_range(min..=max);
        if size >= remaining {
            size = remaining;
        } else if remaining - size < min {
            size = if remaining <= max {
                remaining
            } else {
                remaining / 2
            };
        }
        sizes.push(size);
        remaining -= size;
    }

    sizes
}

/// Splits `total` cells into group sizes that follow `targets` where possible.
///
/// Each attempt first places every target's `min_count` groups, then keeps adding
/// randomly chosen sizes whose count is still below `max_count`. A leftover in
/// `[min, max]` becomes one more group if its size is still under its own
/// `max_count`; otherwise it is absorbed by growing the smallest groups. An attempt
/// fails when the leftover cannot be absorbed without exceeding `max`. After
/// `MAX_PLAN_ATTEMPTS` failures this falls back to `plan_group_sizes`.
///
/// The histogram is best-effort: growing groups in the last step can move a size
/// past its `max_count`, and the greedy fallback ignores `targets` entirely. Only
/// the `[min, max]` bounds and the sum are guaranteed.
///
/// # Arguments
/// * `total`: Number of cells to split, usually `grid_size * grid_size`.
/// * `min`, `max`: Inclusive group size bounds, as checked by `Config::validate`.
/// * `targets`: Desired count range per size. Sizes outside `[min, max]` are ignored.
/// * `rng`: Source of randomness; a seeded `SmallRng` makes the plan reproducible.
///
/// # Returns
/// Group sizes that sum to `total`, each within `[min, max]`.
pub fn plan_with_targets(
    total: usize,
    min: usize,
    max: usize,
    targets: &[SizeTarget],
    rng: &mut impl Rng,
) -> Vec<usize> {
    for attempt in 1..=MAX_PLAN_ATTEMPTS {
        if let Some(sizes) = try_plan_with_targets(total, min, max, targets, rng) {
            debug!("size targets met on attempt {}", attempt);
            return sizes;
        }
    }
    warn!(
        "size targets not met after {} attempts, falling back to greedy plan",
        MAX_PLAN_ATTEMPTS
    );
    plan_group_sizes(total, min, max, rng)
}

fn try_plan_with_targets(
    total: usize,
    min: usize,
    max: usize,
    targets: &[SizeTarget],
    rng: &mut impl Rng,
) -> Option<Vec<usize>> {
    let usable: Vec<SizeTarget> = targets
        .iter()
        .filter(|t| (min..=max).contains(&t.size))
        .copied()
        .collect();
    // A size fits if it does not strand fewer than `min` cells.
    let fits = |remaining: usize, size: usize| {
        size <= remaining && (remaining == size || remaining - size >= min)
    };

    let mut sizes = Vec::new();
    let mut counts = vec![0usize; max + 1];
    let mut remaining = total;

    for target in &usable {
        for _ in 0..target.min_count {
            if fits(remaining, target.size) {
                sizes.push(target.size);
                counts[target.size] += 1;
                remaining -= target.size;
            }
        }
    }

    let mut order: Vec<SizeTarget> = usable.clone();
    while remaining >= min {
        order.shuffle(rng);
        let pick = order
            .iter()
            .find(|t| counts[t.size] < t.max_count && fits(remaining, t.size));
        match pick {
            Some(target) => {
                sizes.push(target.size);
                counts[target.size] += 1;
                remaining -= target.size;
            }
            None => break,
        }
    }

    let cap = |size: usize| {
        usable
            .iter()
            .find(|t| t.size == size)
            .map_or(usize::MAX, |t| t.max_count)
    };
    if (min..=max).contains(&remaining) && counts[remaining] < cap(remaining) {
        sizes.push(remaining);
        remaining = 0;
    }
    while remaining > 0 {
        let smallest = (0..sizes.len())
            .filter(|&i| sizes[i] < max)
            .min_by_key(|&i| sizes[i])?;
        sizes[smallest] += 1;
        remaining -= 1;
    }

    Some(sizes)
}

/// Turns group sizes into a flat, shuffled tile sequence.
///
/// The palette is shuffled once and each group takes the next unused color. Once
/// the palette runs out, every further group reuses the last color, so that color
/// ends up with more tiles than any single planned group.
///
/// # Panics
/// Panics if `palette` is empty.
pub fn assign_colors(sizes: &[usize], palette: &[Color], rng: &mut impl Rng) -> Vec<Color> {
    assert!(!palette.is_empty(), "cannot color groups from an empty palette");
    let mut available = palette.to_vec();
    available.shuffle(rng);

    let mut colors = Vec::with_capacity(sizes.iter().sum());
    for (i, &size) in sizes.iter().enumerate() {
        let color = available[i.min(available.len() - 1)];
        colors.extend(std::iter::repeat(color).take(size));
    }
    if sizes.len() > available.len() {
        debug!(
            "palette exhausted: {} groups share {}",
            sizes.len() - available.len() + 1,
            available[available.len() - 1]
        );
    }

    colors.shuffle(rng);
    colors
}

/// Lays out `n * n` colors row by row.
///
/// # Panics
/// Panics if `colors.len() != n * n`.
pub fn build_grid(colors: Vec<Color>, n: usize) -> Grid {
    Grid::from_cells(n, colors.into_iter().map(Some).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::count_by_color;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const TRIALS: u64 = 200;

    fn assert_valid_plan(sizes: &[usize], total: usize, min: usize, max: usize) {
        assert_eq!(sizes.iter().sum::<usize>(), total, "plan {:?}", sizes);
        for &size in sizes {
            assert!(
                (min..=max).contains(&size),
                "size {} out of [{}, {}] in {:?}",
                size,
                min,
                max,
                sizes
            );
        }
    }

    #[test]
    fn test_greedy_plan_respects_bounds_and_sum() {
        for seed in 0..TRIALS {
            let mut rng = SmallRng::seed_from_u64(seed);
            let sizes = plan_group_sizes(100, 2, 10, &mut rng);
            assert_valid_plan(&sizes, 100, 2, 10);
        }
    }

    #[test]
    fn test_greedy_plan_other_bounds() {
        for seed in 0..TRIALS {
            let mut rng = SmallRng::seed_from_u64(seed);
            assert_valid_plan(&plan_group_sizes(49, 3, 5, &mut rng), 49, 3, 5);
            assert_valid_plan(&plan_group_sizes(11, 2, 3, &mut rng), 11, 2, 3);
            assert_valid_plan(&plan_group_sizes(400, 2, 10, &mut rng), 400, 2, 10);
        }
    }

    #[test]
    fn test_greedy_plan_small_totals() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(plan_group_sizes(0, 2, 10, &mut rng).is_empty());
        assert_eq!(plan_group_sizes(2, 2, 10, &mut rng), vec![2]);
        assert_eq!(plan_group_sizes(3, 2, 10, &mut rng), vec![3]);
    }

    #[test]
    fn test_greedy_plan_is_varied() {
        let mut rng = SmallRng::seed_from_u64(17);
        let sizes = plan_group_sizes(100, 2, 10, &mut rng);
        assert!(sizes.iter().any(|&s| s != sizes[0]), "all groups equal: {:?}", sizes);
    }

    #[test]
    fn test_targeted_plan_respects_bounds_and_sum() {
        let targets = default_targets();
        for seed in 0..TRIALS {
            let mut rng = SmallRng::seed_from_u64(seed);
            let sizes = plan_with_targets(100, 2, 10, &targets, &mut rng);
            assert_valid_plan(&sizes, 100, 2, 10);
        }
    }

    #[test]
    fn test_targeted_plan_places_minimum_counts() {
        let mut rng = SmallRng::seed_from_u64(5);
        let sizes = plan_with_targets(100, 2, 10, &default_targets(), &mut rng);
        // The minimum counts fill the first 62 cells in table order.
        assert_eq!(&sizes[..12], &[9, 8, 7, 6, 6, 5, 5, 4, 4, 3, 3, 2]);
    }

    #[test]
    fn test_targeted_plan_falls_back_when_targets_cannot_fill_board() {
        let targets = [SizeTarget::new(10, 0, 1)];
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let sizes = plan_with_targets(100, 2, 10, &targets, &mut rng);
            assert_valid_plan(&sizes, 100, 2, 10);
        }
        let mut rng = SmallRng::seed_from_u64(0);
        assert_valid_plan(&plan_with_targets(100, 2, 10, &[], &mut rng), 100, 2, 10);
    }

    #[test]
    fn test_leftover_group_respects_max_count() {
        // After two 3s, the 2 cells left over would make a size-2 group, which the
        // targets forbid. They are absorbed by growing the 3s instead.
        let targets = [SizeTarget::new(3, 2, 2), SizeTarget::new(2, 0, 0)];
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(try_plan_with_targets(8, 2, 4, &targets, &mut rng), Some(vec![4, 4]));
        // With nothing able to grow, the attempt fails rather than break the cap.
        assert_eq!(try_plan_with_targets(8, 2, 3, &targets, &mut rng), None);

        // Once one size-2 group is allowed, the last two cells form it.
        let targets = [SizeTarget::new(3, 2, 2), SizeTarget::new(2, 0, 1)];
        assert_eq!(
            try_plan_with_targets(8, 2, 4, &targets, &mut rng),
            Some(vec![3, 3, 2])
        );
    }

    #[test]
    fn test_targeted_plan_on_large_board() {
        let mut rng = SmallRng::seed_from_u64(3);
        let sizes = plan_with_targets(400, 2, 10, &default_targets(), &mut rng);
        assert_valid_plan(&sizes, 400, 2, 10);
    }

    #[test]
    fn test_assign_colors_unique_per_group() {
        let palette = crate::config::default_palette();
        let mut rng = SmallRng::seed_from_u64(9);
        let colors = assign_colors(&[4, 6, 8], &palette, &mut rng);
        assert_eq!(colors.len(), 18);
        assert!(colors.iter().all(|c| palette.contains(c)));

        let mut per_color: Vec<usize> = palette
            .iter()
            .map(|&p| colors.iter().filter(|&&c| c == p).count())
            .filter(|&n| n > 0)
            .collect();
        per_color.sort_unstable();
        assert_eq!(per_color, vec![4, 6, 8]);
    }

    #[test]
    fn test_assign_colors_reuses_last_color_when_palette_runs_out() {
        let palette = [Color::rgb(1, 0, 0), Color::rgb(0, 1, 0)];
        let mut rng = SmallRng::seed_from_u64(4);
        let colors = assign_colors(&[2, 3, 4], &palette, &mut rng);
        assert_eq!(colors.len(), 9);

        let mut per_color: Vec<usize> = palette
            .iter()
            .map(|&p| colors.iter().filter(|&&c| c == p).count())
            .collect();
        per_color.sort_unstable();
        assert_eq!(per_color, vec![2, 7]);
    }

    #[test]
    fn test_build_grid_is_row_major() {
        let palette = crate::config::default_palette();
        let colors: Vec<Color> = (0..9).map(|i| palette[i]).collect();
        let grid = build_grid(colors.clone(), 3);
        assert_eq!(grid.size(), 3);
        for r in 0..3 {
            for c in 0..3 {
                assert_eq!(grid.get(r, c), Some(colors[r * 3 + c]));
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_build_grid_wrong_length_panics() {
        build_grid(vec![crate::config::RED; 8], 3);
    }

    #[test]
    fn test_generated_boards_are_full_and_use_palette() {
        for planner in [PlanStrategy::Greedy, PlanStrategy::Targeted] {
            let config = Config {
                planner,
                ..Config::default()
            };
            for seed in 0..TRIALS {
                let board = generate(&config, &mut SmallRng::seed_from_u64(seed));
                assert_eq!(board.grid.size(), config.grid_size);
                assert!(board.grid.is_full());
                for (_, color) in board.grid.iter() {
                    assert!(config.palette.contains(&color.unwrap()));
                }
            }
        }
    }

    #[test]
    fn test_generated_boards_have_no_lonely_color() {
        let small_palette = Config {
            palette: crate::config::default_palette()[..3].to_vec(),
            ..Config::default()
        };
        for config in [Config::default(), small_palette] {
            for seed in 0..TRIALS {
                let board = generate(&config, &mut SmallRng::seed_from_u64(seed));
                for (color, count) in count_by_color(&board.grid) {
                    assert!(count >= 2, "seed {}: {} appears only once", seed, color);
                }
            }
        }
    }

    #[test]
    fn test_generate_is_deterministic_per_seed() {
        let config = Config::default();
        let a = generate(&config, &mut SmallRng::seed_from_u64(77));
        let b = generate(&config, &mut SmallRng::seed_from_u64(77));
        let c = generate(&config, &mut SmallRng::seed_from_u64(78));
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.plan, b.plan);
        assert_ne!(a.grid, c.grid);
    }
}
