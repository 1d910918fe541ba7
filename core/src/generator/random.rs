use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Purely random placement, reproducible from its seed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomHazardGenerator {
    seed: u64,
}

impl RandomHazardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl HazardGenerator for RandomHazardGenerator {
    fn generate(self, config: GameConfig) -> Result<HazardLayout> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let layout = place_hazards(config.grid_size, config.hazards, &mut rng)?;
        log::debug!(
            "Placed {} hazards on {}x{} grid, seed: {}",
            layout.hazard_count(),
            config.grid_size,
            config.grid_size,
            self.seed
        );
        log::trace!("Answer map:\n{}", layout);
        Ok(layout)
    }
}

/// Chooses `hazard_count` distinct cells uniformly at random.
///
/// Every draw picks among the cells that are still free, so the count is exact whatever values
/// `rng` produces and the loop always ends after `hazard_count` draws.
pub fn place_hazards<R: Rng>(
    grid_size: Coord,
    hazard_count: CellCount,
    rng: &mut R,
) -> Result<HazardLayout> {
    let total_cells = mult(grid_size, grid_size);
    if hazard_count >= total_cells {
        log::warn!(
            "Cannot place {} hazards, grid only has {} cells",
            hazard_count,
            total_cells
        );
        return Err(GameError::InvalidConfiguration);
    }

    let mut layout = HazardLayout::empty(grid_size);
    let mut free_cells = total_cells;

    while layout.hazard_count < hazard_count {
        let place = usize::from(rng.random_range(0..free_cells));
        let Some(cell) = layout
            .hazard_mask
            .iter_mut()
            .filter(|is_hazard| !**is_hazard)
            .nth(place)
        else {
            // free_cells always matches the number of unset cells
            return Err(GameError::InvalidConfiguration);
        };
        *cell = true;
        layout.hazard_count += 1;
        free_cells -= 1;
    }

    Ok(layout)
}
