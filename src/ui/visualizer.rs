use rand::Rng;

/// Height every bar rests at while nothing plays.
pub const REST_LEVEL: f64 = 0.5;

const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Decorative level bars. Levels are random, not derived from the audio.
#[derive(Debug, Clone)]
pub struct Visualizer {
    levels: Vec<f64>,
}

impl Visualizer {
    pub fn new(bars: usize) -> Self {
        Self {
            levels: vec![REST_LEVEL; bars],
        }
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Re-roll every bar in `[0.5, 1.0)` while active, else rest them.
    pub fn tick<R: Rng + ?Sized>(&mut self, active: bool, rng: &mut R) {
        for level in self.levels.iter_mut() {
            *level = if active {
                REST_LEVEL + rng.r#gen::<f64>() * 0.5
            } else {
                REST_LEVEL
            };
        }
    }

    pub fn render(&self) -> String {
        self.levels
            .iter()
            .map(|level| {
                let i = (level.clamp(0.0, 1.0) * (BLOCKS.len() - 1) as f64).round() as usize;
                BLOCKS[i]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn starts_at_rest() {
        let v = Visualizer::new(20);
        assert_eq!(v.levels().len(), 20);
        assert!(v.levels().iter().all(|l| *l == REST_LEVEL));
    }

    #[test]
    fn active_levels_stay_in_upper_half() {
        let mut v = Visualizer::new(20);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            v.tick(true, &mut rng);
            assert!(v.levels().iter().all(|l| (0.5..1.0).contains(l)));
        }
    }

    #[test]
    fn inactive_tick_rests_all_bars() {
        let mut v = Visualizer::new(5);
        let mut rng = StdRng::seed_from_u64(3);
        v.tick(true, &mut rng);
        v.tick(false, &mut rng);
        assert!(v.levels().iter().all(|l| *l == REST_LEVEL));
        assert_eq!(v.render(), "▅▅▅▅▅");
    }
}
