use crate::error::Result;
use crate::traits::DiscreteMap;

/// Discrete map stepper.
/// Yields x_{n+1} = g(x_n) for successive n, starting after the seed.
/// Stops after the first failed evaluation, which is yielded as `Err`.
pub struct MapStepper<'a, M: ?Sized> {
    map: &'a M,
    state: f64,
    failed: bool,
}

impl<'a, M: DiscreteMap + ?Sized> MapStepper<'a, M> {
    pub fn new(map: &'a M, seed: f64) -> Self {
        Self {
            map,
            state: seed,
            failed: false,
        }
    }

    pub fn state(&self) -> f64 {
        self.state
    }
}

impl<M: DiscreteMap + ?Sized> Iterator for MapStepper<'_, M> {
    type Item = Result<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.map.next_state(self.state) {
            Ok(next) => {
                self.state = next;
                Some(Ok(next))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// The orbit x_0, x_1, …, x_steps of `map` started at `seed`.
pub fn iterate_map<M: DiscreteMap + ?Sized>(map: &M, seed: f64, steps: usize) -> Result<Vec<f64>> {
    std::iter::once(Ok(seed))
        .chain(MapStepper::new(map, seed).take(steps))
        .collect()
}
