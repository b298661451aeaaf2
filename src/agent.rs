use crate::error::GridError;

pub trait Agent {
    /// Runs a fixed number of rounds and returns the value change of each one.
    fn train(&mut self, rounds: usize) -> Result<Vec<f64>, GridError> {
        let mut deltas = Vec::with_capacity(rounds);
        for round in 0..rounds {
            let delta = self.train_round()?;
            log::info!("{:<32}{:<8}{:>12.6}", "finished round", round + 1, delta);
            deltas.push(delta);
        }
        Ok(deltas)
    }

    // 一轮: evaluation + improvement，返回最大 value 变化
    fn train_round(&mut self) -> Result<f64, GridError>;
}
