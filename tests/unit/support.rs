use rand::RngCore;

/// Replays a fixed list of `[0,1)` draws (cycling) through `rand::Rng::random::<f64>()`.
///
/// Only draws representable with 53 bits of mantissa round-trip exactly.
pub(crate) struct ScriptedRng {
    draws: Vec<f64>,
    next: usize,
}

impl ScriptedRng {
    pub(crate) fn new(draws: &[f64]) -> Self {
        assert!(!draws.is_empty());
        Self {
            draws: draws.to_vec(),
            next: 0,
        }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let d = self.draws[self.next % self.draws.len()];
        self.next += 1;
        ((d * (1u64 << 53) as f64) as u64) << 11
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let v = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&v[..chunk.len()]);
        }
    }
}
