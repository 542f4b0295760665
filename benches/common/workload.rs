//! Deterministic event streams for distribution benchmarks.
//!
//! Real event logs are skewed: a few events dominate and a long tail shows up
//! once or twice. The Zipfian stream models that; Uniform and Scan bound it
//! from both sides.

use countkit::traits::FrequencyDistribution;

#[derive(Debug, Clone, Copy)]
pub enum Workload {
    /// Uniform random events in `[0, universe)`.
    Uniform,
    /// Every event in `[0, universe)` in turn, so all counts stay equal.
    Scan,
    /// Zipfian skew. `theta` = 0.0 is uniform, 0.99 is heavily skewed.
    Zipfian { theta: f64 },
}

#[derive(Debug, Clone)]
pub struct EventStream {
    universe: u64,
    workload: Workload,
    rng: XorShift64,
    scan_pos: u64,
    zipfian: Option<ZipfianState>,
}

impl EventStream {
    pub fn new(universe: u64, workload: Workload, seed: u64) -> Self {
        let universe = universe.max(1);
        let zipfian = match workload {
            Workload::Zipfian { theta } => Some(ZipfianState::new(universe, theta)),
            _ => None,
        };
        Self {
            universe,
            workload,
            rng: XorShift64::new(seed),
            scan_pos: 0,
            zipfian,
        }
    }

    pub fn next_event(&mut self) -> u64 {
        match (self.workload, &self.zipfian) {
            (Workload::Zipfian { .. }, Some(zipf)) => zipf.sample(self.rng.next_f64()),
            (Workload::Scan, _) => {
                let event = self.scan_pos;
                self.scan_pos = (self.scan_pos + 1) % self.universe;
                event
            },
            _ => self.rng.next_u64() % self.universe,
        }
    }

    /// Collects the next `len` events.
    pub fn take_events(&mut self, len: usize) -> Vec<u64> {
        (0..len).map(|_| self.next_event()).collect()
    }
}

/// Counts every event in `events` into `fd`.
pub fn record_all<D>(fd: &mut D, events: &[u64])
where
    D: FrequencyDistribution<u64>,
{
    for &event in events {
        let _ = fd.increment(event);
    }
}

/// Inverse-CDF Zipfian sampler (YCSB formulation).
#[derive(Debug, Clone)]
struct ZipfianState {
    n: u64,
    theta: f64,
    zeta_n: f64,
    alpha: f64,
    eta: f64,
}

impl ZipfianState {
    fn new(n: u64, theta: f64) -> Self {
        // theta = 1 divides by zero in alpha
        let theta = theta.clamp(0.0, 0.9999);
        let zeta_2 = Self::zeta(2, theta);
        let zeta_n = Self::zeta(n, theta);
        Self {
            n,
            theta,
            zeta_n,
            alpha: 1.0 / (1.0 - theta),
            eta: (1.0 - (2.0 / n as f64).powf(1.0 - theta)) / (1.0 - zeta_2 / zeta_n),
        }
    }

    fn zeta(n: u64, theta: f64) -> f64 {
        (1..=n).map(|i| 1.0 / (i as f64).powf(theta)).sum()
    }

    fn sample(&self, u: f64) -> u64 {
        let uz = u * self.zeta_n;
        if uz < 1.0 {
            return 0;
        }
        if uz < 1.0 + 0.5_f64.powf(self.theta) {
            return 1;
        }
        let spread = (self.n as f64) * (self.eta * u - self.eta + 1.0).powf(self.alpha);
        (spread as u64).min(self.n - 1)
    }
}

#[derive(Debug, Clone, Copy)]
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (u64::MAX as f64);
        (self.next_u64() as f64) * SCALE
    }
}
