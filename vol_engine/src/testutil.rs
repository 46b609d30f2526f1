/// Deterministic data generators shared across unit tests. No rand
/// dependency: splitmix64 for uniforms, Box-Muller for normals, so the
/// draws are identical on every platform and run.

/// Standard normal draws (splitmix64 + Box-Muller).
pub fn normal_draws(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    let mut uniform = move || {
        state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        ((z >> 11) as f64 + 0.5) / (1u64 << 53) as f64
    };
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let u1: f64 = uniform();
        let u2: f64 = uniform();
        let r = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * std::f64::consts::PI * u2;
        out.push(r * theta.cos());
        if out.len() < n {
            out.push(r * theta.sin());
        }
    }
    out
}

/// Simulate a GARCH(1,1) data-generating process, starting the recursion
/// at its unconditional variance.
pub fn simulate_garch11(n: usize, omega: f64, alpha: f64, beta: f64, seed: u64) -> Vec<f64> {
    let z = normal_draws(n, seed);
    let mut returns = Vec::with_capacity(n);
    let mut sigma2 = omega / (1.0 - alpha - beta);
    let mut prev_eps = 0.0f64;
    for zt in z {
        sigma2 = omega + alpha * prev_eps * prev_eps + beta * sigma2;
        let r = sigma2.sqrt() * zt;
        returns.push(r);
        prev_eps = r;
    }
    returns
}
