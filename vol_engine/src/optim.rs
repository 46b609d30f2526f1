/// optim.rs — Derivative-free minimization (Nelder-Mead)
///
/// ─────────────────────────────────────────────────────────────────────────
/// MATHEMATICAL SPECIFICATION
/// ─────────────────────────────────────────────────────────────────────────
///
/// Nelder & Mead (1965) downhill simplex with standard coefficients:
///
///   reflection ρ = 1,  expansion χ = 2,
///   contraction ψ = 1/2,  shrink σ = 1/2
///
/// Initial simplex: x₀ plus n vertices with each coordinate perturbed by
/// 5% (or a small absolute step when the coordinate is ~0), the usual
/// fminsearch convention.
///
/// Termination: the simplex's function-value spread AND coordinate spread
/// fall below tolerance → converged; otherwise the iteration cap trips and
/// the caller treats the fit as failed. The cap guarantees a non-converging
/// likelihood returns a failure instead of hanging.
/// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct NelderMead {
    pub max_iter: usize,
    /// Absolute tolerance on the simplex function-value spread.
    pub f_tol: f64,
    /// Absolute tolerance on the simplex coordinate spread.
    pub x_tol: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            f_tol: 1e-9,
            x_tol: 1e-8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptimOutcome {
    pub x: Vec<f64>,
    pub fx: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl NelderMead {
    pub fn with_max_iter(max_iter: usize) -> Self {
        Self {
            max_iter,
            ..Self::default()
        }
    }

    /// Minimize `f` starting from `x0`. `f` must be total (return a large
    /// finite penalty outside its domain, never NaN).
    pub fn minimize<F>(&self, f: F, x0: &[f64]) -> OptimOutcome
    where
        F: Fn(&[f64]) -> f64,
    {
        let n = x0.len();
        debug_assert!(n >= 1);

        // Initial simplex: x0 + perturbed vertices.
        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
        simplex.push(x0.to_vec());
        for i in 0..n {
            let mut v = x0.to_vec();
            if v[i].abs() > 1e-12 {
                v[i] *= 1.05;
            } else {
                v[i] = 0.00025;
            }
            simplex.push(v);
        }
        let mut fvals: Vec<f64> = simplex.iter().map(|v| f(v)).collect();

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iter {
            iterations += 1;

            // Order vertices by function value.
            let mut idx: Vec<usize> = (0..=n).collect();
            idx.sort_by(|&a, &b| fvals[a].partial_cmp(&fvals[b]).unwrap_or(std::cmp::Ordering::Equal));
            let ordered: Vec<Vec<f64>> = idx.iter().map(|&i| simplex[i].clone()).collect();
            let ordered_f: Vec<f64> = idx.iter().map(|&i| fvals[i]).collect();
            simplex = ordered;
            fvals = ordered_f;

            // Convergence check on spread.
            let f_spread = fvals[n] - fvals[0];
            let x_spread = (0..n)
                .map(|j| {
                    simplex[1..]
                        .iter()
                        .map(|v| (v[j] - simplex[0][j]).abs())
                        .fold(0.0f64, f64::max)
                })
                .fold(0.0f64, f64::max);
            if f_spread <= self.f_tol && x_spread <= self.x_tol {
                converged = true;
                break;
            }

            // Centroid of all vertices but the worst.
            let centroid: Vec<f64> = (0..n)
                .map(|j| simplex[..n].iter().map(|v| v[j]).sum::<f64>() / n as f64)
                .collect();

            let worst = simplex[n].clone();
            let reflect: Vec<f64> = (0..n).map(|j| 2.0 * centroid[j] - worst[j]).collect();
            let f_reflect = f(&reflect);

            if f_reflect < fvals[0] {
                // Try expanding further along the reflection direction.
                let expand: Vec<f64> = (0..n).map(|j| 3.0 * centroid[j] - 2.0 * worst[j]).collect();
                let f_expand = f(&expand);
                if f_expand < f_reflect {
                    simplex[n] = expand;
                    fvals[n] = f_expand;
                } else {
                    simplex[n] = reflect;
                    fvals[n] = f_reflect;
                }
            } else if f_reflect < fvals[n - 1] {
                simplex[n] = reflect;
                fvals[n] = f_reflect;
            } else {
                // Contract, outside or inside depending on the reflection.
                let (contract, f_contract) = if f_reflect < fvals[n] {
                    let c: Vec<f64> = (0..n)
                        .map(|j| centroid[j] + 0.5 * (reflect[j] - centroid[j]))
                        .collect();
                    let fc = f(&c);
                    (c, fc)
                } else {
                    let c: Vec<f64> = (0..n)
                        .map(|j| centroid[j] + 0.5 * (worst[j] - centroid[j]))
                        .collect();
                    let fc = f(&c);
                    (c, fc)
                };

                if f_contract < fvals[n].min(f_reflect) {
                    simplex[n] = contract;
                    fvals[n] = f_contract;
                } else {
                    // Shrink everything toward the best vertex.
                    let best = simplex[0].clone();
                    for v in simplex.iter_mut().skip(1) {
                        for j in 0..n {
                            v[j] = best[j] + 0.5 * (v[j] - best[j]);
                        }
                    }
                    for (i, v) in simplex.iter().enumerate().skip(1) {
                        fvals[i] = f(v);
                    }
                }
            }
        }

        // Best vertex (simplex may be unordered after the last step).
        let (best_i, _) = fvals
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or((0, &fvals[0]));

        OptimOutcome {
            x: simplex[best_i].clone(),
            fx: fvals[best_i],
            iterations,
            converged,
        }
    }
}
