#![allow(dead_code)]

use dscompiler::DsCompiler;

// ─── Inputs ────────────────────────────────────────────────────────────────

/// A structure with every slot populated.
pub fn make_structure(c: &DsCompiler, value: f64) -> Vec<f64> {
    let mut v: Vec<f64> = (0..c.size()).map(|i| 0.1 + 0.01 * i as f64).collect();
    v[0] = value;
    v
}

/// One structure per free parameter, each seeded as that parameter.
pub fn make_variables(c: &DsCompiler) -> Vec<Vec<f64>> {
    let p = c.free_parameters();
    (0..p)
        .map(|k| {
            let mut v = vec![0.0; c.size()];
            v[0] = 0.5 + 0.1 * k as f64;
            let mut orders = vec![0; p];
            orders[k] = 1;
            if let Ok(index) = c.partial_derivative_index(&orders) {
                v[index] = 1.0;
            }
            v
        })
        .collect()
}

// ─── Rosenbrock ────────────────────────────────────────────────────────────
// f(x) = Σ[(1 - x_i)² + 100·(x_{i+1} - x_i²)²]

pub fn rosenbrock(c: &DsCompiler, x: &[Vec<f64>], out: &mut [f64]) {
    let n = c.size();
    let mut one = vec![0.0; n];
    one[0] = 1.0;
    let mut t1 = vec![0.0; n];
    let mut t2 = vec![0.0; n];
    let mut sq = vec![0.0; n];

    out[..n].fill(0.0);
    for i in 0..x.len() - 1 {
        c.subtract(&one, &x[i], &mut t1);
        c.multiply(&t1, &t1, &mut sq);
        c.add_assign(out, &sq);

        c.multiply(&x[i], &x[i], &mut sq);
        c.subtract(&x[i + 1], &sq, &mut t2);
        c.multiply(&t2, &t2, &mut sq);
        c.linear_combination2(1.0, &out[..n], 100.0, &sq, &mut t1);
        out[..n].copy_from_slice(&t1);
    }
}
