//! Walker's alias method, built with Vose's two-stack construction.
//!
//! For each bucket `i` the table stores a threshold `t[i]` in `[0, 1]` and a fallback index
//! `a[i]`. Given a uniform `x` in `[0, 1)`, the bucket is `floor(n * x)` and the fractional part
//! decides between the bucket itself and its alias.

/// Build thresholds and aliases from normalized probabilities.
pub(crate) fn build(probabilities: &[f64]) -> (Box<[f64]>, Box<[u32]>) {
    let n = probabilities.len();
    let mut scaled: Vec<f64> = probabilities.iter().map(|&p| p * n as f64).collect();
    let mut threshold = vec![1.0; n];
    let mut alias: Vec<u32> = (0..n as u32).collect();

    let mut small = Vec::with_capacity(n);
    let mut large = Vec::with_capacity(n);
    for (i, &p) in scaled.iter().enumerate() {
        if p < 1.0 {
            small.push(i);
        } else {
            large.push(i);
        }
    }

    while let (Some(&s), Some(&l)) = (small.last(), large.last()) {
        small.pop();
        large.pop();

        threshold[s] = scaled[s];
        alias[s] = l as u32;

        scaled[l] = (scaled[l] + scaled[s]) - 1.0;
        if scaled[l] < 1.0 {
            small.push(l);
        } else {
            large.push(l);
        }
    }

    // Whatever is left over is 1.0 up to rounding error, so it always keeps its own bucket.
    for i in small.into_iter().chain(large) {
        threshold[i] = 1.0;
        alias[i] = i as u32;
    }

    (threshold.into_boxed_slice(), alias.into_boxed_slice())
}
