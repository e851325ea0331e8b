use crate::error::AnalysisError;

#[cfg(feature = "mt")]
use rayon::prelude::*;

/// Evaluates `f` for every index in `0..n`, returning results in index order.
///
/// With the `mt` feature and `threads > 1` the indices are spread over a dedicated rayon pool;
/// otherwise they run in sequence. Both paths produce identical output.
pub fn map_indices<T, F>(n: usize, threads: usize, f: F) -> Result<Vec<T>, AnalysisError>
where
    T: Send,
    F: Fn(usize) -> T + Send + Sync,
{
    #[cfg(feature = "mt")]
    {
        if threads > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| AnalysisError::ThreadPool(e.to_string()))?;
            return Ok(pool.install(|| (0..n).into_par_iter().map(&f).collect()));
        }
    }

    #[cfg(not(feature = "mt"))]
    {
        let _ = threads;
    }

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        out.push(f(i));
    }
    Ok(out)
}
