use super::{Layout, LayoutError, LayoutParams, generate_layout, validate_inputs};
use crate::domain::{Boundary, VenueType};

/// Seed for scheme `index` derived from a base seed (SplitMix64 mixing)
pub fn scheme_seed(base: u64, index: u64) -> u64 {
    fn mix(mut x: u64) -> u64 {
        x ^= x >> 30;
        x = x.wrapping_mul(0xbf58476d1ce4e5b9);
        x ^= x >> 27;
        x = x.wrapping_mul(0x94d049bb133111eb);
        x ^ (x >> 31)
    }
    mix(base ^ mix(index.wrapping_add(0x9e3779b97f4a7c15)))
}

/// Generate `count` alternative layouts in parallel, one thread per scheme.
///
/// Each scheme owns its random source. With a seed in `params` the whole set
/// is reproducible; without one every scheme draws its own.
pub fn generate_schemes(
    catalog: &[VenueType],
    boundary: &Boundary,
    params: &LayoutParams,
    count: usize,
) -> Result<Vec<Layout>, LayoutError> {
    validate_inputs(catalog, boundary, params)?;

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..count)
            .map(|index| {
                let mut scheme_params = params.clone();
                scheme_params.seed = params.seed.map(|s| scheme_seed(s, index as u64));
                scope.spawn(move || generate_layout(catalog, boundary, &scheme_params))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    })
}
