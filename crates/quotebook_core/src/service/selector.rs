//! Uniform random selection over a quote view.

use rand::Rng;

/// Picks one element uniformly from `view`.
///
/// Returns `None` for an empty view instead of failing.
pub fn pick_random<'a, T, R>(view: &'a [T], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    if view.is_empty() {
        return None;
    }
    view.get(rng.random_range(0..view.len()))
}

#[cfg(test)]
mod tests {
    use super::pick_random;
    use crate::model::quote::{seed_quotes, Quote};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn empty_view_yields_none() {
        let mut rng = StdRng::seed_from_u64(7);
        let view: Vec<Quote> = Vec::new();
        assert!(pick_random(&view, &mut rng).is_none());
    }

    #[test]
    fn picks_are_members_of_view() {
        let mut rng = StdRng::seed_from_u64(42);
        let view = seed_quotes();
        for _ in 0..200 {
            let picked = pick_random(&view, &mut rng).expect("non-empty view");
            assert!(view.contains(picked));
        }
    }

    #[test]
    fn every_index_is_reachable() {
        let mut rng = StdRng::seed_from_u64(1);
        let view = seed_quotes();
        let seen: HashSet<&str> = (0..500)
            .filter_map(|_| pick_random(&view, &mut rng))
            .map(|quote| quote.text.as_str())
            .collect();
        assert_eq!(seen.len(), view.len());
    }

    #[test]
    fn single_element_view_always_returns_it() {
        let mut rng = StdRng::seed_from_u64(3);
        let view = vec![Quote::new("only", "One")];
        assert_eq!(pick_random(&view, &mut rng), Some(&view[0]));
    }
}
