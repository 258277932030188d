//! Statistical helpers over plain slices.

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0.0 for fewer than two values.
pub fn std_deviation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Position and value of the smallest element, ignoring holes.
///
/// Ties resolve to the earliest position.
pub fn argmin<I>(values: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values
        .into_iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .fold(None, |best, (i, v)| match best {
            Some((_, b)) if b <= v => best,
            _ => Some((i, v)),
        })
}

/// Largest element, ignoring holes.
pub fn max_present<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().flatten().fold(None, |best, v| match best {
        Some(b) if b >= v => Some(b),
        _ => Some(v),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[1.0, 2.0, 3.0]) - 2.0).abs() < 1e-12);
        assert_eq!(std_deviation(&[4.0]), 0.0);
        // Population standard deviation
        assert!((std_deviation(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_argmin_skips_holes_and_keeps_position() {
        let values = vec![None, Some(0.5), None, Some(0.2), Some(0.2), None];
        assert_eq!(argmin(values), Some((3, 0.2)));
        assert_eq!(argmin(vec![None, None]), None);
    }

    #[test]
    fn test_max_present() {
        assert_eq!(max_present(vec![None, Some(3.0), Some(7.0), None]), Some(7.0));
        assert_eq!(max_present(Vec::<Option<f64>>::new()), None);
    }
}
