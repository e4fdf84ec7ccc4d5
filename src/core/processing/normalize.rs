use ndarray::{Array, ArrayBase, Data, Dimension};

/// Denominator used when a tensor is constant, so the result is all zeros
/// instead of a division by zero.
pub const CONSTANT_DENOMINATOR: f32 = 1e5;

fn min_max<S, D>(x: &ArrayBase<S, D>) -> Option<(f32, f32)>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    if x.is_empty() {
        return None;
    }
    Some(x.fold((f32::INFINITY, f32::NEG_INFINITY), |(mi, ma), &v| {
        (mi.min(v), ma.max(v))
    }))
}

/// Rescale values to span `[0, 1]`: `(x - min) / (max - min)`.
pub fn normalize_image<S, D>(x: &ArrayBase<S, D>) -> Array<f32, D>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    let mut out = x.to_owned();
    let Some((mi, ma)) = min_max(x) else {
        return out;
    };
    let d = if ma != mi { ma - mi } else { CONSTANT_DENOMINATOR };
    out.par_mapv_inplace(|v| (v - mi) / d);
    out
}

/// Normalize and quantize to 8 bits for saving visualizations.
pub fn to_u8_preview<S, D>(x: &ArrayBase<S, D>) -> Array<u8, D>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    normalize_image(x).mapv(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use ndarray::{Array1, Array2, array};

    use super::*;

    #[test]
    fn spans_unit_range() {
        let x = array![[-2.0f32, 0.0], [2.0, 6.0]];
        let n = normalize_image(&x);
        assert_eq!(n, array![[0.0f32, 0.25], [0.5, 1.0]]);
    }

    #[test]
    fn constant_tensor_maps_to_zero() {
        let x = Array2::<f32>::from_elem((3, 4), 7.5);
        let n = normalize_image(&x);
        assert!(n.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn empty_tensor_stays_empty() {
        let x = Array1::<f32>::zeros(0);
        assert!(normalize_image(&x).is_empty());
    }

    #[test]
    fn works_on_views() {
        let x = array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 9.0]];
        let n = normalize_image(&x.row(0));
        assert_eq!(n, array![0.0f32, 0.5, 1.0]);
    }

    #[test]
    fn preview_quantizes_to_full_range() {
        let x = array![10.0f32, 15.0, 20.0];
        assert_eq!(to_u8_preview(&x), array![0u8, 128, 255]);
    }
}
