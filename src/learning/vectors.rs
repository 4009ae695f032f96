//! Fixed-length weight and feature vectors. Every operation returns a new vector.

pub type Vector = Vec<f64>;

fn zip_with(a: &[f64], b: &[f64], op: impl Fn(f64, f64) -> f64) -> Vector {
    assert_eq!(a.len(), b.len(), "vector length mismatch");
    a.iter().zip(b).map(|(&x, &y)| op(x, y)).collect()
}

pub fn sum(a: &[f64], b: &[f64]) -> Vector {
    zip_with(a, b, |x, y| x + y)
}

pub fn diff(a: &[f64], b: &[f64]) -> Vector {
    zip_with(a, b, |x, y| x - y)
}

pub fn scale(v: &[f64], k: f64) -> Vector {
    v.iter().map(|x| k * x).collect()
}

pub fn norm2(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// `v / norm(v)`, left unchanged when the norm is 0.
pub fn normalize(v: &[f64], norm: impl Fn(&[f64]) -> f64) -> Vector {
    let mut n = norm(v);
    if n == 0.0 {
        n = 1.0;
    }
    v.iter().map(|x| x / n).collect()
}

/// Elementwise mean. The mean of no vectors is the empty vector.
pub fn avg(vectors: &[Vector]) -> Vector {
    let Some(first) = vectors.first() else {
        return Vector::new();
    };
    let mut total = vec![0.0; first.len()];
    for v in vectors {
        total = sum(&total, v);
    }
    scale(&total, 1.0 / vectors.len() as f64)
}

pub fn equals(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}
