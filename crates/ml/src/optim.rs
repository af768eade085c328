use crate::tensor::Tensor;

/// Adam optimizer. Moment buffers are created on the first step and must
/// keep seeing parameters in the same order afterwards.
#[derive(Clone, Debug)]
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    t: u32,
    m: Vec<Vec<f32>>,
    v: Vec<Vec<f32>>,
}

impl Adam {
    #[must_use]
    pub fn new(lr: f32) -> Self {
        Self { lr, beta1: 0.9, beta2: 0.999, eps: 1e-7, t: 0, m: Vec::new(), v: Vec::new() }
    }

    /// Number of updates applied so far.
    #[must_use]
    pub fn steps(&self) -> u32 {
        self.t
    }

    /// Apply one update to each `(param, grad)` pair.
    pub fn step(&mut self, params: &mut [(&mut Tensor, &Tensor)]) {
        if self.m.is_empty() {
            self.m = params.iter().map(|(p, _)| vec![0.0; p.len()]).collect();
            self.v = params.iter().map(|(p, _)| vec![0.0; p.len()]).collect();
        }
        self.t += 1;
        #[allow(clippy::cast_possible_wrap)]
        let t = self.t as i32;
        let bias1 = 1.0 - self.beta1.powi(t);
        let bias2 = 1.0 - self.beta2.powi(t);
        for ((p, g), (m_vec, v_vec)) in params.iter_mut().zip(self.m.iter_mut().zip(self.v.iter_mut())) {
            for i in 0..p.len() {
                let gi = g.data[i];
                m_vec[i] = self.beta1 * m_vec[i] + (1.0 - self.beta1) * gi;
                v_vec[i] = self.beta2 * v_vec[i] + (1.0 - self.beta2) * gi * gi;
                let m_hat = m_vec[i] / bias1;
                let v_hat = v_vec[i] / bias2;
                p.data[i] -= self.lr * m_hat / (v_hat.sqrt() + self.eps);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_moves_by_learning_rate() {
        let mut p = Tensor::from_vec(vec![2], vec![1.0, -1.0]);
        let g = Tensor::from_vec(vec![2], vec![0.5, -3.0]);
        let mut adam = Adam::new(0.01);
        adam.step(&mut [(&mut p, &g)]);
        // With bias correction the first update is lr * sign(g).
        assert!((p.data[0] - 0.99).abs() < 1e-4);
        assert!((p.data[1] + 0.99).abs() < 1e-4);
        assert_eq!(adam.steps(), 1);
    }

    #[test]
    fn minimizes_a_quadratic() {
        let mut x = Tensor::from_vec(vec![1], vec![5.0]);
        let mut adam = Adam::new(0.1);
        for _ in 0..500 {
            let g = Tensor::from_vec(vec![1], vec![2.0 * x.data[0]]);
            adam.step(&mut [(&mut x, &g)]);
        }
        assert!(x.data[0].abs() < 0.5, "x = {}", x.data[0]);
    }
}
