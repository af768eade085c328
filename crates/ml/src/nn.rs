//! Layers with hand-written backward passes.
//!
//! Every layer works on a single sample: `forward` takes a rank-1 input and
//! `backward` returns the gradient with respect to that input plus one
//! gradient per parameter, in the same order as [`Layer::params`].

use crate::error::MlError;
use crate::params::NetworkParams;
use crate::tensor::Tensor;

/// A differentiable layer.
pub trait Layer: Send {
    fn forward(&self, x: &Tensor) -> Tensor;
    fn backward(&self, x: &Tensor, grad: &Tensor) -> (Tensor, Vec<Tensor>);
    fn params(&self) -> Vec<&Tensor> {
        Vec::new()
    }
    fn params_mut(&mut self) -> Vec<&mut Tensor> {
        Vec::new()
    }
}

/// A fully connected layer computing `w · x + b`.
#[derive(Clone, Debug)]
pub struct Dense {
    /// Weight matrix, shape `[out_dim, in_dim]`.
    pub w: Tensor,
    /// Bias vector, shape `[out_dim]`.
    pub b: Tensor,
    in_dim: usize,
    out_dim: usize,
}

impl Dense {
    /// Layer from row-major `out_dim x in_dim` weights and a bias per output.
    ///
    /// # Panics
    ///
    /// Panics if `weights` or `bias` do not match the given dimensions.
    pub fn new(weights: Vec<f32>, bias: Vec<f32>, in_dim: usize, out_dim: usize) -> Self {
        assert_eq!(weights.len(), in_dim * out_dim);
        assert_eq!(bias.len(), out_dim);
        Self {
            w: Tensor::from_vec(vec![out_dim, in_dim], weights),
            b: Tensor::from_vec(vec![out_dim], bias),
            in_dim,
            out_dim,
        }
    }

    /// Glorot-uniform weights, zero bias.
    pub fn xavier(in_dim: usize, out_dim: usize, rng: &mut fastrand::Rng) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let limit = (6.0f32 / (in_dim + out_dim) as f32).sqrt();
        let weights: Vec<f32> = (0..in_dim * out_dim)
            .map(|_| rng.f32() * 2.0 * limit - limit)
            .collect();
        Self::new(weights, vec![0.0; out_dim], in_dim, out_dim)
    }
}

impl Layer for Dense {
    fn forward(&self, x: &Tensor) -> Tensor {
        debug_assert_eq!(x.len(), self.in_dim);
        let mut y = self.b.data.clone();
        for (o, out) in y.iter_mut().enumerate() {
            let row = &self.w.data[o * self.in_dim..(o + 1) * self.in_dim];
            *out += row.iter().zip(&x.data).map(|(w, v)| w * v).sum::<f32>();
        }
        Tensor::from_vec(vec![self.out_dim], y)
    }

    fn backward(&self, x: &Tensor, grad: &Tensor) -> (Tensor, Vec<Tensor>) {
        let mut grad_input = vec![0.0; self.in_dim];
        let mut grad_w = vec![0.0; self.in_dim * self.out_dim];
        for o in 0..self.out_dim {
            let go = grad.data[o];
            if go == 0.0 {
                continue;
            }
            for i in 0..self.in_dim {
                grad_w[o * self.in_dim + i] = go * x.data[i];
                grad_input[i] += self.w.data[o * self.in_dim + i] * go;
            }
        }
        (
            Tensor::from_vec(vec![self.in_dim], grad_input),
            vec![
                Tensor::from_vec(vec![self.out_dim, self.in_dim], grad_w),
                Tensor::from_vec(vec![self.out_dim], grad.data.clone()),
            ],
        )
    }

    fn params(&self) -> Vec<&Tensor> {
        vec![&self.w, &self.b]
    }

    fn params_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.w, &mut self.b]
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Relu;

impl Layer for Relu {
    fn forward(&self, x: &Tensor) -> Tensor {
        let data = x.data.iter().map(|&v| v.max(0.0)).collect();
        Tensor::from_vec(x.shape.clone(), data)
    }

    fn backward(&self, x: &Tensor, grad: &Tensor) -> (Tensor, Vec<Tensor>) {
        let data = x
            .data
            .iter()
            .zip(&grad.data)
            .map(|(&v, &g)| if v > 0.0 { g } else { 0.0 })
            .collect();
        (Tensor::from_vec(x.shape.clone(), data), Vec::new())
    }
}

/// A stack of layers applied in order.
#[derive(Default)]
pub struct Sequential {
    layers: Vec<Box<dyn Layer>>,
}

impl Sequential {
    #[must_use]
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Fully connected network: `Dense` layers of the given widths with a
    /// ReLU between each pair and a linear output.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two widths are given.
    pub fn mlp(widths: &[usize], rng: &mut fastrand::Rng) -> Self {
        assert!(widths.len() >= 2, "an MLP needs an input and an output width");
        let mut net = Self::new();
        let last = widths.len() - 2;
        for (i, pair) in widths.windows(2).enumerate() {
            net.push(Dense::xavier(pair[0], pair[1], rng));
            if i < last {
                net.push(Relu);
            }
        }
        net
    }

    pub fn push<L: Layer + 'static>(&mut self, layer: L) {
        self.layers.push(Box::new(layer));
    }

    /// Run the network, returning the output and every intermediate
    /// activation (input first) for a later [`Sequential::backward`].
    pub fn forward(&self, x: &Tensor) -> (Tensor, Vec<Tensor>) {
        let mut out = x.clone();
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        activations.push(out.clone());
        for layer in &self.layers {
            out = layer.forward(&out);
            activations.push(out.clone());
        }
        (out, activations)
    }

    /// Output only, without keeping activations.
    pub fn predict(&self, x: &Tensor) -> Tensor {
        self.layers.iter().fold(x.clone(), |out, layer| layer.forward(&out))
    }

    /// Backpropagate `grad` (gradient of the loss w.r.t. the output).
    ///
    /// Parameter gradients come back in the same order as [`Sequential::params`].
    pub fn backward(&self, activations: &[Tensor], grad: &Tensor) -> (Tensor, Vec<Tensor>) {
        let mut grad_out = grad.clone();
        let mut per_layer = Vec::with_capacity(self.layers.len());
        for (layer, activation) in self.layers.iter().rev().zip(activations.iter().rev().skip(1)) {
            let (g_in, p) = layer.backward(activation, &grad_out);
            grad_out = g_in;
            per_layer.push(p);
        }
        let param_grads = per_layer.into_iter().rev().flatten().collect();
        (grad_out, param_grads)
    }

    pub fn params(&self) -> Vec<&Tensor> {
        let mut out = Vec::new();
        for layer in &self.layers {
            out.extend(layer.params());
        }
        out
    }

    pub fn params_mut(&mut self) -> Vec<&mut Tensor> {
        let mut out = Vec::new();
        for layer in &mut self.layers {
            out.extend(layer.params_mut());
        }
        out
    }

    /// Zero tensors shaped like every parameter, for gradient accumulation.
    #[must_use]
    pub fn zero_grads(&self) -> Vec<Tensor> {
        self.params().iter().map(|p| Tensor::zeros(p.shape.clone())).collect()
    }

    /// Overwrite this network's parameters in place with `other`'s.
    ///
    /// # Errors
    ///
    /// Returns [`MlError::ShapeMismatch`] if the architectures differ; no
    /// parameter is touched in that case.
    pub fn copy_params_from(&mut self, other: &Sequential) -> Result<(), MlError> {
        check_shapes(&self.params(), &other.params())?;
        for (dst, src) in self.params_mut().into_iter().zip(other.params()) {
            dst.data.copy_from_slice(&src.data);
        }
        Ok(())
    }

    /// Serializable copy of every parameter.
    #[must_use]
    pub fn export_params(&self) -> NetworkParams {
        NetworkParams::from_tensors(&self.params())
    }

    /// Load parameters produced by [`Sequential::export_params`].
    ///
    /// # Errors
    ///
    /// Returns [`MlError::ShapeMismatch`] if `params` was exported from a
    /// different architecture; no parameter is touched in that case.
    pub fn import_params(&mut self, params: &NetworkParams) -> Result<(), MlError> {
        params.check_against(&self.params())?;
        for (dst, src) in self.params_mut().into_iter().zip(&params.tensors) {
            dst.data.copy_from_slice(&src.data);
        }
        Ok(())
    }
}

fn check_shapes(ours: &[&Tensor], theirs: &[&Tensor]) -> Result<(), MlError> {
    let a: Vec<&[usize]> = ours.iter().map(|t| t.shape.as_slice()).collect();
    let b: Vec<&[usize]> = theirs.iter().map(|t| t.shape.as_slice()).collect();
    if a == b {
        Ok(())
    } else {
        Err(MlError::ShapeMismatch { expected: format!("{a:?}"), got: format!("{b:?}") })
    }
}
