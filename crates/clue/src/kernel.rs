/// A weighting function of the distance between two points, applied to
/// the neighbor's weight when accumulating local density.
///
/// The set of kernels is closed; each variant is pure and carries only
/// its parameters. The ids of the two points are part of the signature
/// so that a kernel may distinguish self-interaction, none of the
/// built-in variants does.
///
/// A `sigma` of zero is a caller error.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConvolutionKernel {
    /// A constant weight at every distance; density becomes a weighted
    /// neighbor count.
    Flat { value: f32 },
    /// `amplitude * exp(-(d - mean)^2 / (2 sigma^2))`
    Gaussian {
        amplitude: f32,
        mean: f32,
        sigma: f32,
    },
    /// `amplitude * exp(-|d - mean| / sigma)`
    Exponential {
        amplitude: f32,
        mean: f32,
        sigma: f32,
    },
}

impl ConvolutionKernel {
    pub fn flat(value: f32) -> Self {
        Self::Flat { value }
    }

    pub fn gaussian(amplitude: f32, mean: f32, sigma: f32) -> Self {
        Self::Gaussian {
            amplitude,
            mean,
            sigma,
        }
    }

    pub fn exponential(amplitude: f32, mean: f32, sigma: f32) -> Self {
        Self::Exponential {
            amplitude,
            mean,
            sigma,
        }
    }

    #[inline]
    pub fn weight(&self, dist: f32, _i: u32, _j: u32) -> f32 {
        match *self {
            Self::Flat { value } => value,
            Self::Gaussian {
                amplitude,
                mean,
                sigma,
            } => amplitude * (-(dist - mean) * (dist - mean) / (2.0 * sigma * sigma)).exp(),
            Self::Exponential {
                amplitude,
                mean,
                sigma,
            } => amplitude * (-(dist - mean).abs() / sigma).exp(),
        }
    }
}

impl Default for ConvolutionKernel {
    fn default() -> Self {
        Self::gaussian(1.0, 0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_ignores_the_distance() {
        let kernel = ConvolutionKernel::flat(0.5);

        assert_eq!(kernel.weight(0.0, 0, 0), 0.5);
        assert_eq!(kernel.weight(123.4, 0, 1), 0.5);
    }

    #[test]
    fn gaussian_peaks_at_the_mean() {
        let kernel = ConvolutionKernel::gaussian(2.0, 1.0, 0.5);

        assert!((kernel.weight(1.0, 0, 1) - 2.0).abs() < 1e-6);
        assert!(kernel.weight(0.0, 0, 1) < kernel.weight(1.0, 0, 1));
        assert!(kernel.weight(2.0, 0, 1) < kernel.weight(1.0, 0, 1));
    }

    #[test]
    fn exponential_decays_symmetrically() {
        let kernel = ConvolutionKernel::exponential(1.0, 1.0, 2.0);

        let below = kernel.weight(0.5, 0, 1);
        let above = kernel.weight(1.5, 0, 1);
        assert!((below - above).abs() < 1e-6);
        assert!((kernel.weight(1.0, 0, 1) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn default_is_a_unit_gaussian() {
        let kernel = ConvolutionKernel::default();

        assert!((kernel.weight(0.0, 3, 3) - 1.0).abs() < 1e-6);
        assert!((kernel.weight(1.0, 0, 1) - (-0.5_f32).exp()).abs() < 1e-6);
    }
}
