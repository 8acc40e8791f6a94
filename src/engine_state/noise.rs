//! # Noise Module
//!
//! Deterministic fractal noise used by every terrain generation stage.
//!
//! A [`NoiseGenerator`] layers several octaves of a coherent noise primitive
//! (fractal Brownian motion). Each octave is remapped from the primitive's native
//! `[-1, 1]` range into `[0, 1]` before being accumulated, so the normalized sum is
//! always in `[0, 1]` and can be safely raised to the configured exponent.
//!
//! The 2D field samples the configured primitive. The 3D field used for resource veins
//! always samples Simplex, whatever the configured variant.
//!
//! The same configuration and coordinates always produce the same output. Terrain
//! reproducibility from a seed depends on this.

use noise::{NoiseFn, Perlin, Simplex};
use serde::{Deserialize, Serialize};

/// The coherent noise primitive sampled by each octave of the 2D field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoiseVariant {
    /// Classic gradient noise.
    #[default]
    Perlin,
    /// Simplex noise.
    Simplex,
}

/// Parameters of a fractal noise sampler.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoiseConfig {
    /// Divisor applied to every input coordinate before the first octave.
    pub scale: f64,
    /// Number of layered octaves.
    pub octaves: u32,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Exponent applied to the normalized sum.
    pub exponentiation: f64,
    /// Final multiplier applied after exponentiation.
    pub height: f64,
    /// Seed of the underlying primitive.
    pub seed: u32,
    /// Which primitive to sample.
    pub variant: NoiseVariant,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            octaves: 10,
            persistence: 0.5,
            lacunarity: 1.3,
            exponentiation: 3.9,
            height: 8.0,
            seed: 0,
            variant: NoiseVariant::Perlin,
        }
    }
}

/// A seeded instance of one of the supported primitives.
enum NoisePrimitive {
    Perlin(Perlin),
    Simplex(Simplex),
}

impl NoisePrimitive {
    fn new(variant: NoiseVariant, seed: u32) -> Self {
        match variant {
            NoiseVariant::Perlin => NoisePrimitive::Perlin(Perlin::new(seed)),
            NoiseVariant::Simplex => NoisePrimitive::Simplex(Simplex::new(seed)),
        }
    }

    fn get_2d(&self, point: [f64; 2]) -> f64 {
        match self {
            NoisePrimitive::Perlin(perlin) => perlin.get(point),
            NoisePrimitive::Simplex(simplex) => simplex.get(point),
        }
    }
}

/// Fractal Brownian motion sampler over a seeded noise primitive.
pub struct NoiseGenerator {
    config: NoiseConfig,
    primitive: NoisePrimitive,
    volume: Simplex,
}

impl NoiseGenerator {
    /// Builds a generator for the given configuration.
    ///
    /// The primitive's permutation tables are built once here, so a generator should be
    /// reused for every sample of a generation pass.
    pub fn new(config: NoiseConfig) -> Self {
        Self {
            primitive: NoisePrimitive::new(config.variant, config.seed),
            volume: Simplex::new(config.seed),
            config,
        }
    }

    /// Returns the configuration this generator was built from.
    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// Samples the 2D fractal noise field at `(x, y)`.
    ///
    /// # Returns
    /// A value in `[0, height]`.
    pub fn sample_2d(&self, x: f64, y: f64) -> f64 {
        let xs = x / self.config.scale;
        let ys = y / self.config.scale;
        self.accumulate(|frequency| self.primitive.get_2d([xs * frequency, ys * frequency]))
    }

    /// Samples the 3D fractal Simplex field at `(x, y, z)`.
    ///
    /// # Returns
    /// A value in `[0, height]`.
    pub fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let xs = x / self.config.scale;
        let ys = y / self.config.scale;
        let zs = z / self.config.scale;
        self.accumulate(|frequency| {
            self.volume
                .get([xs * frequency, ys * frequency, zs * frequency])
        })
    }

    fn accumulate<F>(&self, sample: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut normalization = 0.0;
        let mut total = 0.0;

        for _ in 0..self.config.octaves {
            // Remap [-1, 1] into [0, 1]; the clamp keeps powf away from negative bases.
            let value = (sample(frequency) * 0.5 + 0.5).clamp(0.0, 1.0);
            total += value * amplitude;
            normalization += amplitude;
            amplitude *= self.config.persistence;
            frequency *= self.config.lacunarity;
        }

        if normalization == 0.0 {
            return 0.0;
        }

        (total / normalization).powf(self.config.exponentiation) * self.config.height
    }
}
