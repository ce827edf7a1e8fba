use serde::{Deserialize, Serialize};
use streamconv_core::{FaultPolicy, ImageSize, WORD_STRIDE};
use streamconv_kernel::{KernelBackend, KernelWeights};

use crate::error::EngineError;

/// Configuration of one convolution pass.
///
/// The engine and the owner of the memory agree on the image size and on the two
/// region bases out of band; nothing about the layout is stored in memory.
///
/// # Examples
///
/// ```
/// use streamconv_core::FaultPolicy;
/// use streamconv_engine::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_size([4, 4].into())
///     .with_regions(0x0, 0x40)
///     .with_fault_policy(FaultPolicy::Propagate);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Size of the source and destination images.
    pub size: ImageSize,
    /// Distance in bytes between consecutive words.
    pub word_stride: u32,
    /// Address of the first source pixel.
    pub source_base: u32,
    /// Address of the first destination pixel.
    pub dest_base: u32,
    /// Kernel weights loaded before streaming begins.
    pub weights: KernelWeights,
    /// Where the weighted sum is computed.
    pub backend: KernelBackend,
    /// What to do with a read that still faults after all retries.
    pub fault_policy: FaultPolicy,
    /// How many times a faulting read is rewound and re-issued.
    pub read_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: ImageSize {
                width: 32,
                height: 32,
            },
            word_stride: WORD_STRIDE,
            source_base: 0x0,
            dest_base: 0x1000,
            weights: KernelWeights::LAPLACIAN,
            backend: KernelBackend::Local,
            fault_policy: FaultPolicy::ZeroSubstitute,
            read_retries: 0,
        }
    }
}

impl EngineConfig {
    /// Set the image size.
    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = size;
        self
    }

    /// Set the source and destination region bases.
    pub fn with_regions(mut self, source_base: u32, dest_base: u32) -> Self {
        self.source_base = source_base;
        self.dest_base = dest_base;
        self
    }

    /// Set the word stride.
    pub fn with_word_stride(mut self, word_stride: u32) -> Self {
        self.word_stride = word_stride;
        self
    }

    /// Set the kernel weights.
    pub fn with_weights(mut self, weights: KernelWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the kernel backend.
    pub fn with_backend(mut self, backend: KernelBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the fault policy.
    pub fn with_fault_policy(mut self, fault_policy: FaultPolicy) -> Self {
        self.fault_policy = fault_policy;
        self
    }

    /// Set the number of read retries.
    pub fn with_read_retries(mut self, read_retries: u32) -> Self {
        self.read_retries = read_retries;
        self
    }

    /// Number of words in each of the two regions.
    pub fn region_words(&self) -> usize {
        self.size.num_pixels()
    }

    /// Check that the configuration describes a pass that can be addressed.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.size.width == 0 || self.size.height == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "image must not be empty, got {}",
                self.size
            )));
        }
        if self.word_stride == 0 {
            return Err(EngineError::InvalidConfig(
                "word stride must not be zero".to_string(),
            ));
        }

        let region_bytes = u32::try_from(self.region_words())
            .ok()
            .and_then(|words| words.checked_mul(self.word_stride))
            .ok_or_else(|| {
                EngineError::InvalidConfig(format!("{} does not fit in 32-bit memory", self.size))
            })?;

        for (name, base) in [("source", self.source_base), ("destination", self.dest_base)] {
            if base.checked_add(region_bytes).is_none() {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} region at {base:#010x} overflows the address space"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_reference_layout() -> Result<(), EngineError> {
        let config = EngineConfig::default();
        config.validate()?;
        assert_eq!(config.region_words(), 1024);
        assert_eq!(config.dest_base, config.region_words() as u32 * config.word_stride);
        assert_eq!(config.weights, KernelWeights::new(0, 1, -4));
        Ok(())
    }

    #[test]
    fn validate_rejects_bad_layouts() {
        let empty = EngineConfig::default().with_size([0, 4].into());
        assert!(matches!(empty.validate(), Err(EngineError::InvalidConfig(_))));

        let no_stride = EngineConfig::default().with_word_stride(0);
        assert!(no_stride.validate().is_err());

        let overflow = EngineConfig::default().with_regions(0, u32::MAX - 16);
        assert!(overflow.validate().is_err());

        let huge = EngineConfig::default().with_size([1 << 16, 1 << 16].into());
        assert!(huge.validate().is_err());
    }

    #[test]
    fn deserialize_partial_json() -> Result<(), serde_json::Error> {
        let config: EngineConfig = serde_json::from_str(
            r#"{
                "size": { "width": 8, "height": 2 },
                "weights": { "w1": 1, "w2": 2, "w3": 3 },
                "backend": "Accelerator",
                "fault_policy": "Propagate"
            }"#,
        )?;
        assert_eq!(config.size, [8, 2].into());
        assert_eq!(config.weights, KernelWeights::new(1, 2, 3));
        assert_eq!(config.backend, KernelBackend::Accelerator);
        assert_eq!(config.fault_policy, FaultPolicy::Propagate);
        assert_eq!(config.dest_base, 0x1000);
        assert_eq!(config.read_retries, 0);
        Ok(())
    }
}
