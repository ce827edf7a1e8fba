use streamconv_core::Word;

use crate::{
    error::KernelError,
    evaluator::KernelEvaluator,
    weights::{KernelWeights, ACCELERATOR_WEIGHT_RANGE},
    window::Window,
};

/// Number of samples pushed per filtered pixel.
pub const SAMPLES_PER_PIXEL: usize = 9;

/// Register-level interface of a fixed-function filter unit.
///
/// The unit is configured once with three weights. Each pixel is then computed by
/// pushing the nine samples of its window in row-major order and pulling exactly one
/// result before the next window is pushed.
pub trait Accelerator {
    /// Load the three weights.
    ///
    /// Each weight is range-checked; if any is rejected none of them is applied.
    fn set_kernel(&mut self, w1: i32, w2: i32, w3: i32) -> Result<(), KernelError>;

    /// Push one sample of the current window.
    fn push(&mut self, word: Word) -> Result<(), KernelError>;

    /// Pull the result of the last complete window.
    fn pull(&mut self) -> Result<Word, KernelError>;

    /// Discard pushed samples and any unpulled result, keeping the weights.
    fn reset(&mut self);
}

/// Software model of the filter unit.
///
/// Weights are held in 4-bit signed registers. Pushes beyond a complete window and
/// pulls before one are rejected.
#[derive(Debug, Clone, Default)]
pub struct EmulatedAccelerator {
    weights: Option<[i8; 3]>,
    fifo: Vec<Word>,
    result: Option<Word>,
}

impl EmulatedAccelerator {
    /// Create an unconfigured unit.
    pub fn new() -> Self {
        Self {
            weights: None,
            fifo: Vec::with_capacity(SAMPLES_PER_PIXEL),
            result: None,
        }
    }

    /// Samples pushed for the window in progress.
    pub fn pending(&self) -> usize {
        self.fifo.len()
    }

    fn compute(&self, weights: [i8; 3]) -> Word {
        let [a, b, c] = weights.map(|w| w as i32 as Word);
        let taps = [a, b, a, b, c, b, a, b, a];
        self.fifo
            .iter()
            .zip(taps)
            .fold(0, |acc: Word, (&p, w)| acc.wrapping_add(p.wrapping_mul(w)))
    }
}

impl Accelerator for EmulatedAccelerator {
    fn set_kernel(&mut self, w1: i32, w2: i32, w3: i32) -> Result<(), KernelError> {
        KernelWeights::new(w1, w2, w3).validate(&ACCELERATOR_WEIGHT_RANGE)?;
        // the range check above guarantees the casts are lossless
        self.weights = Some([w1 as i8, w2 as i8, w3 as i8]);
        Ok(())
    }

    fn push(&mut self, word: Word) -> Result<(), KernelError> {
        let weights = self.weights.ok_or(KernelError::NotConfigured)?;
        if self.result.is_some() {
            return Err(KernelError::FifoOverflow);
        }
        self.fifo.push(word);
        if self.fifo.len() == SAMPLES_PER_PIXEL {
            self.result = Some(self.compute(weights));
            self.fifo.clear();
        }
        Ok(())
    }

    fn pull(&mut self) -> Result<Word, KernelError> {
        self.result.take().ok_or(KernelError::FifoUnderflow {
            pushed: self.fifo.len(),
        })
    }

    fn reset(&mut self) {
        self.fifo.clear();
        self.result = None;
    }
}

/// A [`KernelEvaluator`] that delegates every window to an [`Accelerator`].
#[derive(Debug, Clone)]
pub struct AcceleratedKernel<A: Accelerator> {
    device: A,
}

impl<A: Accelerator> AcceleratedKernel<A> {
    /// Wrap an accelerator.
    pub fn new(device: A) -> Self {
        Self { device }
    }

    /// The wrapped accelerator.
    pub fn device(&self) -> &A {
        &self.device
    }

    /// Release the wrapped accelerator.
    pub fn into_inner(self) -> A {
        self.device
    }
}

impl<A: Accelerator> KernelEvaluator for AcceleratedKernel<A> {
    fn configure(&mut self, weights: KernelWeights) -> Result<(), KernelError> {
        log::debug!("loading accelerator weights {:?}", weights.as_array());
        self.device.set_kernel(weights.w1, weights.w2, weights.w3)
    }

    fn evaluate(&mut self, window: &Window) -> Result<Word, KernelError> {
        let result = window
            .to_row_major()
            .into_iter()
            .try_for_each(|sample| self.device.push(sample))
            .and_then(|()| self.device.pull());

        // a failed window must not leak samples into the next one
        if let Err(err) = &result {
            log::debug!("accelerator window failed, resetting: {err}");
            self.device.reset();
        }
        result
    }

    fn reset(&mut self) {
        self.device.reset();
    }
}
