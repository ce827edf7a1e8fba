use streamconv_core::{AddressSequencer, ExternalMemoryPort, ImageSize, MemoryError, Word};
use streamconv_kernel::{KernelEvaluator, KernelWeights};

use crate::{
    config::EngineConfig,
    error::EngineError,
    row_buffer::{Role, RowBuffer},
};

/// Counters collected during one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Distinct source words read.
    pub reads: usize,
    /// Destination words written.
    pub writes: usize,
    /// Reads re-issued after a fault.
    pub retries: usize,
    /// Source addresses whose sample was replaced by zero.
    pub faults: Vec<u32>,
}

impl RunReport {
    /// Whether every sample came from memory unaltered.
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Filters an image held in external memory one row at a time.
///
/// The engine keeps three rows of the source image in a [`RowBuffer`], reads the
/// source region strictly in raster order and writes the destination region strictly
/// in raster order, one row behind the reads.
///
/// # Examples
///
/// ```
/// use streamconv_core::ExternalRam;
/// use streamconv_engine::{ConvolutionEngine, EngineConfig};
/// use streamconv_kernel::{KernelWeights, LocalKernel};
///
/// let config = EngineConfig::default()
///     .with_size([2, 2].into())
///     .with_regions(0x0, 0x10)
///     .with_weights(KernelWeights::new(0, 0, 2));
///
/// let mut ram = ExternalRam::new(0x0, 8);
/// ram.load(0x0, &[1, 2, 3, 4]).unwrap();
///
/// let mut engine = ConvolutionEngine::new(config, LocalKernel::default()).unwrap();
/// let report = engine.run(&mut ram).unwrap();
///
/// assert_eq!(report.writes, 4);
/// assert_eq!(ram.dump(0x10, 4).unwrap(), vec![2, 4, 6, 8]);
/// ```
pub struct ConvolutionEngine<K: KernelEvaluator> {
    config: EngineConfig,
    kernel: K,
    rows: RowBuffer,
    out_row: Vec<Word>,
}

impl<K: KernelEvaluator> ConvolutionEngine<K> {
    /// Create an engine and load the configured weights into `kernel`.
    pub fn new(config: EngineConfig, mut kernel: K) -> Result<Self, EngineError> {
        config.validate()?;
        kernel.configure(config.weights)?;

        let width = config.size.width;
        Ok(Self {
            config,
            kernel,
            rows: RowBuffer::new(width),
            out_row: Vec::with_capacity(width),
        })
    }

    /// The configuration of the engine.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The kernel evaluator.
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Load new weights for the following passes.
    ///
    /// On error the previous weights remain in effect.
    pub fn set_weights(&mut self, weights: KernelWeights) -> Result<(), EngineError> {
        self.kernel.configure(weights)?;
        self.config.weights = weights;
        Ok(())
    }

    /// Filter the whole source region into the destination region.
    pub fn run<M: ExternalMemoryPort>(&mut self, memory: &mut M) -> Result<RunReport, EngineError> {
        let mut sequencer = AddressSequencer::new(self.config.word_stride);
        self.run_with(memory, &mut sequencer)
    }

    /// Filter the whole source region using caller-owned address cursors.
    ///
    /// Offsets handed out by `sequencer` are relative to the configured region
    /// bases, so a fresh sequencer covers the whole image. A cursor that has already
    /// handed out every word of its region fails with
    /// [`MemoryError::SequenceExhausted`] instead of leaving the region.
    pub fn run_with<M: ExternalMemoryPort>(
        &mut self,
        memory: &mut M,
        sequencer: &mut AddressSequencer,
    ) -> Result<RunReport, EngineError> {
        let ImageSize { width, height } = self.config.size;
        let mut report = RunReport::default();

        log::debug!(
            "filtering {} from {:#010x} into {:#010x}",
            self.config.size,
            self.config.source_base,
            self.config.dest_base
        );

        self.rows.reset();
        self.kernel.reset();

        // the first image row has no row above to borrow borders from
        for slot in self.rows.bootstrap_slots() {
            let word = self.fetch(memory, sequencer, &mut report)?;
            self.rows.set(Role::Cur, slot, word);
        }

        for row in 0..height {
            let loaded = row + 1;
            if loaded < height {
                for slot in self.rows.begin_next(loaded, height) {
                    let word = self.fetch(memory, sequencer, &mut report)?;
                    self.rows.set(Role::Next, slot, word);
                }
                self.rows.finish_next();
            } else {
                self.rows.clear_next();
            }

            self.out_row.clear();
            for col in 1..=width {
                let window = self.rows.window(col);
                self.out_row.push(self.kernel.evaluate(&window)?);
            }

            for &word in self.out_row.iter() {
                self.emit(memory, sequencer, &mut report, word)?;
            }

            log::trace!("row {row} written");
            self.rows.rotate();
        }

        if !report.is_clean() {
            log::warn!(
                "{} of {} samples were substituted after read faults",
                report.faults.len(),
                report.reads
            );
        }
        log::debug!(
            "pass finished: {} reads, {} writes, {} retries",
            report.reads,
            report.writes,
            report.retries
        );

        Ok(report)
    }

    // read the next source word, retrying and resolving faults per the config
    fn fetch<M: ExternalMemoryPort>(
        &self,
        memory: &mut M,
        sequencer: &mut AddressSequencer,
        report: &mut RunReport,
    ) -> Result<Word, EngineError> {
        let limit = self.config.region_words();
        if sequencer.read_cursor().consumed() >= limit {
            return Err(MemoryError::SequenceExhausted { limit }.into());
        }

        let addr = self.config.source_base + sequencer.next_read();
        report.reads += 1;

        let mut attempts = 0;
        loop {
            match memory.read(addr) {
                Err(MemoryError::Fault { .. }) if attempts < self.config.read_retries => {
                    attempts += 1;
                    report.retries += 1;
                    log::debug!("read fault at {addr:#010x}, retry {attempts}");
                    sequencer.rewind_read()?;
                    sequencer.next_read();
                }
                result => {
                    let faulted = matches!(result, Err(MemoryError::Fault { .. }));
                    let word = self.config.fault_policy.resolve(result)?;
                    if faulted {
                        report.faults.push(addr);
                    }
                    return Ok(word);
                }
            }
        }
    }

    fn emit<M: ExternalMemoryPort>(
        &self,
        memory: &mut M,
        sequencer: &mut AddressSequencer,
        report: &mut RunReport,
        word: Word,
    ) -> Result<(), EngineError> {
        let limit = self.config.region_words();
        if sequencer.write_cursor().consumed() >= limit {
            return Err(MemoryError::SequenceExhausted { limit }.into());
        }

        memory.write(self.config.dest_base + sequencer.next_write(), word);
        report.writes += 1;
        Ok(())
    }
}

impl ConvolutionEngine<Box<dyn KernelEvaluator>> {
    /// Create an engine whose kernel evaluator is chosen by `config.backend`.
    pub fn from_config(config: EngineConfig) -> Result<Self, EngineError> {
        let kernel = config.backend.build();
        Self::new(config, kernel)
    }
}
