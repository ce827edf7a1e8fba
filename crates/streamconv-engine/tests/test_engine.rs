use rand::Rng;
use streamconv_core::{AccessKind, ExternalRam, Word};
use streamconv_engine::{ConvolutionEngine, EngineConfig, EngineError};
use streamconv_kernel::{
    AcceleratedKernel, EmulatedAccelerator, KernelBackend, KernelWeights, LocalKernel,
    ACCELERATOR_WEIGHT_RANGE,
};

// Filters `src` with the local kernel and returns the destination region.
fn filter(
    width: usize,
    height: usize,
    src: &[Word],
    weights: KernelWeights,
    faults: &[usize],
) -> Result<Vec<Word>, EngineError> {
    let words = width * height;
    let config = EngineConfig::default()
        .with_size([width, height].into())
        .with_regions(0x0, 4 * words as u32)
        .with_weights(weights);

    let mut ram = ExternalRam::new(0x0, 2 * words);
    ram.load(0x0, src)?;
    for &index in faults {
        ram.inject_fault(4 * index as u32);
    }

    let mut engine = ConvolutionEngine::new(config, LocalKernel::default())?;
    engine.run(&mut ram)?;
    Ok(ram.dump(4 * words as u32, words)?)
}

// Pixel of the image seen as one raster strip with a zero row above and below.
fn strip_pixel(src: &[Word], width: usize, height: usize, row: isize, col: isize) -> Word {
    let (w, h) = (width as isize, height as isize);
    if row < 0 || row >= h {
        return 0;
    }
    if (0..w).contains(&col) {
        return src[(row * w + col) as usize];
    }
    if col < 0 {
        if row == 0 {
            0
        } else {
            src[((row - 1) * w + w - 1) as usize]
        }
    } else if row == 0 || row == h - 1 {
        0
    } else {
        src[((row + 1) * w) as usize]
    }
}

fn reference(width: usize, height: usize, src: &[Word], weights: KernelWeights) -> Vec<Word> {
    let matrix = weights.to_matrix();
    let mut dst = Vec::with_capacity(width * height);
    for r in 0..height as isize {
        for c in 0..width as isize {
            let mut acc: Word = 0;
            for (dr, taps) in matrix.iter().enumerate() {
                for (dc, &tap) in taps.iter().enumerate() {
                    let p = strip_pixel(src, width, height, r + dr as isize - 1, c + dc as isize - 1);
                    acc = acc.wrapping_add(p.wrapping_mul(tap as Word));
                }
            }
            dst.push(acc);
        }
    }
    dst
}

fn as_signed(words: &[Word]) -> Vec<i32> {
    words.iter().map(|&w| w as i32).collect()
}

#[test]
fn laplacian_4x4_ramp() -> Result<(), EngineError> {
    let src = (0..16).collect::<Vec<_>>();
    let dst = filter(4, 4, &src, KernelWeights::new(0, 1, -4), &[])?;

    #[rustfmt::skip]
    assert_eq!(
        as_signed(&dst),
        vec![
            5, 3, 2, -3,
            0, 0, 0, 0,
            0, 0, 0, 0,
            -16, -17, -18, -35,
        ]
    );
    // negative results are stored as two's-complement words
    assert_eq!(dst[15], 0xffff_ffdd);
    Ok(())
}

#[test]
fn box_4x4_ramp_borders() -> Result<(), EngineError> {
    let src = (0..16).collect::<Vec<_>>();
    let dst = filter(4, 4, &src, KernelWeights::new(1, 1, 1), &[])?;

    // the left border of a row is the last pixel of the row above, the right
    // border is the first pixel of the row below
    #[rustfmt::skip]
    assert_eq!(
        dst,
        vec![
            13, 18, 24, 26,
            37, 45, 54, 59,
            72, 81, 90, 83,
            60, 66, 72, 62,
        ]
    );
    Ok(())
}

#[test]
fn faulted_read_becomes_zero_sample() -> Result<(), EngineError> {
    let src = (0..16).collect::<Vec<_>>();
    let dst = filter(4, 4, &src, KernelWeights::new(0, 1, -4), &[5])?;

    // pixel (1, 1) reads as zero: its neighbours lose 5, the pixel itself gains 20
    #[rustfmt::skip]
    assert_eq!(
        as_signed(&dst),
        vec![
            5, -2, 2, -3,
            -5, 20, -5, 0,
            0, -5, 0, 0,
            -16, -17, -18, -35,
        ]
    );
    Ok(())
}

#[test]
fn constant_image() -> Result<(), EngineError> {
    let (width, height, c) = (6, 5, 7);
    let weights = KernelWeights::new(1, 2, 3);
    let dst = filter(width, height, &vec![c; width * height], weights, &[])?;

    let expected = c * (4 * weights.w1 + 4 * weights.w2 + weights.w3) as Word;
    for r in 1..height - 1 {
        for col in 1..width - 1 {
            assert_eq!(dst[r * width + col], expected, "pixel ({r}, {col})");
        }
    }
    // rows whose neighbours are interior rows see the carried borders on both sides
    for r in 2..height - 2 {
        assert!(dst[r * width..(r + 1) * width].iter().all(|&v| v == expected));
    }
    Ok(())
}

#[test]
fn matches_raster_strip_reference() -> Result<(), EngineError> {
    let mut rng = rand::rng();
    for _ in 0..50 {
        let width = rng.random_range(1..10);
        let height = rng.random_range(1..10);
        let weights = KernelWeights::new(
            rng.random_range(-8..=7),
            rng.random_range(-8..=7),
            rng.random_range(-8..=7),
        );
        let src = (0..width * height)
            .map(|_| rng.random_range(0..=255))
            .collect::<Vec<Word>>();

        let dst = filter(width, height, &src, weights, &[])?;
        assert_eq!(dst, reference(width, height, &src, weights), "{width}x{height}");
    }
    Ok(())
}

#[test]
fn reference_configuration() -> Result<(), EngineError> {
    let config = EngineConfig::default();
    let words = config.region_words();

    let mut rng = rand::rng();
    let src = (0..words)
        .map(|_| rng.random_range(0..=255))
        .collect::<Vec<Word>>();

    let mut ram = ExternalRam::new(0x0, 2 * words);
    ram.load(config.source_base, &src)?;

    let mut engine = ConvolutionEngine::from_config(config.clone())?;
    let report = engine.run(&mut ram)?;

    assert_eq!(report.reads, 32 * 32);
    assert_eq!(report.writes, 32 * 32);

    let reads = ram.addresses(AccessKind::Read);
    let writes = ram.addresses(AccessKind::Write);
    assert!(reads.windows(2).all(|w| w[1] == w[0] + 4));
    assert!(writes.windows(2).all(|w| w[1] == w[0] + 4));
    assert_eq!(writes[0], 0x1000);

    let dst = ram.dump(config.dest_base, words)?;
    assert_eq!(dst, reference(32, 32, &src, KernelWeights::LAPLACIAN));
    Ok(())
}

#[test]
fn accelerator_backend_matches_local() -> Result<(), EngineError> {
    let mut rng = rand::rng();
    let (width, height) = (8, 6);
    let words = width * height;
    let src = (0..words).map(|_| rng.random()).collect::<Vec<Word>>();

    for _ in 0..10 {
        let weights = KernelWeights::new(
            rng.random_range(ACCELERATOR_WEIGHT_RANGE),
            rng.random_range(ACCELERATOR_WEIGHT_RANGE),
            rng.random_range(ACCELERATOR_WEIGHT_RANGE),
        );
        let config = EngineConfig::default()
            .with_size([width, height].into())
            .with_regions(0x0, 4 * words as u32)
            .with_weights(weights);

        let mut outputs = vec![];
        for backend in [KernelBackend::Local, KernelBackend::Accelerator] {
            let mut ram = ExternalRam::new(0x0, 2 * words);
            ram.load(0x0, &src)?;
            let mut engine = ConvolutionEngine::from_config(config.clone().with_backend(backend))?;
            engine.run(&mut ram)?;
            outputs.push(ram.dump(config.dest_base, words)?);
        }
        assert_eq!(outputs[0], outputs[1]);
    }
    Ok(())
}

#[test]
fn accelerator_is_left_idle_after_a_pass() -> Result<(), EngineError> {
    let config = EngineConfig::default().with_size([3, 3].into()).with_regions(0x0, 0x24);
    let mut ram = ExternalRam::new(0x0, 18);
    ram.load(0x0, &[1; 9])?;

    let kernel = AcceleratedKernel::new(EmulatedAccelerator::new());
    let mut engine = ConvolutionEngine::new(config, kernel)?;
    engine.run(&mut ram)?;

    assert_eq!(engine.kernel().device().pending(), 0);
    Ok(())
}
