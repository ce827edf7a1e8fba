use argh::FromArgs;
use std::path::{Path, PathBuf};

use streamconv::{
    core::{ExternalRam, FaultPolicy, ImageSize},
    engine::{ConvolutionEngine, EngineConfig},
    io::{hex, pixels, png},
    kernel::{KernelBackend, KernelWeights},
};

#[derive(FromArgs)]
/// Filter a grayscale image through the streaming convolution engine.
struct Args {
    /// path to the input image (.png) or word dump (.txt)
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output image (.png) or word dump (.txt)
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// kernel weights as w1,w2,w3 (corners, edges, center)
    #[argh(option, from_str_fn(parse_weights))]
    weights: Option<KernelWeights>,

    /// evaluate the kernel on the emulated accelerator
    #[argh(switch)]
    accelerator: bool,

    /// abort on read faults instead of substituting zero
    #[argh(switch)]
    strict: bool,

    /// number of times a faulting read is retried
    #[argh(option)]
    retries: Option<u32>,

    /// JSON file holding the engine configuration
    #[argh(option)]
    config: Option<PathBuf>,
}

fn parse_weights(value: &str) -> Result<KernelWeights, String> {
    let weights = value
        .split(',')
        .map(|w| w.trim().parse::<i32>().map_err(|e| format!("{w:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match weights[..] {
        [w1, w2, w3] => Ok(KernelWeights::new(w1, w2, w3)),
        _ => Err(format!("expected 3 weights, got {}", weights.len())),
    }
}

fn is_png(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "png")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut config = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };
    if let Some(weights) = args.weights {
        config.weights = weights;
    }
    if args.accelerator {
        config.backend = KernelBackend::Accelerator;
    }
    if args.strict {
        config.fault_policy = FaultPolicy::Propagate;
    }
    if let Some(retries) = args.retries {
        config.read_retries = retries;
    }

    // load the source image as one word per pixel
    let source = if is_png(&args.input) {
        let (size, image) = png::read_image_png_mono8(&args.input)?;
        config.size = size;
        pixels::pixels_to_words(&image)
    } else {
        let words = hex::read_hex_words(&args.input)?;
        if words.len() != config.region_words() {
            return Err(format!(
                "dump holds {} words but {} needs {}",
                words.len(),
                config.size,
                config.region_words()
            )
            .into());
        }
        words
    };

    config.validate()?;

    // a memory window from address zero covering both regions
    let ImageSize { width, height } = config.size;
    let region_bytes = (width * height) as u32 * config.word_stride;
    let top = config.source_base.max(config.dest_base) + region_bytes;
    let mut ram =
        ExternalRam::new(0x0, (top / config.word_stride) as usize).with_stride(config.word_stride);
    ram.load(config.source_base, &source)?;

    let dest_base = config.dest_base;
    let words = config.region_words();

    let mut engine = ConvolutionEngine::from_config(config)?;
    let report = engine.run(&mut ram)?;
    log::info!(
        "filtered {width}x{height}: {} reads, {} writes, {} faults",
        report.reads,
        report.writes,
        report.faults.len()
    );

    let filtered = ram.dump(dest_base, words)?;
    if is_png(&args.output) {
        png::write_image_png_gray8(
            &args.output,
            ImageSize { width, height },
            &pixels::words_to_pixels(&filtered),
        )?;
    } else {
        hex::write_hex_words(&args.output, &filtered)?;
    }

    println!("Wrote {}", args.output.display());

    Ok(())
}
