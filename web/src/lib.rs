use clap::Parser;
use recall_core::{RoundConfig, Sampling};
use wasm_bindgen::prelude::*;

mod game;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Side length of the square grid
    #[arg(short, long, default_value_t = RoundConfig::DEFAULT_SIZE)]
    size: u8,

    /// How many tiles to remember
    #[arg(short, long, default_value_t = RoundConfig::DEFAULT_COUNT)]
    count: u16,

    /// How long the pattern stays visible, in milliseconds
    #[arg(long, default_value_t = RoundConfig::DEFAULT_REVEAL_DELAY_MS)]
    reveal_ms: u32,

    /// Force a seed instead of random
    #[arg(long)]
    seed: Option<u64>,

    /// Sample distinct tiles directly, for dense patterns
    #[arg(long)]
    index_sample: bool,
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = Args::try_parse_from(location_hash.split(['#', '&'])).expect("Could not parse args");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    log::debug!("args: {:?}", args);

    let config = RoundConfig::with_reveal_delay(args.size, args.count, args.reveal_ms)
        .expect("Invalid game configuration");
    let props = game::GameProps {
        config,
        seed: args.seed,
        sampling: if args.index_sample {
            Sampling::IndexSample
        } else {
            Sampling::Rejection
        },
    };

    let root = document()
        .get_element_by_id("game")
        .expect("Could not find id=\"game\" element");

    log::debug!("App started");
    yew::Renderer::<game::GameView>::with_root_and_props(root, props).render();
}
