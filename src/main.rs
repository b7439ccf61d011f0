// src/main.rs
//
// CLI entrypoint for ramsim rollouts.
//
// Runs one episode with a scripted policy (noop or uniform-random) and
// prints a run header, the optional live dashboard, and a final summary.
// Deterministic via --seed; telemetry is controlled by the
// RAMSIM_TELEMETRY_* environment variables.

use std::thread;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use ramsim::{EnvConfig, RamSimEnv, RenderMode, RendererStyle, ACTION_COUNT};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum StyleArg {
    Cyberpunk,
    Retro,
    Anime,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PolicyArg {
    /// Submit NoOp for every process each tick.
    Noop,
    /// Sample every action code uniformly.
    Random,
}

#[derive(Debug, Parser)]
#[command(
    name = "ramsim",
    about = "Deterministic RAM-management simulation (RL research harness)",
    version
)]
struct Args {
    /// Number of process slots.
    #[arg(long, default_value_t = 5)]
    k: usize,

    /// Maximum ticks to run (capped by the episode step budget).
    #[arg(long, default_value_t = 500)]
    steps: u64,

    /// Deterministic episode seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Scripted policy driving the rollout.
    #[arg(long, value_enum, default_value_t = PolicyArg::Noop)]
    policy: PolicyArg,

    /// Draw the live dashboard each tick.
    #[arg(long)]
    render: bool,

    /// Dashboard style.
    #[arg(long, value_enum, default_value_t = StyleArg::Cyberpunk)]
    style: StyleArg,

    /// Milliseconds to pause between rendered frames.
    #[arg(long, default_value_t = 120)]
    frame_ms: u64,

    /// Verbosity: -v prints per-tick rewards.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("ramsim: {err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let style = match args.style {
        StyleArg::Cyberpunk => RendererStyle::Cyberpunk,
        StyleArg::Retro => RendererStyle::Retro,
        StyleArg::Anime => RendererStyle::Anime,
    };

    let mut config = EnvConfig::with_k(args.k);
    config.style = style;
    config.render_mode = if args.render {
        RenderMode::Human
    } else {
        RenderMode::Headless
    };

    let mut env = RamSimEnv::new(config)?;
    let (_, reset_info) = env.reset(args.seed);

    println!(
        "ramsim | k={} | steps={} | seed={} | policy={:?} | style={:?}",
        args.k, args.steps, reset_info.seed, args.policy, args.style
    );

    // The policy generator is independent of the episode generator so the
    // environment trajectory depends only on (seed, action sequence).
    let mut policy_rng = ChaCha8Rng::seed_from_u64(reset_info.seed ^ 0x5eed_0f_ac71_0e5);

    let mut total_reward = 0.0;
    let mut ticks = 0u64;
    let mut final_reason = None;

    for _ in 0..args.steps {
        let codes: Vec<u8> = match args.policy {
            PolicyArg::Noop => vec![ramsim::Action::NoOp.code(); args.k],
            PolicyArg::Random => (0..args.k)
                .map(|_| policy_rng.gen_range(0..ACTION_COUNT as u8))
                .collect(),
        };

        let result = env.step(&codes)?;
        total_reward += result.reward;
        ticks = result.info.step;

        if args.verbose > 0 {
            println!(
                "tick {:>4} | reward {:>8.3} | ram {:.3} | cpu {:.3} | power {:.3}",
                result.info.step,
                result.reward,
                result.info.ram_usage,
                result.info.cpu_usage,
                result.info.power
            );
        }

        if args.render {
            env.render()?;
            thread::sleep(Duration::from_millis(args.frame_ms));
        }

        if result.terminated || result.truncated {
            final_reason = result.info.termination_reason;
            break;
        }
    }

    env.close();

    println!(
        "done | ticks={} | total_reward={:.3} | mean_reward={:.3} | end={}",
        ticks,
        total_reward,
        if ticks > 0 {
            total_reward / ticks as f64
        } else {
            0.0
        },
        final_reason
            .map(|r| format!("{r:?}"))
            .unwrap_or_else(|| "step-limit".to_string())
    );

    Ok(())
}
