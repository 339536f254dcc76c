//! Shard Puzzle entry point
//!
//! Native demo: builds a stage (or a puzzle from a JSON config), lets the
//! auto-solver play it, and logs every feedback event.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::{Parser, ValueEnum};
    use shard_puzzle::consts::TICKS_PER_SECOND;
    use shard_puzzle::sim::{
        AutoSolver, FeedbackSink, PuzzleController, PuzzleEvent, PuzzleState, Renderer, Strategy,
    };
    use shard_puzzle::stages::{self, DEFAULT_STAGE_ID};
    use shard_puzzle::{PuzzleConfig, PuzzleError, Result, StageRecords};

    /// Frames to run before giving up on an unsolvable layout
    const MAX_FRAMES: u32 = 10_000;

    #[derive(Parser, Debug)]
    #[command(name = "shard-puzzle")]
    #[command(about = "Shape-disassembly puzzle, solved by the built-in auto-solver")]
    #[command(version)]
    pub struct Cli {
        /// Built-in stage to play
        #[arg(long, conflicts_with = "config")]
        stage: Option<u32>,

        /// Puzzle config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the decomposition strategy
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Fixed RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Best-runs file to update after a solved stage
        #[arg(long)]
        records: Option<PathBuf>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
    enum StrategyArg {
        /// Row-major rectangular cells
        Grid,
        /// Seeded Voronoi cells
        Voronoi,
    }

    impl From<StrategyArg> for Strategy {
        fn from(arg: StrategyArg) -> Self {
            match arg {
                StrategyArg::Grid => Strategy::Grid,
                StrategyArg::Voronoi => Strategy::Voronoi,
            }
        }
    }

    impl Cli {
        /// Stage board this run counts toward. Custom configs and strategy
        /// overrides are not catalog stages and are never recorded.
        fn record_stage(&self) -> Option<u32> {
            if self.config.is_some() || self.strategy.is_some() {
                return None;
            }
            Some(self.stage.unwrap_or(DEFAULT_STAGE_ID))
        }

        fn puzzle_config(&self) -> Result<PuzzleConfig> {
            let mut config = match &self.config {
                Some(path) => PuzzleConfig::load(path)?,
                None => {
                    let id = self.stage.unwrap_or(DEFAULT_STAGE_ID);
                    let stage = stages::stage_by_id(id).ok_or_else(|| {
                        PuzzleError::InvalidConfiguration(format!("no stage {id}"))
                    })?;
                    stage.config()
                }
            };
            if let Some(strategy) = self.strategy {
                config.strategy = strategy.into();
            }
            if self.seed.is_some() {
                config.seed = self.seed;
            }
            Ok(config)
        }
    }

    /// Stand-in for the audio/visual cue layer
    struct LogFeedback;

    impl FeedbackSink for LogFeedback {
        fn feedback(&mut self, event: &PuzzleEvent) {
            match event {
                PuzzleEvent::PieceSnapped { id } => log::info!("*snap* piece {}", id),
                PuzzleEvent::PuzzleComplete => log::info!("*fanfare* puzzle complete"),
                other => log::debug!("{:?}", other),
            }
        }
    }

    /// Stand-in for the renderer: logs progress once per simulated second
    struct LogRenderer;

    impl Renderer for LogRenderer {
        fn render(&mut self, state: &PuzzleState) {
            if state.time_ticks % TICKS_PER_SECOND as u64 == 0 {
                log::debug!(
                    "t={}s {}/{} pieces placed",
                    state.time_ticks / TICKS_PER_SECOND as u64,
                    state.snapped_count(),
                    state.len()
                );
            }
        }
    }

    pub fn run(cli: Cli) -> Result<()> {
        let mut controller = PuzzleController::new(cli.puzzle_config()?, LogFeedback)?;
        log::info!(
            "Solving {} pieces (seed {}, {} short of request)",
            controller.state().len(),
            controller.state().seed,
            controller.state().shortfall()
        );

        let mut solver = AutoSolver::new();
        let mut renderer = LogRenderer;
        let mut frames = 0;
        while !controller.is_complete() && frames < MAX_FRAMES {
            controller.frame(&mut solver, &mut renderer);
            frames += 1;
        }

        let state = controller.state();
        println!(
            "{}: {}/{} pieces placed in {} moves over {} ticks",
            if controller.is_complete() { "Solved" } else { "Gave up" },
            state.snapped_count(),
            state.len(),
            state.moves,
            state.time_ticks
        );

        let Some(path) = &cli.records else {
            return Ok(());
        };
        let Some(stage_id) = cli.record_stage() else {
            log::info!("Custom puzzle, not recorded");
            return Ok(());
        };
        let mut records = StageRecords::load(path)?;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0);
        if let Some(rank) = records.record(stage_id, state, timestamp) {
            println!("New record for stage {}: rank #{}", stage_id, rank);
        }
        records.save(path)
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Shard Puzzle (native) starting...");
    if let Err(e) = native::run(native::Cli::parse()) {
        log::error!("{}", e);
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedders drive `PuzzleController` directly on the web
}
