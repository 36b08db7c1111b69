use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use photo_grid::{
    ContainerSnapshot, GridOptions, ItemId, ItemInput, Layout, LayoutEngine, ReflowScheduler,
    StaticGrid,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(author, version, about = "Lay out images in justified rows")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Arrange the images found in a directory
    Layout(LayoutArgs),
    /// Arrange a grid of randomly sized placeholder images
    Demo(DemoArgs),
    /// Replay randomly timed image loads through the reflow scheduler
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Directory containing the images
    input: PathBuf,
    #[command(flatten)]
    settings: GridSettings,
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Placeholder size preset
    #[arg(long, value_enum, default_value = "small")]
    size: SizePreset,
    /// Seed for the placeholder sizes
    #[arg(long)]
    seed: Option<u64>,
    #[command(flatten)]
    settings: GridSettings,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Placeholder size preset
    #[arg(long, value_enum, default_value = "small")]
    size: SizePreset,
    /// Seed for the placeholder sizes and load times
    #[arg(long)]
    seed: Option<u64>,
    /// Window in milliseconds over which images finish loading
    #[arg(long, default_value_t = 1000)]
    load_window: u64,
    #[command(flatten)]
    settings: GridSettings,
}

#[derive(Parser, Debug, Clone)]
struct GridSettings {
    /// Container width in pixels
    #[arg(long, default_value_t = 960)]
    width: u32,
    /// Padding between images in pixels (overrides the config file)
    #[arg(long)]
    padding: Option<u32>,
    /// Vertical gap between rows in pixels, used for the total height
    #[arg(long, default_value_t = 0)]
    row_gap: u32,
    /// TOML file with grid options
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SizePreset {
    Small,
    Large,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Layout(args) => layout(args),
        Commands::Demo(args) => demo(args),
        Commands::Simulate(args) => simulate(args),
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn layout(args: LayoutArgs) -> Result<()> {
    let options = args.settings.to_options()?;
    let items = measure_directory(&args.input)?;
    if items.is_empty() {
        anyhow::bail!("no readable images found in {:?}", args.input);
    }

    let layout = LayoutEngine
        .arrange(args.settings.width, options.padding, &items)
        .with_context(|| format!("failed to arrange {:?}", args.input))?;
    print_layout(&layout, &args.settings)
}

fn demo(args: DemoArgs) -> Result<()> {
    let options = args.settings.to_options()?;
    let mut rng = seeded_rng(args.seed);
    let items = args
        .size
        .placeholder_sizes(&mut rng)
        .into_iter()
        .enumerate()
        .map(|(index, (width, height))| ItemInput::new(ItemId::new(0, index), width, height))
        .collect::<Vec<_>>();

    let layout = LayoutEngine
        .arrange(args.settings.width, options.padding, &items)
        .context("failed to arrange demo grid")?;
    print_layout(&layout, &args.settings)
}

fn simulate(args: SimulateArgs) -> Result<()> {
    let options = args.settings.to_options()?;
    let mut rng = seeded_rng(args.seed);
    let sizes = args.size.placeholder_sizes(&mut rng);

    let unmeasured = (0..sizes.len()).map(|index| ItemInput::new(ItemId::new(0, index), 0, 0));
    let container = ContainerSnapshot::new(args.settings.width, unmeasured.collect());
    let grid = StaticGrid::new(vec![container]);
    let mut scheduler = ReflowScheduler::new(grid, &options).context("invalid grid options")?;

    let mut loads: Vec<(Duration, usize)> = (0..sizes.len())
        .map(|index| (Duration::from_millis(rng.gen_range(0..=args.load_window)), index))
        .collect();
    loads.sort();

    let start = Instant::now();
    scheduler.arrange_now().context("initial layout failed")?;

    for (offset, index) in loads {
        let now = start + offset;
        if scheduler.poll(now)? {
            debug!("reflow ran before load of item {index} at {offset:?}");
        }

        let (width, height) = sizes[index];
        scheduler.adapter_mut().set_natural_size(ItemId::new(0, index), width, height);
        scheduler.notify_layout_invalidated(now);
    }

    if let Some(deadline) = scheduler.next_deadline() {
        scheduler.poll(deadline)?;
    }

    info!(
        "{} image loads produced {} layout passes (quiet interval {:?})",
        sizes.len(),
        scheduler.passes(),
        scheduler.quiet_interval()
    );
    eprintln!("{} loads, {} layout passes", sizes.len(), scheduler.passes());

    let grid = scheduler.into_adapter();
    let layout = grid.layout(0).context("simulation produced no layout")?;
    print_layout(layout, &args.settings)
}

fn measure_directory(path: &Path) -> Result<Vec<ItemInput>> {
    let mut entries: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .collect();
    entries.sort();
    if entries.is_empty() {
        anyhow::bail!("no files found in {:?}", path);
    }

    let progress = ProgressBar::new(entries.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images",
        )?
        .progress_chars("=> "),
    );

    let mut items = Vec::with_capacity(entries.len());
    for entry in &entries {
        match image::image_dimensions(entry) {
            Ok((width, height)) => {
                let id = ItemId::new(0, items.len());
                debug!("{} is {}x{}", entry.display(), width, height);
                items.push(ItemInput::new(id, width, height));
            },
            Err(err) => warn!("skipping {}: {err}", entry.display()),
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(items)
}

fn print_layout(layout: &Layout, settings: &GridSettings) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_layout(&mut out, layout, settings.format, settings.row_gap)
}

fn write_layout(
    out: &mut impl Write,
    layout: &Layout,
    format: OutputFormat,
    row_gap: u32,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, layout).context("failed to write JSON")?;
            writeln!(out)?;
        },
        OutputFormat::Text => {
            for row in &layout.rows {
                let cells = layout
                    .row_placements(row.id)
                    .map(|placement| {
                        let marker = if placement.is_row_terminal { "*" } else { "" };
                        format!(
                            "{} {}x{}{}",
                            placement.id,
                            placement.display_width,
                            placement.display_height,
                            marker
                        )
                    })
                    .collect::<Vec<_>>();
                writeln!(out, "row {} h={}: {}", row.id, row.height, cells.join(", "))?;
            }
            writeln!(
                out,
                "total height {}px (row gap {}px)",
                layout.total_height(row_gap),
                row_gap
            )?;
        },
    }

    Ok(())
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl GridSettings {
    fn to_options(&self) -> Result<GridOptions> {
        let mut options = match &self.config {
            Some(path) => load_options(path)?,
            None => GridOptions::default(),
        };
        if let Some(padding) = self.padding {
            options.padding = padding;
        }
        options.validate().context("invalid grid options")?;
        Ok(options)
    }
}

fn load_options(path: &Path) -> Result<GridOptions> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read config {:?}", path))?;
    toml::from_str(&contents).with_context(|| format!("failed to parse config {:?}", path))
}

impl SizePreset {
    /// Natural sizes of the placeholder images: a base side plus a random
    /// multiple of 50px, up to 250px, per dimension.
    fn placeholder_sizes(self, rng: &mut impl Rng) -> Vec<(u32, u32)> {
        let (base, count) = match self {
            SizePreset::Small => (150, 30),
            SizePreset::Large => (500, 15),
        };

        (0..count)
            .map(|_| {
                let width = base + 50 * (5.0 * rng.gen::<f64>()).round() as u32;
                let height = base + 50 * (5.0 * rng.gen::<f64>()).round() as u32;
                (width, height)
            })
            .collect()
    }
}
