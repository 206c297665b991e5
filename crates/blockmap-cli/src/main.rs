use blockmap::render::raster::{RasterError, RasterOptions};
use blockmap::render::{HeadlessError, HeadlessRenderer, RenderError, sanitize_svg_id};
use blockmap::{ClassRegistry, DiagramConfig, UnresolvedPolicy};
use serde::Serialize;
use std::io::Read;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(blockmap::Error),
    Render(HeadlessError),
    Raster(RasterError),
    Json(serde_json::Error),
    NoRoot { candidates: Vec<String> },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::NoRoot { candidates } if candidates.is_empty() => {
                write!(f, "No root class found; pass --root <class>")
            }
            CliError::NoRoot { candidates } => write!(
                f,
                "Several root candidates ({}); pass --root <class>",
                candidates.join(", ")
            ),
        }
    }
}

impl CliError {
    /// True when the requested (or inferred) root class does not exist.
    fn is_missing_root(&self) -> bool {
        let not_found = |err: &blockmap::Error| matches!(err, blockmap::Error::NotFound { .. });
        match self {
            CliError::NoRoot { .. } => true,
            CliError::Core(err)
            | CliError::Render(HeadlessError::Core(err))
            | CliError::Render(HeadlessError::Render(RenderError::Core(err))) => not_found(err),
            _ => false,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<blockmap::Error> for CliError {
    fn from(value: blockmap::Error) -> Self {
        Self::Core(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Render(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        match value {
            RasterError::Headless(err) => Self::Render(err),
            other => Self::Raster(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Tree,
    Layout,
    Render,
    Roots,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    inputs: Vec<String>,
    root: Option<String>,
    config: Option<String>,
    width: Option<i32>,
    height: Option<i32>,
    margin: Option<i32>,
    max_depth: Option<usize>,
    exclude: Vec<String>,
    unresolved: Option<UnresolvedPolicy>,
    detect_cycles: bool,
    json: bool,
    pretty: bool,
    verbose: u8,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    diagram_id: Option<String>,
    no_property_names: bool,
    out: Option<String>,
}

fn usage() -> &'static str {
    "blockmap-cli\n\
\n\
USAGE:\n\
  blockmap-cli [tree] [--root <class>] [--json] [--pretty] [CONFIG] [<path>...|-]\n\
  blockmap-cli layout [--root <class>] [--pretty] [CONFIG] [<path>...|-]\n\
  blockmap-cli render [--root <class>] [--format svg|png] [--scale <n>] [--background <css-color>] [--id <diagram-id>] [--no-property-names] [--out <path>] [CONFIG] [<path>...|-]\n\
  blockmap-cli roots [<path>...|-]\n\
\n\
CONFIG:\n\
  --config <path.json> --width <px> --height <px> --margin <px> --max-depth <n>\n\
  --exclude <class>[,<class>...] --unresolved leaf|omit --detect-cycles\n\
\n\
NOTES:\n\
  - Inputs are JSON class records; several files are merged in order (later classes win).\n\
  - If no <path> is given or a path is '-', input is read from stdin.\n\
  - Without --root, the single class no other class references is used.\n\
  - tree prints an indented outline by default; --json prints the composition tree.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG output defaults to writing next to the first input file (or ./out.png for stdin).\n\
  - -v / --verbose raises log verbosity (repeatable); RUST_LOG is honoured otherwise.\n\
"
}

fn next_value<'a>(it: &mut std::slice::Iter<'a, String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_value<T: FromStr>(it: &mut std::slice::Iter<'_, String>) -> Result<T, CliError> {
    next_value(it)?
        .parse::<T>()
        .map_err(|_| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.get(1..).unwrap_or_default().iter();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "tree" => args.command = Command::Tree,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "roots" => args.command = Command::Roots,
            "--json" => args.json = true,
            "--pretty" => args.pretty = true,
            "--detect-cycles" => args.detect_cycles = true,
            "--no-property-names" => args.no_property_names = true,
            "-v" | "--verbose" => args.verbose = args.verbose.saturating_add(1),
            "--root" => args.root = Some(next_value(&mut it)?.clone()),
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--width" => args.width = Some(parse_value(&mut it)?),
            "--height" => args.height = Some(parse_value(&mut it)?),
            "--margin" => args.margin = Some(parse_value(&mut it)?),
            "--max-depth" => args.max_depth = Some(parse_value(&mut it)?),
            "--exclude" => {
                let names = next_value(&mut it)?;
                args.exclude.extend(
                    names
                        .split(',')
                        .map(str::trim)
                        .filter(|n| !n.is_empty())
                        .map(str::to_string),
                );
            }
            "--unresolved" => {
                args.unresolved = Some(match next_value(&mut it)?.as_str() {
                    "leaf" => UnresolvedPolicy::Leaf,
                    "omit" => UnresolvedPolicy::Omit,
                    _ => return Err(CliError::Usage(usage())),
                });
            }
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                args.render_scale = parse_value(&mut it)?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let bg = next_value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--id" => args.diagram_id = Some(next_value(&mut it)?.clone()),
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "--" => args.inputs.extend(it.by_ref().cloned()),
            "-" => args.inputs.push("-".to_string()),
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => args.inputs.push(path.to_string()),
        }
    }

    Ok(args)
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn read_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(input)?)
    }
}

fn load_registry(inputs: &[String]) -> Result<ClassRegistry, CliError> {
    let stdin = ["-".to_string()];
    let inputs = if inputs.is_empty() { &stdin[..] } else { inputs };

    let mut builder = ClassRegistry::builder();
    for input in inputs {
        let text = read_input(input)?;
        let count = builder.extend_from_json(&text)?;
        tracing::info!(input = %input, classes = count, "loaded class records");
    }
    Ok(builder.build())
}

fn load_config(args: &Args) -> Result<DiagramConfig, CliError> {
    let mut config = match args.config.as_deref() {
        Some(path) => DiagramConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => DiagramConfig::default(),
    };
    if let Some(width) = args.width {
        config.canvas_width = width;
    }
    if let Some(height) = args.height {
        config.canvas_height = height;
    }
    if let Some(margin) = args.margin {
        config.margin = margin;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    if let Some(policy) = args.unresolved {
        config.unresolved = policy;
    }
    if args.detect_cycles {
        config.detect_cycles = true;
    }
    config.exclude.extend(args.exclude.iter().cloned());
    Ok(config)
}

fn resolve_root(registry: &ClassRegistry, root: Option<&str>) -> Result<String, CliError> {
    if let Some(root) = root {
        return Ok(root.to_string());
    }
    let candidates = registry
        .unreferenced()
        .into_iter()
        .map(|def| def.name.clone())
        .collect::<Vec<_>>();
    match candidates.as_slice() {
        [only] => {
            tracing::info!(root = %only, "inferred root class");
            Ok(only.clone())
        }
        _ => Err(CliError::NoRoot { candidates }),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(inputs: &[String], ext: &str) -> std::path::PathBuf {
    match inputs.first() {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn prepare(
    registry: ClassRegistry,
    args: &Args,
) -> Result<(HeadlessRenderer, String), CliError> {
    let config = load_config(args)?;
    let root = resolve_root(&registry, args.root.as_deref())?;
    Ok((HeadlessRenderer::new(registry).with_config(config), root))
}

fn run(args: Args) -> Result<(), CliError> {
    let registry = load_registry(&args.inputs)?;

    match args.command {
        Command::Roots => {
            for def in registry.unreferenced() {
                println!("{}", def.name);
            }
            Ok(())
        }
        Command::Tree => {
            let (renderer, root) = prepare(registry, &args)?;
            let tree = renderer.build_tree(&root)?;
            if args.json {
                write_json(&tree, args.pretty)?;
            } else {
                let outline = tree.iter().map(|n| n.outline()).collect::<String>();
                print!("{outline}");
            }
            Ok(())
        }
        Command::Layout => {
            let (renderer, root) = prepare(registry, &args)?;
            let layouted = renderer.layout(&root)?;
            write_json(&layouted, args.pretty)?;
            Ok(())
        }
        Command::Render => {
            let (mut renderer, root) = prepare(registry, &args)?;
            renderer.svg.diagram_id = args.diagram_id.as_deref().map(sanitize_svg_id);
            renderer.svg.include_property_names = !args.no_property_names;
            if let Some(background) = args.background.as_deref() {
                renderer.svg.background = Some(background.to_string());
            }

            match args.render_format {
                RenderFormat::Svg => {
                    let svg = renderer.render_svg(&root)?;
                    write_text(&svg, args.out.as_deref())?;
                }
                RenderFormat::Png => {
                    let raster = RasterOptions {
                        scale: args.render_scale,
                        background: args.background.clone(),
                    };
                    let bytes = renderer.render_png(&root, &raster)?;
                    let out = args.out.clone().unwrap_or_else(|| {
                        default_raster_out_path(&args.inputs, "png")
                            .to_string_lossy()
                            .to_string()
                    });
                    if out == "-" {
                        use std::io::Write;
                        std::io::stdout().lock().write_all(&bytes)?;
                    } else {
                        std::fs::write(out, bytes)?;
                    }
                }
            }
            Ok(())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => {}
        Err(err) if err.is_missing_root() => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
