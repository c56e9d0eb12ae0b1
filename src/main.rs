// Tue Jan 13 2026 - Alex

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use heap_sizeof::{
    config::SizeOfConfig,
    engine::{EngineFactory, Size, SizeOfEngine},
    heap::{FieldKind, Heap, HostFacilities, ObjectId, PrimitiveValue, TypeBuilder, Value},
    model::{self, HostProbe, MemoryModelVariant, PrimitiveKind, RuntimeMemoryModel},
    sizer::{available_sizers, CrossCheckingSizer, ObjectSizer, SizerKind},
    utils::{format_bytes, format_duration, pluralize, LoggingUtils, ScopedTimer},
    walker::RecordingListener,
};
use log::LevelFilter;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Inspect the host memory model and size sample object graphs", long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip detection and use this memory model (e.g. hot_spot64_compressed_oops)
    #[arg(long)]
    variant: Option<String>,

    /// Host property for detection, as key=value
    #[arg(short, long = "property", value_name = "KEY=VALUE")]
    properties: Vec<String>,

    #[arg(long, value_enum, default_value_t = Facilities::All)]
    facilities: Facilities,

    #[arg(long)]
    max_visited: Option<u64>,

    #[arg(long)]
    abort: bool,

    /// Length of the sample linked list
    #[arg(long, default_value_t = 1000)]
    nodes: u32,

    /// Compare every available strategy on the samples
    #[arg(long)]
    cross_check: bool,

    #[arg(long)]
    json: bool,

    /// Write the effective configuration to this file
    #[arg(long)]
    save_config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log level (error, warn, info, debug, trace, off); overrides -v
    #[arg(long, value_parser = parse_level)]
    log_level: Option<LevelFilter>,

    #[arg(long)]
    no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Facilities {
    /// Instrumentation and field offsets
    All,
    Offsets,
    None,
}

#[derive(Serialize)]
struct Report {
    model: String,
    strategy: SizerKind,
    available: Vec<SizerKind>,
    samples: Vec<SampleReport>,
}

#[derive(Serialize)]
struct SampleReport {
    name: String,
    shallow: u64,
    size: Size,
    objects: usize,
}

struct Sample {
    name: &'static str,
    roots: Vec<Option<ObjectId>>,
}

fn main() {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }
    let level = args
        .log_level
        .unwrap_or_else(|| LoggingUtils::level_from_verbosity(args.verbose));
    LoggingUtils::init_from_env(level, !args.no_color);

    if let Err(e) = run(&args) {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    let config = load_config(args)?;
    if let Some(path) = &args.save_config {
        config.save(path).with_context(|| format!("saving {}", path.display()))?;
    }

    let model = resolve_model(args)?;
    let facilities = match args.facilities {
        Facilities::All => HostFacilities::attached(model),
        Facilities::Offsets => HostFacilities::attached(model).without_instrumentation(),
        Facilities::None => HostFacilities::none(),
    };
    let available = available_sizers(&config.sizers, &facilities);

    let factory = EngineFactory::new(model, facilities.clone(), config.clone())?;
    let engine = factory.create_default()?;

    let mut heap = Heap::new();
    let samples = build_samples(&mut heap, args.nodes)?;

    let mut reports = Vec::with_capacity(samples.len());
    for sample in &samples {
        reports.push(measure_sample(&engine, &heap, sample)?);
    }

    if args.json {
        let report = Report {
            model: model.to_string(),
            strategy: engine.strategy(),
            available,
            samples: reports,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_model(&model, &config, &available, engine.strategy());
    print_samples(&reports);

    if args.cross_check {
        cross_check(model, &facilities, &heap, &samples)?;
    }

    println!();
    println!(
        "{} Done in {}",
        "[+]".green(),
        format_duration(start_time.elapsed())
    );
    Ok(())
}

fn parse_level(s: &str) -> std::result::Result<LevelFilter, String> {
    LoggingUtils::level_from_str(s).ok_or_else(|| format!("unknown log level '{}'", s))
}

fn load_config(args: &Args) -> Result<SizeOfConfig> {
    let mut config = match &args.config {
        Some(path) => SizeOfConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => SizeOfConfig::default(),
    };
    config = config.apply_env()?;
    if let Some(max) = args.max_visited {
        let abort = args.abort || config.abort_on_limit;
        config = config.with_limit(max, abort);
    } else if args.abort {
        config.abort_on_limit = true;
    }
    config.validate()?;
    Ok(config)
}

fn resolve_model(args: &Args) -> Result<RuntimeMemoryModel> {
    if let Some(name) = &args.variant {
        let variant: MemoryModelVariant = serde_json::from_value(serde_json::Value::String(name.clone()))
            .with_context(|| format!("unknown memory model variant '{}'", name))?;
        return Ok(RuntimeMemoryModel::from_variant(variant));
    }

    let mut probe = HostProbe::from_env();
    for property in &args.properties {
        let Some((key, value)) = property.split_once('=') else {
            bail!("expected KEY=VALUE, got '{}'", property);
        };
        probe = probe.with_property(key.trim(), value.trim());
    }
    Ok(model::detect(&probe))
}

fn build_samples(heap: &mut Heap, nodes: u32) -> Result<Vec<Sample>> {
    let node = TypeBuilder::class("Node")
        .extends(heap.object_type())
        .field("next", FieldKind::Reference)
        .field("value", PrimitiveKind::Long)
        .build();
    let entry = TypeBuilder::class("Entry")
        .extends(heap.object_type())
        .field("key", FieldKind::Reference)
        .field("value", FieldKind::Reference)
        .field("hash", PrimitiveKind::Int)
        .build();
    let object_array = TypeBuilder::array("Object[]", FieldKind::Reference).build();

    let mut head = None;
    for i in 0..nodes {
        let id = heap.new_instance(&node)?;
        heap.set_field(id, "next", head)?;
        heap.set_field(id, "value", Value::Primitive(PrimitiveValue::Long(i64::from(i))))?;
        head = Some(id);
    }

    let text = heap.new_string("sizeof-probe")?;
    let small = heap.box_int(42)?;
    let large = heap.box_int(1_000_000)?;
    let mixed = heap.new_array(&object_array, vec![Value::Ref(text), Value::Ref(small), Value::Ref(large), Value::Null])?;

    let key = heap.new_string("session:42")?;
    let container = heap.new_instance(&entry)?;
    heap.set_field(container, "key", key)?;
    heap.set_field(container, "value", mixed)?;

    Ok(vec![
        Sample { name: "linked list", roots: vec![head] },
        Sample { name: "string", roots: vec![Some(text)] },
        Sample { name: "small box", roots: vec![Some(small)] },
        Sample { name: "large box", roots: vec![Some(large)] },
        Sample { name: "object array", roots: vec![Some(mixed)] },
        Sample { name: "cache entry", roots: vec![Some(key), Some(mixed), Some(container)] },
    ])
}

fn measure_sample(engine: &SizeOfEngine, heap: &Heap, sample: &Sample) -> Result<SampleReport> {
    let _timer = ScopedTimer::new(sample.name);
    let mut recorder = RecordingListener::new();
    let size = engine.measure_with_listener(heap, &sample.roots, &mut recorder)?;
    let shallow = match sample.roots.first().copied().flatten() {
        Some(root) => engine.size_of(heap, root)?,
        None => 0,
    };
    Ok(SampleReport {
        name: sample.name.to_string(),
        shallow,
        size,
        objects: recorder.visits.len(),
    })
}

fn print_model(model: &RuntimeMemoryModel, config: &SizeOfConfig, available: &[SizerKind], selected: SizerKind) {
    println!("{}", "Memory Model".cyan().bold());
    println!("{}", "-".repeat(40).cyan());
    println!("  {}", model.description().green());
    println!("  Pointer size:    {}", model.pointer_width());
    println!("  Reference size:  {}", model.reference_width());
    println!("  Object header:   {}", model.header_size());
    println!("  Array header:    {}", model.array_header_size());
    println!("  Alignment:       {}", model.object_alignment().as_u64());
    println!("  Min object size: {}", model.min_object_size());
    println!();

    println!("{}", "Strategies".cyan().bold());
    println!("{}", "-".repeat(40).cyan());
    for kind in &config.sizers {
        let mark = if available.contains(kind) { "✓".green() } else { "✗".red() };
        let note = if *kind == selected { " (selected)".yellow().to_string() } else { String::new() };
        println!("  {} {}{}", mark, kind, note);
    }
    println!(
        "  Visit limit: {}{}",
        config.max_visited_objects,
        if config.abort_on_limit { ", abort" } else { "" }
    );
    println!();
}

fn print_samples(reports: &[SampleReport]) {
    println!("{}", "Samples".cyan().bold());
    println!("{}", "-".repeat(40).cyan());
    for report in reports {
        let size = if report.size.exact {
            format_bytes(report.size.calculated).green()
        } else {
            format!("{} (inexact)", format_bytes(report.size.calculated)).yellow()
        };
        println!(
            "  {:<14} shallow {:>5}  deep {}  [{}]",
            report.name,
            report.shallow,
            size,
            pluralize(report.objects as u64, "object", "objects")
        );
    }
}

fn cross_check(
    model: RuntimeMemoryModel,
    facilities: &HostFacilities,
    heap: &Heap,
    samples: &[Sample],
) -> Result<()> {
    let checker = CrossCheckingSizer::new(model, facilities)?;
    let strategies = checker
        .strategies()
        .iter()
        .map(SizerKind::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    println!();
    println!("{} Cross-checking shallow sizes with {}", "[*]".blue(), strategies);
    for sample in samples {
        for root in sample.roots.iter().flatten() {
            match checker.size_of(heap, *root) {
                Ok(size) => println!("  {} {:<14} {}", "[+]".green(), sample.name, size),
                Err(e) => println!("  {} {:<14} {}", "[!]".red(), sample.name, e),
            }
        }
    }
    Ok(())
}
