//! Pullet16 Simulator - CLI Entry Point
//!
//! Commands:
//! - `pullet16-sim run <program>` - Run an ASCII executable
//! - `pullet16-sim disasm <program>` - Disassemble an ASCII executable
//! - `pullet16-sim pack <program>` - Write and verify a binary memory image

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::LevelFilter;
use serde::Serialize;
use simple_logger::SimpleLogger;

use pullet16::cpu::{
    Cpu, CpuState, Halt, Io, LineWriter, LogTrace, OutputSink, TokenInput, TraceSink, WriterTrace,
};
use pullet16::image::{self, disassemble};

#[derive(Parser)]
#[command(name = "pullet16-sim")]
#[command(version = "0.1.0")]
#[command(about = "A simulator for the Pullet16 16-bit accumulator computer")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program until it halts
    Run {
        /// Path to the ASCII executable (one 16-digit word per line)
        program: PathBuf,
        /// Input tokens consumed by RD (signed hex, whitespace separated)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Write WRT lines here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the execution trace to this file
        #[arg(short, long)]
        log: Option<PathBuf>,
        /// Print a JSON run report on stdout
        #[arg(long)]
        json: bool,
    },
    /// Disassemble an ASCII executable
    Disasm {
        /// Path to the ASCII executable
        program: PathBuf,
    },
    /// Write the binary memory image of a program and verify it
    Pack {
        /// Path to the ASCII executable
        program: PathBuf,
        /// Output image (defaults to the program path with a .bin extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Summary printed by `run --json`.
#[derive(Serialize)]
struct RunReport {
    program: String,
    state: CpuState,
    #[serde(skip_serializing_if = "Option::is_none")]
    halt: Option<Halt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fault: Option<String>,
    instructions: u64,
    pc: i32,
    accum: i32,
    accum_bits: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_instruction: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    output: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Run { program, input, output, log, json }) => {
            run_program(&program, input.as_deref(), output.as_deref(), log.as_deref(), json);
        }
        Some(Commands::Disasm { program }) => {
            disassemble_file(&program);
        }
        Some(Commands::Pack { program, output }) => {
            pack_file(&program, output);
        }
        None => {
            println!("Pullet16 Simulator v0.1.0");
            println!("A 16-bit accumulator computer simulator");
            println!();
            println!("Use --help for available commands");
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("warning: logger not installed: {}", e);
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("❌ {}", message);
    std::process::exit(1);
}

fn create_file(path: &Path) -> File {
    match File::create(path) {
        Ok(f) => f,
        Err(e) => fail(format!("Failed to create {}: {}", path.display(), e)),
    }
}

fn run_program(
    path: &Path,
    input: Option<&Path>,
    output: Option<&Path>,
    log_path: Option<&Path>,
    json: bool,
) {
    log::info!("Beginning execution of {}", path.display());

    let words = match image::load_program(path) {
        Ok(words) => words,
        Err(e) => fail(format!("Failed to load program: {}", e)),
    };
    log::info!("Loaded {} words", words.len());

    let mut cpu = Cpu::new();
    if let Err(e) = cpu.load_program(&words) {
        fail(format!("Failed to load program: {}", e));
    }

    let mut data = match input {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(text) => TokenInput::from_text(&text),
            Err(e) => fail(format!("Failed to read input {}: {}", p.display(), e)),
        },
        None => TokenInput::default(),
    };

    // WRT lines go to a file or stdout; in JSON mode without a file they
    // are collected into the report so stdout stays valid JSON.
    let mut captured: Vec<String> = Vec::new();
    let out_writer: Box<dyn Write> = match output {
        Some(p) => Box::new(BufWriter::new(create_file(p))),
        None => Box::new(std::io::stdout()),
    };
    let mut line_writer = LineWriter::new(out_writer);
    let sink: &mut dyn OutputSink = if json && output.is_none() {
        &mut captured
    } else {
        &mut line_writer
    };

    let mut file_trace = log_path.map(|p| WriterTrace::new(BufWriter::new(create_file(p))));
    let mut log_trace = LogTrace;
    let trace: &mut dyn TraceSink = match file_trace.as_mut() {
        Some(t) => t,
        None => &mut log_trace,
    };

    cpu.trace_machine(trace);
    let result = {
        let mut io = Io::new(&mut data, sink, trace);
        cpu.run(&mut io)
    };

    if let Some(t) = file_trace {
        if t.has_failed() {
            log::warn!("trace file is incomplete");
        }
        if let Err(e) = t.into_inner().flush() {
            log::warn!("failed to flush trace file: {}", e);
        }
    }
    if let Err(e) = line_writer.into_inner().flush() {
        log::warn!("failed to flush output: {}", e);
    }

    log::info!("Ending execution after {} instructions", cpu.cycles);

    if json {
        let report = RunReport {
            program: path.display().to_string(),
            state: cpu.state,
            halt: result.as_ref().ok().copied(),
            fault: result.as_ref().err().map(|e| e.to_string()),
            instructions: cpu.cycles,
            pc: cpu.regs.pc,
            accum: cpu.regs.accum_signed(),
            accum_bits: cpu.regs.accum_bits(),
            last_instruction: cpu.last_instruction().map(|i| image::format_instruction(&i)),
            output: captured,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => fail(format!("Failed to encode report: {}", e)),
        }
        if result.is_err() {
            std::process::exit(1);
        }
        return;
    }

    match result {
        Ok(Halt::Stop) => log::info!("Program stopped"),
        Ok(Halt::PcOverflow) => eprintln!("⚠️  PC beyond memory bound after {} instructions", cpu.cycles),
        Ok(Halt::Timeout) => eprintln!("⚠️  Program timed out after {} instructions", cpu.cycles),
        Err(e) => fail(format!("CPU error at PC={}: {}", cpu.regs.pc, e)),
    }
}

fn disassemble_file(path: &Path) {
    let words = match image::load_program(path) {
        Ok(words) => words,
        Err(e) => fail(format!("Failed to load program: {}", e)),
    };

    println!("{}", disassemble(&words));
}

fn pack_file(path: &Path, output: Option<PathBuf>) {
    let out_path = output.unwrap_or_else(|| path.with_extension("bin"));

    let words = match image::load_program(path) {
        Ok(words) => words,
        Err(e) => fail(format!("Failed to load program: {}", e)),
    };

    if let Err(e) = image::save_image(&out_path, &words) {
        fail(format!("Failed to save image: {}", e));
    }
    if let Err(e) = image::verify_image(&out_path, &words) {
        fail(format!("Image verification failed: {}", e));
    }

    println!("✓ Wrote {} words to {}", words.len(), out_path.display());
}
