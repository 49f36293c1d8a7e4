use clap::Parser;
use pulseq_as::{
    set_verbosity, very_verbose_println, Assembler, AssemblerOptions, AssemblyError,
    AssemblyErrorCode, FlagTable, OpcodeTable, OutputOptions,
};
use std::{path::PathBuf, process::exit};

/// Assemble pulse sequence programs into sequencer memory images.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// sequence source files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// output file (only with a single input; defaults to the input name with a .bin extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// enable verbose printing, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// prefix the image with the sequence upload command header
    #[arg(long)]
    framed: bool,

    /// require a 0x prefix on address operands that are not symbols
    #[arg(long)]
    strict_symbols: bool,

    /// OR numeric literals together with flags in definitions
    #[arg(long)]
    combine_literals: bool,

    /// do not write the <input>_hex.txt listing
    #[arg(long)]
    no_listing: bool,
}

fn handle_fatal_assembly_err(err: AssemblyError) -> ! {
    println!("{err}");
    exit(1)
}

fn main() {
    let cli = Cli::parse();
    set_verbosity(cli.verbose as usize);

    if cli.output.is_some() && cli.inputs.len() > 1 {
        handle_fatal_assembly_err(AssemblyError::new(
            AssemblyErrorCode::CLIArgParseError,
            "--output can only be used with a single input file".to_string(),
        ))
    }

    let opcodes = OpcodeTable::build_table();
    let flags = FlagTable::build_table();
    let options = AssemblerOptions {
        combine_literals: cli.combine_literals,
        strict_symbols: cli.strict_symbols,
    };

    let output = OutputOptions {
        output: cli.output.clone(),
        framed: cli.framed,
        no_listing: cli.no_listing,
    };

    for input in &cli.inputs {
        very_verbose_println!("adding source file {} to assembler", input.display());
        let report = match Assembler::new(&opcodes, &flags, options).build_file(input, &output) {
            Ok(r) => r,
            Err(err) => handle_fatal_assembly_err(err),
        };
        println!(
            "wrote {} words ({} bytes) to {}",
            report.words,
            report.image_len,
            report.output_file.display()
        );
    }
}
