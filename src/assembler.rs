use crate::{
    constant::{DEFAULT_BINARY_EXTENSION, DEFINE},
    data::{AssemblyError, AssemblyErrorCode, FlagTable, OpcodeTable},
    definition::Definition,
    emitter,
    instruction::Instruction,
    symbols::SymbolTable,
    tokenizer::normalize_line,
    verbose_println, very_verbose_println, warning_println,
};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct AssemblerOptions {
    /// OR numeric tokens together with flags instead of letting the first
    /// numeric token replace the whole expression
    pub combine_literals: bool,
    /// address operands that are not symbols must carry a `0x` prefix
    pub strict_symbols: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordKind {
    Constant { name: String },
    Instruction(Instruction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub address: u64,
    pub value: u64,
    /// 1-based source line
    pub line: usize,
    pub kind: WordKind,
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = match &self.kind {
            WordKind::Constant { name } => format!("{name} ="),
            WordKind::Instruction(instruction) => instruction.to_string(),
        };
        write!(f, "[{:#06x}] {:#018x} {origin}", self.address, self.value)
    }
}

/// Every emitted word, in source order. A word's index is its address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledProgram {
    pub words: Vec<Word>,
}

impl AssembledProgram {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn values(&self) -> Vec<u64> {
        self.words.iter().map(|w| w.value).collect()
    }

    pub fn half_words(&self) -> Vec<u32> {
        emitter::half_words(&self.values())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        emitter::serialize(&self.values())
    }

    pub fn listing(&self) -> String {
        emitter::render_listing(&self.half_words())
    }
}

impl fmt::Display for AssembledProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in &self.words {
            writeln!(f, "{word}")?;
        }
        Ok(())
    }
}

/// One assembly run. Symbols and the address counter live here, so separate
/// programs need separate instances.
pub struct Assembler<'a> {
    opcodes: &'a OpcodeTable,
    flags: &'a FlagTable,
    options: AssemblerOptions,
    symbols: SymbolTable,
    address: u64,
    words: Vec<Word>,
}

impl<'a> Assembler<'a> {
    pub fn new(opcodes: &'a OpcodeTable, flags: &'a FlagTable, options: AssemblerOptions) -> Self {
        Self {
            opcodes,
            flags,
            options,
            symbols: SymbolTable::new(options.strict_symbols),
            address: 0,
            words: vec![],
        }
    }

    pub fn assemble(mut self, source: &str) -> Result<AssembledProgram, AssemblyError> {
        let lines: Vec<(usize, &str, String)> = source
            .lines()
            .enumerate()
            .map(|(idx, raw)| (idx + 1, raw, normalize_line(raw)))
            .collect();

        // collect definition names first so forward references can be reported
        for (number, _, line) in &lines {
            if let Some((name, _)) = line.split_once(DEFINE) {
                let name: String = name.chars().filter(|c| !c.is_whitespace()).collect();
                if !name.is_empty() {
                    self.symbols.declare(&name, *number);
                }
            }
        }

        for (number, raw, line) in &lines {
            very_verbose_println!("line {number} stripped = {line}");
            self.step(*number, line)
                .map_err(|err| err.at_line(*number, raw))?;
        }
        verbose_println!(
            "assembled {} words ({} symbols)",
            self.words.len(),
            self.symbols.len()
        );
        Ok(AssembledProgram { words: self.words })
    }

    fn step(&mut self, number: usize, line: &str) -> Result<(), AssemblyError> {
        if line.is_empty() {
            return Ok(());
        }
        let (value, kind) = if line.contains(DEFINE) {
            let definition = Definition::parse(line, self.flags, self.options.combine_literals)?;
            self.symbols.define(&definition.name, self.address);
            (
                definition.value,
                WordKind::Constant {
                    name: definition.name,
                },
            )
        } else {
            let instruction = Instruction::parse(line, self.opcodes, &self.symbols)?;
            if let Some(literal) = instruction.literal_fallback() {
                warning_println!(
                    "line {number}: address operand of `{line}` is not a symbol, using literal address {literal:#x}"
                );
            }
            (instruction.encode(), WordKind::Instruction(instruction))
        };
        let word = Word {
            address: self.address,
            value,
            line: number,
            kind,
        };
        very_verbose_println!("{word}");
        self.words.push(word);
        self.address += 1;
        Ok(())
    }

    /// Assembles `path`, writes the debug listing next to it and returns the
    /// byte stream. Nothing is written if assembly fails.
    pub fn assemble_file(self, path: impl AsRef<Path>) -> Result<Vec<u8>, AssemblyError> {
        let path = path.as_ref();
        let listing_file = emitter::listing_path(path);
        emitter::ensure_not_overwriting(path, &listing_file)?;
        let program = self.assemble(&read_source(path)?)?;
        write_listing(&program, &listing_file)?;
        Ok(program.to_bytes())
    }

    /// Assembles `input` and writes the image (and unless disabled, the
    /// listing). Output paths are checked before anything is read, and the
    /// image is written before the listing.
    pub fn build_file(
        self,
        input: &Path,
        output: &OutputOptions,
    ) -> Result<BuildReport, AssemblyError> {
        let output_file = match &output.output {
            Some(path) => path.clone(),
            None => emitter::sibling_path(input, DEFAULT_BINARY_EXTENSION),
        };
        emitter::ensure_not_overwriting(input, &output_file)?;
        let listing_file = if output.no_listing {
            None
        } else {
            let listing_file = emitter::listing_path(input);
            emitter::ensure_not_overwriting(input, &listing_file)?;
            emitter::ensure_not_overwriting(&output_file, &listing_file)?;
            Some(listing_file)
        };

        let program = self.assemble(&read_source(input)?)?;
        very_verbose_println!("program:\n{program}");
        let mut image = program.to_bytes();
        if output.framed {
            image = emitter::package(&image);
        }
        emitter::write_file(&image, &output_file)?;
        if let Some(listing_file) = &listing_file {
            write_listing(&program, listing_file)?;
        }
        Ok(BuildReport {
            words: program.len(),
            image_len: image.len(),
            output_file,
            listing_file,
        })
    }
}

/// Where `Assembler::build_file` puts its artifacts.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// image path; defaults to the input with its extension replaced by `.bin`
    pub output: Option<PathBuf>,
    /// prefix the image with the upload command header
    pub framed: bool,
    pub no_listing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub words: usize,
    pub image_len: usize,
    pub output_file: PathBuf,
    pub listing_file: Option<PathBuf>,
}

fn write_listing(program: &AssembledProgram, listing_file: &Path) -> Result<(), AssemblyError> {
    emitter::write_file(program.listing().as_bytes(), listing_file)?;
    verbose_println!("wrote listing {}", listing_file.display());
    Ok(())
}

pub fn read_source(path: &Path) -> Result<String, AssemblyError> {
    verbose_println!("opening file {}", path.display());
    match fs::read_to_string(path) {
        Ok(source) => Ok(source),
        Err(err) => Err(AssemblyError::new(
            AssemblyErrorCode::SourceFileInitializationError,
            format!("could not read file `{}` :: {err}", path.display()),
        )),
    }
}
