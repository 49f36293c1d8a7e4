use crate::constant::NAME;
use colorize::AnsiColor;
use std::{collections::HashMap, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyErrorCode {
    UnknownOpcode,
    UnknownFlag,
    InvalidOperand,
    UnresolvedSymbol,
    IncorrectNumberOfOperands,
    InvalidDefinition,
    SourceFileInitializationError,
    OutputWriteError,
    CLIArgParseError,
}

/// source position of the line an error was raised on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMetadata {
    pub line: usize,
    pub text: String,
}

#[derive(Debug)]
pub struct AssemblyError {
    pub code: AssemblyErrorCode,
    pub reason: String,
    pub metadata: Option<LineMetadata>,
}

impl AssemblyError {
    pub fn new(code: AssemblyErrorCode, reason: String) -> Self {
        Self {
            code,
            reason,
            metadata: None,
        }
    }
    /// attaches the line only if no earlier stage already did
    pub fn at_line(mut self, line: usize, text: &str) -> Self {
        if self.metadata.is_none() {
            self.metadata = Some(LineMetadata {
                line,
                text: text.to_string(),
            });
        }
        self
    }
}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let string = format!(
            "{NAME}: {} {} :: {}",
            "error:".red(),
            format!("{:?}", self.code).yellow(),
            self.reason
        );
        write!(f, "{string}")?;
        if let Some(meta) = &self.metadata {
            write!(f, "\n  at line {}: {}", meta.line, meta.text.trim_end())?;
        }
        Ok(())
    }
}

impl std::error::Error for AssemblyError {}

/// How the tokens after a mnemonic map onto fields. One variant per distinct
/// layout; mnemonics are assigned explicitly in `OpcodeTable::build_table`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandFormat {
    /// opcode followed by 58 zero bits
    Bare,
    /// decimal register in the register field, address field zero
    Register,
    /// decimal register, then symbol or hex address
    RegisterAddress,
    /// decimal 40-bit immediate
    Immediate,
    /// hex address, register field zero
    Address,
    /// decimal register above a 40-bit cycle count given in microseconds
    RegisterDelay,
}

impl OperandFormat {
    pub fn operand_count(&self) -> usize {
        match self {
            OperandFormat::Bare => 0,
            OperandFormat::Register | OperandFormat::Immediate | OperandFormat::Address => 1,
            OperandFormat::RegisterAddress | OperandFormat::RegisterDelay => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
    pub code: u8,
    pub format: OperandFormat,
}

impl OpcodeEntry {
    fn new(code: u8, format: OperandFormat) -> Self {
        OpcodeEntry { code, format }
    }
}

pub struct OpcodeTable {
    table: HashMap<String, OpcodeEntry>,
}

impl OpcodeTable {
    pub fn build_table() -> Self {
        use OperandFormat::*;
        let table: HashMap<String, OpcodeEntry> = HashMap::from([
            ("NOP".to_string(), OpcodeEntry::new(0b000000, Bare)),
            ("DEC".to_string(), OpcodeEntry::new(0b000001, Register)),
            ("INC".to_string(), OpcodeEntry::new(0b000010, Register)),
            ("LD64".to_string(), OpcodeEntry::new(0b000100, RegisterAddress)),
            ("TXOFFSET".to_string(), OpcodeEntry::new(0b001000, Immediate)),
            ("GRADOFFSET".to_string(), OpcodeEntry::new(0b001001, Immediate)),
            ("JNZ".to_string(), OpcodeEntry::new(0b010000, RegisterAddress)),
            ("BTR".to_string(), OpcodeEntry::new(0b010100, Address)),
            ("RET".to_string(), OpcodeEntry::new(0b010101, Address)),
            ("J".to_string(), OpcodeEntry::new(0b010111, Address)),
            ("HALT".to_string(), OpcodeEntry::new(0b011001, Bare)),
            ("PI".to_string(), OpcodeEntry::new(0b011100, Address)),
            ("PR".to_string(), OpcodeEntry::new(0b011101, RegisterDelay)),
        ]);
        Self { table }
    }

    pub fn get_opcode(&self, key: &str) -> Result<&OpcodeEntry, AssemblyError> {
        self.table.get(key).ok_or_else(|| {
            AssemblyError::new(
                AssemblyErrorCode::UnknownOpcode,
                format!("[ {key} ] is not a valid operation"),
            )
        })
    }
}

pub struct FlagTable {
    table: HashMap<String, u8>,
}

impl FlagTable {
    pub fn build_table() -> Self {
        Self::from_entries(&[
            ("TX_PULSE", 0x01),
            ("RX_PULSE", 0x02),
            ("GRAD_PULSE", 0x04),
            ("TX_GATE", 0x10),
            ("RX_GATE", 0x20),
        ])
    }

    pub fn from_entries(entries: &[(&str, u8)]) -> Self {
        let table = entries
            .iter()
            .map(|(name, mask)| (name.to_string(), *mask))
            .collect();
        Self { table }
    }

    pub fn get_mask(&self, flag: &str) -> Result<u8, AssemblyError> {
        match self.table.get(flag) {
            Some(mask) => Ok(*mask),
            None => Err(AssemblyError::new(
                AssemblyErrorCode::UnknownFlag,
                format!("[ {flag} ] is not a known flag"),
            )),
        }
    }
}
