use crate::{
    constant::{ADDRESS_BITS, DELAY_BITS, OPCODE_SHIFT},
    data::{AssemblyError, AssemblyErrorCode, OpcodeTable, OperandFormat},
    parser::{parse_address_literal, parse_delay, parse_immediate, parse_register},
    symbols::{AddressOperand, SymbolTable},
    tokenizer::split_instruction,
};
use std::fmt;

pub type RegHandle = u8;

/// Operand fields of one instruction, laid out from bit 0 upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fields {
    None,
    Register {
        reg: RegHandle,
    },
    RegisterAddress {
        reg: RegHandle,
        addr: AddressOperand,
    },
    Immediate {
        value: u64,
    },
    Address {
        addr: u32,
    },
    RegisterDelay {
        reg: RegHandle,
        cycles: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: String,
    pub opcode: u8,
    pub fields: Fields,
}

impl Instruction {
    pub fn parse(
        line: &str,
        opcodes: &OpcodeTable,
        symbols: &SymbolTable,
    ) -> Result<Self, AssemblyError> {
        let (mnemonic, operands) = match split_instruction(line) {
            Some(split) => split,
            None => {
                return Err(AssemblyError::new(
                    AssemblyErrorCode::UnknownOpcode,
                    "empty instruction".to_string(),
                ))
            }
        };
        let entry = opcodes.get_opcode(mnemonic)?;
        let expected = entry.format.operand_count();
        if operands.len() < expected {
            return Err(AssemblyError::new(
                AssemblyErrorCode::InvalidOperand,
                format!(
                    "{mnemonic} expects [ {expected} ] operands, only [ {} ] supplied",
                    operands.len()
                ),
            ));
        }
        if operands.len() > expected {
            return Err(AssemblyError::new(
                AssemblyErrorCode::IncorrectNumberOfOperands,
                format!(
                    "supplied [ {} ] operands when [ {expected} ] were expected",
                    operands.len()
                ),
            ));
        }

        let fields = match entry.format {
            OperandFormat::Bare => Fields::None,
            OperandFormat::Register => Fields::Register {
                reg: parse_register(operands[0])?,
            },
            OperandFormat::RegisterAddress => Fields::RegisterAddress {
                reg: parse_register(operands[0])?,
                addr: symbols.resolve(operands[1])?,
            },
            OperandFormat::Immediate => Fields::Immediate {
                value: parse_immediate(operands[0])?,
            },
            OperandFormat::Address => Fields::Address {
                addr: parse_address_literal(operands[0])?,
            },
            OperandFormat::RegisterDelay => Fields::RegisterDelay {
                reg: parse_register(operands[0])?,
                cycles: parse_delay(operands[1])?,
            },
        };
        Ok(Self {
            mnemonic: mnemonic.to_string(),
            opcode: entry.code,
            fields,
        })
    }

    pub fn encode(&self) -> u64 {
        let opcode = u64::from(self.opcode) << OPCODE_SHIFT;
        let operands = match self.fields {
            Fields::None => 0,
            Fields::Register { reg } => u64::from(reg) << ADDRESS_BITS,
            Fields::RegisterAddress { reg, addr } => {
                (u64::from(reg) << ADDRESS_BITS) | u64::from(addr.address())
            }
            Fields::Immediate { value } => value,
            Fields::Address { addr } => u64::from(addr),
            Fields::RegisterDelay { reg, cycles } => (u64::from(reg) << DELAY_BITS) | cycles,
        };
        opcode | operands
    }

    /// the address operand, if it did not name a symbol
    pub fn literal_fallback(&self) -> Option<u32> {
        match self.fields {
            Fields::RegisterAddress {
                addr: AddressOperand::FellBackToLiteral(a),
                ..
            } => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic)?;
        match self.fields {
            Fields::None => Ok(()),
            Fields::Register { reg } => write!(f, " r{reg}"),
            Fields::RegisterAddress { reg, addr } => write!(f, " r{reg} {addr}"),
            Fields::Immediate { value } => write!(f, " {value}"),
            Fields::Address { addr } => write!(f, " {addr:#x}"),
            Fields::RegisterDelay { reg, cycles } => write!(f, " r{reg} {cycles} cycles"),
        }
    }
}
