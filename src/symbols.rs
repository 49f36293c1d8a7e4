use crate::{
    data::{AssemblyError, AssemblyErrorCode},
    parser::{check_address, has_hex_prefix, parse_hex},
};
use std::{collections::HashMap, fmt};

/// Outcome of resolving an address operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressOperand {
    Resolved(u32),
    /// no symbol by that name, the token was read as a hex address instead
    FellBackToLiteral(u32),
}

impl AddressOperand {
    pub fn address(&self) -> u32 {
        match self {
            AddressOperand::Resolved(a) | AddressOperand::FellBackToLiteral(a) => *a,
        }
    }
}

impl fmt::Display for AddressOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressOperand::Resolved(a) => write!(f, "{a:#x}"),
            AddressOperand::FellBackToLiteral(a) => write!(f, "{a:#x} (literal)"),
        }
    }
}

/// Variable name to program address, scoped to one assembly run.
#[derive(Debug, Default)]
pub struct SymbolTable {
    table: HashMap<String, u64>,
    /// every name defined anywhere in the source, with its 1-based line
    declared: HashMap<String, usize>,
    strict: bool,
}

impl SymbolTable {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            ..Default::default()
        }
    }

    /// Registers a name seen while pre-scanning, before any word is emitted.
    pub fn declare(&mut self, name: &str, line: usize) {
        self.declared.entry(name.to_string()).or_insert(line);
    }

    /// Binds a name to an address. Redefinition overwrites.
    pub fn define(&mut self, name: &str, address: u64) {
        self.table.insert(name.to_string(), address);
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.table.get(name).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.table.len()
    }

    pub fn resolve(&self, token: &str) -> Result<AddressOperand, AssemblyError> {
        if let Some(address) = self.get(token) {
            return Ok(AddressOperand::Resolved(check_address(address, token)?));
        }
        if let Some(line) = self.declared.get(token) {
            return Err(AssemblyError::new(
                AssemblyErrorCode::UnresolvedSymbol,
                format!("[ {token} ] is referenced before its definition on line {line}"),
            ));
        }
        if self.strict && !has_hex_prefix(token) {
            return Err(AssemblyError::new(
                AssemblyErrorCode::UnresolvedSymbol,
                format!("[ {token} ] is not a defined symbol; write literal addresses with a 0x prefix"),
            ));
        }
        let literal = match parse_hex(token) {
            Ok(value) => value,
            Err(_) => {
                return Err(AssemblyError::new(
                    AssemblyErrorCode::UnresolvedSymbol,
                    format!("[ {token} ] is neither a defined symbol nor a hex address"),
                ))
            }
        };
        Ok(AddressOperand::FellBackToLiteral(check_address(literal, token)?))
    }
}
