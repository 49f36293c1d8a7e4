//! Assembler for the pulse sequencer: turns a text program of variable
//! definitions and mnemonics into 64-bit words, and serializes them into the
//! little-endian half-word stream the sequencer is loaded with.

use colorize::AnsiColor;
use constant::NAME;
use std::sync::atomic::{AtomicUsize, Ordering};

pub mod assembler;
pub mod constant;
pub mod data;
pub mod definition;
pub mod emitter;
pub mod instruction;
pub mod parser;
pub mod symbols;
pub mod tokenizer;

pub use assembler::{AssembledProgram, Assembler, AssemblerOptions, BuildReport, OutputOptions};
pub use data::{AssemblyError, AssemblyErrorCode, FlagTable, OpcodeTable};

static VERBOSE_FLAG: AtomicUsize = AtomicUsize::new(0);

pub fn set_verbosity(level: usize) {
    VERBOSE_FLAG.store(level, Ordering::Relaxed)
}

fn verbosity() -> usize {
    VERBOSE_FLAG.load(Ordering::Relaxed)
}

#[doc(hidden)]
pub fn _verbose_println(msg: &str) {
    if verbosity() >= 1 {
        println!("{NAME}: {} {}", "verbose:".yellow(), msg)
    }
}

#[doc(hidden)]
pub fn _very_verbose_println(msg: &str) {
    if verbosity() >= 2 {
        println!("{NAME}: {} {}", "very-verbose:".yellow(), msg)
    }
}

#[doc(hidden)]
pub fn _very_very_verbose_println(msg: &str) {
    if verbosity() >= 3 {
        println!("{NAME}: {} {}", "very-very-verbose:".yellow(), msg)
    }
}

#[doc(hidden)]
pub fn _warning_println(msg: &str) {
    eprintln!("{NAME}: {} {}", "warning:".yellow(), msg)
}

#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => ($crate::_verbose_println(&format!($($arg)*)));
}
#[macro_export]
macro_rules! very_verbose_println {
    ($($arg:tt)*) => ($crate::_very_verbose_println(&format!($($arg)*)));
}
#[macro_export]
macro_rules! very_very_verbose_println {
    ($($arg:tt)*) => ($crate::_very_very_verbose_println(&format!($($arg)*)));
}
#[macro_export]
macro_rules! warning_println {
    ($($arg:tt)*) => ($crate::_warning_println(&format!($($arg)*)));
}
