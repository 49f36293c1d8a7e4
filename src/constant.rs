pub const NAME: &str = "pulseq-as";
pub const DEFAULT_BINARY_EXTENSION: &str = ".bin";
pub const LISTING_SUFFIX: &str = "_hex.txt";
/// characters dropped from the end of the input path before a suffix is appended
pub const INPUT_EXTENSION_CHARS: usize = 4;

pub const COMMENT: &str = "//";
pub const COMMA: char = ',';
pub const DEFINE: char = '=';
pub const OR: char = '|';
pub const HEX_PREFIX: &str = "0x";

pub const WORD_BITS: u32 = u64::BITS;
pub const OPCODE_BITS: u32 = 6;
pub const OPCODE_SHIFT: u32 = WORD_BITS - OPCODE_BITS;
pub const REGISTER_BITS: u32 = 5;
pub const ADDRESS_BITS: u32 = 32;
pub const IMMEDIATE_BITS: u32 = 40;
pub const DELAY_BITS: u32 = 40;

/// sequencer clock period in microseconds (7 ns)
pub const CLOCK_PERIOD_US: f64 = 7e-3;

pub const UPLOAD_COMMAND: u32 = 4;
pub const COMMAND_HEADER_WORDS: usize = 10;
