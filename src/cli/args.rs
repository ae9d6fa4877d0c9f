//! Command-line arguments for the `hufflz` binary.
//!
//! ```text
//! hufflz [-v…] [-q…] table  <INPUT> [-o TABLE] [--tree TREE] [--marker-boost DIV]
//! hufflz [-v…] [-q…] verify <INPUT> <COMPRESSED>… --lz-size N [--huffman-size N]
//!                           [--fvp N] [--marker-boost DIV] [-T N]
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{TableConfig, DEFAULT_MARKER_BOOST_DIVISOR};

/// Default display level before `-v` / `-q` adjustments.
pub const DEFAULT_DISPLAY_LEVEL: u32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "hufflz",
    version,
    about = "Build accelerator Huffman tables and verify accelerator output"
)]
pub struct Cli {
    /// Increase verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Display level after applying `-v` and `-q`.
    pub fn display_level(&self) -> u32 {
        (DEFAULT_DISPLAY_LEVEL + self.verbose as u32).saturating_sub(self.quiet as u32)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the code table and marker for an input file
    Table(TableArgs),
    /// Decode accelerator output and compare it with the input file
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
pub struct TableArgs {
    /// File the accelerator will compress
    pub input: PathBuf,

    /// Write the 256-word table here (little-endian u32 words)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the serialized tree here
    #[arg(long)]
    pub tree: Option<PathBuf>,

    /// Marker count = input size / DIV (0 disables the boost)
    #[arg(long, value_name = "DIV", default_value_t = DEFAULT_MARKER_BOOST_DIVISOR)]
    pub marker_boost: u32,
}

impl TableArgs {
    pub fn table_config(&self) -> TableConfig {
        TableConfig {
            marker_boost_divisor: self.marker_boost,
        }
    }
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// The original file
    pub input: PathBuf,

    /// Raw accelerator output buffers (little-endian u16 words), one per engine
    #[arg(required = true, num_args = 1..)]
    pub compressed: Vec<PathBuf>,

    /// Size of the LZ-layer stream reported by the accelerator
    #[arg(long)]
    pub lz_size: usize,

    /// Size of the Huffman-layer stream in bytes [default: buffer size]
    #[arg(long)]
    pub huffman_size: Option<usize>,

    /// First valid position reported by the accelerator
    #[arg(long, default_value_t = 0)]
    pub fvp: usize,

    /// Marker count = input size / DIV (must match the table the accelerator used)
    #[arg(long, value_name = "DIV", default_value_t = DEFAULT_MARKER_BOOST_DIVISOR)]
    pub marker_boost: u32,

    /// Worker threads for multi-engine verification [default: all cores]
    #[arg(short = 'T', long)]
    pub threads: Option<usize>,
}

impl VerifyArgs {
    pub fn table_config(&self) -> TableConfig {
        TableConfig {
            marker_boost_divisor: self.marker_boost,
        }
    }

    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

/// Reassemble little-endian u16 words from a raw buffer dump.  An odd
/// trailing byte becomes the low byte of a final word.
pub fn words_from_le_bytes(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks(2)
        .map(|c| u16::from_le_bytes([c[0], c.get(1).copied().unwrap_or(0)]))
        .collect()
}
