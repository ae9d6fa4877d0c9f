//! Binary entry point for the `hufflz` command-line tool.
//!
//! `table` builds the code table and marker the accelerator must be given for
//! an input file.  `verify` takes the raw buffers one or more accelerator
//! engines produced for that file and checks that they decode back to it.
//!
//! Exit codes: 0 on success, 1 when verification fails or on any error.

use std::fs;

use anyhow::{anyhow, Context};
use clap::Parser;

use hufflz::cli::{words_from_le_bytes, Cli, Command, TableArgs, VerifyArgs};
use hufflz::display::set_display_level;
use hufflz::verify::{AcceleratorOutput, Verifier};
use hufflz::{build_table_with, display, displaylevel, displayout, store_tree};

fn run_table(args: &TableArgs) -> anyhow::Result<i32> {
    let input = fs::read(&args.input).with_context(|| format!("cannot read {}", args.input.display()))?;
    let book = build_table_with(&input, &args.table_config())?;
    displaylevel!(3, "Input size   : {} bytes\n", input.len());
    displaylevel!(3, "Tree depth   : {}\n", book.tree().depth());

    match &args.output {
        Some(path) => {
            fs::write(path, book.table().to_le_bytes())
                .with_context(|| format!("cannot write {}", path.display()))?;
        }
        None => {
            for (k, word) in book.table().to_words().iter().enumerate() {
                displayout!("{:3} {:08x}\n", k, word);
            }
        }
    }

    if let Some(path) = &args.tree {
        let bytes = store_tree(book.tree())?;
        fs::write(path, bytes).with_context(|| format!("cannot write {}", path.display()))?;
    }

    displayout!("Marker: {}\n", book.marker());
    Ok(0)
}

fn run_verify(args: &VerifyArgs) -> anyhow::Result<i32> {
    let input = fs::read(&args.input).with_context(|| format!("cannot read {}", args.input.display()))?;
    let verifier = Verifier::new(&input, &args.table_config())?;
    displaylevel!(3, "Remaining bytes: {}\n", verifier.remaining());
    displaylevel!(3, "Marker         : {}\n", verifier.book().marker());

    let mut outputs = Vec::with_capacity(args.compressed.len());
    for path in &args.compressed {
        let raw = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
        outputs.push(AcceleratorOutput {
            words: words_from_le_bytes(&raw),
            first_valid_position: args.fvp,
            lz_size: args.lz_size,
            huffman_size: args.huffman_size.unwrap_or(raw.len()),
        });
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.thread_count())
        .build()
        .map_err(|e| anyhow!("cannot start worker pool: {e}"))?;
    let results = pool.install(|| verifier.verify_engines(&outputs));

    let mut all_passed = true;
    for (path, result) in args.compressed.iter().zip(results) {
        let report = result.with_context(|| format!("cannot verify {}", path.display()))?;
        if report.passed() {
            displayout!("{}: PASSED, no errors\n", path.display());
        } else {
            all_passed = false;
            displayout!("{}: FAILED, {} errors\n", path.display(), report.errors);
        }
        displaylevel!(
            3,
            "Compression Ratio = {:.2} % \n",
            report.compression_ratio() * 100.0
        );
        displaylevel!(
            3,
            "Throughput decompress = {:.5} GB/s \n",
            report.decode_throughput() / 1.0e9
        );
    }

    Ok(if all_passed { 0 } else { 1 })
}

fn main() {
    let cli = Cli::parse();
    set_display_level(cli.display_level());

    let result = match &cli.command {
        Command::Table(args) => run_table(args),
        Command::Verify(args) => run_verify(args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            display!("hufflz: {:#}\n", e);
            1
        }
    };
    std::process::exit(exit_code);
}
