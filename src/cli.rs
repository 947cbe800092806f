//! Command-line interface: one positional source path in, one compiled
//! JavaScript file out.

use std::io::Write;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::compile::{compile_file, CompileError};

#[derive(Parser)]
#[command(name = "detype")]
#[command(about = "Compile TypeScript or JavaScript to plain JavaScript", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a .ts or .js source file. TypeScript mode is selected by the
    /// .ts extension.
    pub input: PathBuf,
}

pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match compile_file(&cli.input) {
        Ok(out_path) => {
            println!(
                "Compiled {} -> {}",
                cli.input.display(),
                out_path.display()
            );
            Ok(())
        }
        Err(CompileError::Compile(sink)) => {
            // Diagnostics go to stderr in their exact rendering; nothing was
            // written.
            let stderr = std::io::stderr();
            let mut handle = stderr.lock();
            let _ = sink.write_to(&mut handle);
            let _ = handle.flush();
            process::exit(1);
        }
        Err(err) => Err(Box::new(err)),
    }
}
