//! CLI for running diagnoses from the terminal

pub mod diagnose;

use clap::{Parser, Subcommand};

/// physiodx - retrieval-augmented physiotherapy differential diagnosis
#[derive(Parser)]
#[command(name = "physiodx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a differential diagnosis for one patient assessment
    Diagnose(diagnose::DiagnoseArgs),
}
