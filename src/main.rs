use anyhow::Result;
use clap::Parser;

mod commands;

use commands::{
    run_bv, run_compare, run_extract, run_filter, run_matrix, run_random, run_search, Cli,
    Commands,
};
use readshare::logging::init_logger;

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logger(args.verbose);

    match args.command {
        Commands::Search {
            index,
            search,
            kmer,
            output,
            max_reads,
        } => run_search(&index, &search, &kmer, &output, max_reads),
        Commands::Compare {
            index,
            search,
            kmer,
            output,
        } => run_compare(&index, &search, &kmer, &output),
        Commands::Filter(filter_args) => run_filter(&filter_args),
        Commands::Extract {
            reads,
            bit_vector,
            output,
        } => run_extract(&reads, &bit_vector, output.as_deref()),
        Commands::Bv(bv_args) => run_bv(&bv_args),
        Commands::Random {
            reads,
            percentage,
            output,
        } => run_random(&reads, percentage, &output),
        Commands::Matrix {
            config,
            from_vectors,
        } => run_matrix(&config, from_vectors.as_deref()),
    }
}
