//! ProbeCrossMap CLI entry point
//!
//! Transforms Affymetrix exon-array probe intensities into gene-array terms
//! and builds samples.txt files for the downstream classifier.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use probe_crossmap::core::{create_writer, run_transform, MergePolicy, TransformConfig, DEFAULT_MANIFEST};
use probe_crossmap::samples::split::{build_split, SplitConfig};
use probe_crossmap::samples::template::{
    create_template, TemplateConfig, DEFAULT_NO_TRAIN, DEFAULT_OUTFILE, DEFAULT_TRAIN_FILE,
};
use probe_crossmap::samples::write_samples;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::time::Instant;

/// Policy for gene probesets fed by several metaprobesets (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum MergePolicyArg {
    /// Keep the candidates of the last metaprobeset seen
    #[default]
    #[value(name = "last-write-wins")]
    LastWriteWins,
    /// Accumulate the candidates of every metaprobeset
    #[value(name = "union")]
    Union,
}

impl From<MergePolicyArg> for MergePolicy {
    fn from(arg: MergePolicyArg) -> Self {
        match arg {
            MergePolicyArg::LastWriteWins => MergePolicy::LastWriteWins,
            MergePolicyArg::Union => MergePolicy::Union,
        }
    }
}

#[derive(Parser)]
#[command(name = "probe-crossmap")]
#[command(about = "Combine Affymetrix exon and gene microarray probe intensities")]
#[command(version)]
#[command(author = "ProbeCrossMap Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite HuEx probe intensities under HuGe probe and probeset ids
    Transform {
        /// Probe intensities from Affymetrix HuEx_1-0_st arrays
        #[arg(short = 'e', long = "huex-intensities")]
        huex_intensities: PathBuf,
        /// Probe intensities from Affymetrix HuGe_1-0_st or closely related arrays
        #[arg(short = 'g', long = "huge-intensities")]
        huge_intensities: PathBuf,
        /// Map between array types
        #[arg(short = 'c', long = "comparison-map")]
        comparison_map: PathBuf,
        /// 'apt-dump-pgf' probeset details for HuEx_1-0_st arrays
        #[arg(short = 'f', long = "huex-details")]
        huex_details: PathBuf,
        /// 'apt-dump-pgf' probeset details for HuGe_1-0_st arrays
        #[arg(short = 'i', long = "huge-details")]
        huge_details: PathBuf,
        /// Metaprobeset-to-probeset map for HuEx_1-0_st arrays
        #[arg(short = 'p', long = "huex-mps-map")]
        huex_mps_map: PathBuf,
        /// Metaprobeset-to-probeset map for HuGe_1-0_st arrays
        #[arg(short = 'q', long = "huge-mps-map")]
        huge_mps_map: PathBuf,
        /// Output file for new HuEx_1-0_st probes
        #[arg(long = "huex-out")]
        huex_out: PathBuf,
        /// Output file for new HuGe_1-0_st probes
        #[arg(long = "huge-out")]
        huge_out: PathBuf,
        /// Output file listing the HuEx probes used
        #[arg(long, default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,
        /// Seed for the metaprobeset tie-break (random if not given)
        #[arg(long)]
        seed: Option<u64>,
        /// How to combine candidates for a probeset reached twice
        #[arg(long = "merge-policy", default_value = "last-write-wins")]
        merge_policy: MergePolicyArg,
        /// Process at most this many HuGe probesets
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Create a samples.txt template from training/test pair lists
    SamplesTemplate {
        /// Map of training sample names between RNA-seq and microarray samples
        #[arg(short = 't', long, default_value = DEFAULT_TRAIN_FILE)]
        train: PathBuf,
        /// Test sample pairs; the first column may be blank
        #[arg(short = 'e', long)]
        test: Option<PathBuf>,
        /// Number of training samples
        #[arg(short = 'a', long = "no-train", default_value_t = DEFAULT_NO_TRAIN)]
        no_train: usize,
        /// Number of test samples
        #[arg(short = 'b', long = "no-test", default_value_t = 0)]
        no_test: usize,
        /// Output file
        #[arg(short = 'o', long, default_value = DEFAULT_OUTFILE)]
        outfile: PathBuf,
        /// Seed for sample selection (random if not given)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Split a tissue's samples into training and test sets
    SamplesSplit {
        /// Tissue sample names (RNA-seq name -> sample id)
        tissue_map: PathBuf,
        /// Affymetrix sample names (sample id -> microarray name)
        affy_ids: PathBuf,
        /// RNA-seq gene expression table; its header lists the samples
        rnaseq_genes: PathBuf,
        /// Number of training samples
        no_train: usize,
        /// Number of test samples
        no_test: usize,
        /// Output file (optional, stdout if not specified)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Seed for the split (random if not given)
        #[arg(long)]
        seed: Option<u64>,
        /// Write test rows as '*NA' instead of '*<name>'
        #[arg(long = "blind-test")]
        blind_test: bool,
    },
}

fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Transform {
            huex_intensities,
            huge_intensities,
            comparison_map,
            huex_details,
            huge_details,
            huex_mps_map,
            huge_mps_map,
            huex_out,
            huge_out,
            manifest,
            seed,
            merge_policy,
            limit,
        } => {
            let mut config = TransformConfig::new(
                huex_intensities,
                huge_intensities,
                comparison_map,
                huex_details,
                huge_details,
                huex_mps_map,
                huge_mps_map,
                huex_out,
                huge_out,
            );
            config.manifest_out = manifest;
            config.seed = seed;
            config.merge_policy = merge_policy.into();
            config.limit = limit;

            eprintln!(
                "Transforming probes: {:?} -> {:?}, {:?}",
                config.huex_intensities, config.huex_out, config.huge_out
            );
            let stats = run_transform(&config).context("Transform failed")?;

            eprintln!("\n=== Transform Statistics ===");
            eprintln!("Gene metaprobesets:     {}", stats.resolve.gene_metaprobesets);
            eprintln!("  - Resolved:           {}", stats.resolve.resolved);
            eprintln!("  - Ambiguous:          {}", stats.resolve.ambiguous);
            eprintln!("  - No HuGe probesets:  {}", stats.resolve.missing_gene_membership);
            eprintln!("  - No HuEx probesets:  {}", stats.resolve.missing_exon_membership);
            eprintln!("Gene probesets mapped:  {}", stats.resolved_probesets);
            eprintln!("Probeset pairs:         {}", stats.matching.probeset_pairs);
            eprintln!("  - Missing details:    {}", stats.matching.missing_details);
            eprintln!("  - No shared probes:   {}", stats.matching.no_shared_sequence);
            eprintln!("Matched probe pairs:    {}", stats.matching.matched_pairs);
            eprintln!("  - Missing intensity:  {}", stats.matching.missing_intensity);
            eprintln!("Rows written:           {}", stats.matching.rows_written);
            eprintln!("Time elapsed:           {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::SamplesTemplate {
            train,
            test,
            no_train,
            no_test,
            outfile,
            seed,
        } => {
            let config = TemplateConfig {
                train,
                test,
                no_train,
                no_test,
                outfile,
            };
            let mut rng = make_rng(seed);
            let rows = create_template(&config, &mut rng)
                .with_context(|| format!("Failed to create {:?}", config.outfile))?;
            eprintln!("Wrote {} samples to {:?}", rows, config.outfile);
        }

        Commands::SamplesSplit {
            tissue_map,
            affy_ids,
            rnaseq_genes,
            no_train,
            no_test,
            output,
            seed,
            blind_test,
        } => {
            let config = SplitConfig {
                tissue_map,
                affy_ids,
                rnaseq_genes,
                no_train,
                no_test,
                blind_test,
            };
            let mut rng = make_rng(seed);
            let rows = build_split(&config, &mut rng).context("Failed to split samples")?;

            match output {
                Some(path) => write_samples(create_writer(&path)?, &rows)?,
                None => write_samples(std::io::stdout().lock(), &rows)?,
            }
            eprintln!("Wrote {} training and {} test samples", no_train, no_test);
        }
    }

    Ok(())
}
